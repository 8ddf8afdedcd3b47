//! Tuning model for an EPG collector.
//!
//! This crate holds the data a programme-guide collection run works with:
//! tunable frequencies for several delivery systems, the index that maps a
//! broadcast identity (ONID/TSID/SID) back to a frequency, provider channel
//! groups, and the rules used to drop repeat programmes.
//!
//! # Example
//!
//! ```rust
//! use epg_tuning::{ChannelGroupEntry, CollectionSession, EqualityLevel, Frequency, RepeatExclusion};
//!
//! let mut session = CollectionSession::new();
//!
//! // Frequencies are kept in carrier order per provider
//! let kanto = session.find_or_create_provider("Kanto");
//! kanto.add_frequency(Frequency::isdb_terrestrial(563_142, Some(28), 6));
//! kanto.add_frequency(Frequency::isdb_terrestrial(557_142, Some(27), 6));
//!
//! // Map a service back to the frequency it was found on
//! let nhk = Frequency::isdb_terrestrial(557_142, Some(27), 6);
//! session.record_service(0x7FE0, 0x7FE0, 1024, Some(&nhk));
//! let found = session.resolve_service(0x7FE0, 0x7FE0, 1024).unwrap();
//! assert!(found.equal_to(&nhk, EqualityLevel::Full));
//!
//! // Channel groups and repeat filtering
//! session.channel_groups.add_channel(1, ChannelGroupEntry::new("NHK総合", 0x7FE0, 0x7FE0, 1024));
//! session.repeat_exclusions.push(RepeatExclusion::new("<news>", ""));
//! assert!(session.is_repeat("Nightly News Update", ""));
//! ```

pub mod channel_group;
pub mod error;
pub mod frequency;
pub mod network_map;
pub mod provider;
pub mod repeat;
pub mod session;
pub mod sorted;
pub mod xml;

pub use channel_group::{ChannelGroup, ChannelGroupEntry, ChannelGroupRegistry};
pub use error::{SerializeError, SinkError, SinkErrorKind};
pub use frequency::{DeliverySystem, EqualityLevel, Frequency, FrequencyBase, Polarization};
pub use network_map::{NetworkMap, NetworkMapEntry, NetworkMapIndex};
pub use provider::TuningProvider;
pub use repeat::{is_excluded, RepeatExclusion};
pub use session::CollectionSession;
pub use sorted::{SortedEntry, SortedUniqueList};
pub use xml::{ElementSink, XmlElementWriter};

/// Line written around diagnostic dumps.
pub const SEPARATOR: &str = "============================================================";
