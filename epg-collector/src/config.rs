//! Configuration file loading.
//!
//! ```toml
//! [logging]
//! log_dir = "logs"
//! retention_days = 7
//! level = "info"
//!
//! [[providers]]
//! name = "Kanto"
//! [[providers.frequencies]]
//! type = "IsdbTerrestrial"
//! frequency = 557142
//! channel_number = 27
//! bandwidth = 6
//!
//! [[networks]]
//! network_id = 0x7FE0
//! transport_stream_id = 0x7FE0
//! service_ids = [1024, 1025]
//! frequency = { type = "IsdbTerrestrial", frequency = 557142, channel_number = 27, bandwidth = 6 }
//!
//! [[channel_groups]]
//! number = 1
//! channels = [{ name = "NHK総合", network_id = 0x7FE0, transport_stream_id = 0x7FE0, service_id = 1024 }]
//!
//! [[repeat_exclusions]]
//! title = "<(再)>"
//! ```

use std::path::{Path, PathBuf};

use epg_tuning::{ChannelGroupEntry, CollectionSession, Frequency, RepeatExclusion};
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

/// Default configuration path looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "epg-collector.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Configuration file format.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub providers: Vec<ProviderSection>,
    #[serde(default)]
    pub networks: Vec<NetworkSection>,
    #[serde(default)]
    pub channel_groups: Vec<ChannelGroupSection>,
    #[serde(default)]
    pub repeat_exclusions: Vec<RepeatExclusion>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingSection {
    pub log_dir: Option<String>,
    pub retention_days: Option<u64>,
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderSection {
    pub name: String,
    #[serde(default)]
    pub frequencies: Vec<Frequency>,
}

#[derive(Debug, Deserialize)]
pub struct NetworkSection {
    pub network_id: u16,
    pub transport_stream_id: u16,
    #[serde(default)]
    pub service_ids: Vec<u16>,
    pub frequency: Option<Frequency>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelGroupSection {
    pub number: u32,
    #[serde(default)]
    pub channels: Vec<ChannelGroupEntry>,
}

pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(contents)
}

impl ConfigFile {
    /// Populate a fresh collection session from this configuration.
    pub fn build_session(&self) -> CollectionSession {
        let mut session = CollectionSession::new();

        for section in &self.providers {
            let provider = session.find_or_create_provider(&section.name);
            for frequency in &section.frequencies {
                if !provider.add_frequency(frequency.clone()) {
                    warn!(
                        "Provider {}: {} duplicates an existing carrier frequency, ignored",
                        section.name, frequency
                    );
                }
            }
        }

        for network in &self.networks {
            for &service_id in &network.service_ids {
                session.record_service(
                    network.network_id,
                    network.transport_stream_id,
                    service_id,
                    network.frequency.as_ref(),
                );
            }
            if network.service_ids.is_empty() {
                let entry = session
                    .network_maps
                    .find_or_create_entry(network.network_id, network.transport_stream_id);
                if entry.frequency.is_none() {
                    entry.frequency = network.frequency.clone();
                }
            }
        }

        for group in &self.channel_groups {
            for channel in &group.channels {
                if !session.channel_groups.add_channel(group.number, channel.clone()) {
                    debug!("Channel group {}: duplicate entry {} ignored", group.number, channel.name);
                }
            }
        }

        session.repeat_exclusions = self.repeat_exclusions.clone();
        session
    }
}
