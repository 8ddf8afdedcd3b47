//! Provider channel groups (bouquets, regions) keyed by a numeric code.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::sorted::{SortedEntry, SortedUniqueList};

/// A channel listed in a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelGroupEntry {
    pub name: String,
    pub network_id: u16,
    pub transport_stream_id: u16,
    pub service_id: u16,
}

impl ChannelGroupEntry {
    pub fn new(name: impl Into<String>, network_id: u16, transport_stream_id: u16, service_id: u16) -> Self {
        Self {
            name: name.into(),
            network_id,
            transport_stream_id,
            service_id,
        }
    }
}

/// Ordered by name; a duplicate must match on name and the full identity.
impl SortedEntry for ChannelGroupEntry {
    type Key = str;

    fn sort_key(&self) -> &str {
        &self.name
    }

    fn is_duplicate_of(&self, other: &Self) -> bool {
        self == other
    }
}

/// A numbered group and its channels in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelGroup {
    pub number: u32,
    channels: SortedUniqueList<ChannelGroupEntry>,
}

impl ChannelGroup {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            channels: SortedUniqueList::new(),
        }
    }

    /// Returns false if an identical entry is already present.
    pub fn add_channel(&mut self, entry: ChannelGroupEntry) -> bool {
        self.channels.insert(entry)
    }

    pub fn channels(&self) -> &SortedUniqueList<ChannelGroupEntry> {
        &self.channels
    }
}

impl SortedEntry for ChannelGroup {
    type Key = u32;

    fn sort_key(&self) -> &u32 {
        &self.number
    }

    fn is_duplicate_of(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

/// All channel groups of one collection run, ascending by group number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelGroupRegistry {
    groups: SortedUniqueList<ChannelGroup>,
}

impl ChannelGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entry` to group `group_number`, creating the group if needed.
    ///
    /// Returns false if the group already held an identical entry.
    pub fn add_channel(&mut self, group_number: u32, entry: ChannelGroupEntry) -> bool {
        let group = self.find_or_create_group(group_number);
        let added = group.add_channel(entry);
        if added {
            debug!("Channel group {}: {} channel(s)", group_number, group.channels.len());
        }
        added
    }

    /// Group `group_number`, inserted empty at its sorted position if missing.
    pub fn find_or_create_group(&mut self, group_number: u32) -> &mut ChannelGroup {
        self.groups
            .get_or_insert_with(&group_number, || ChannelGroup::new(group_number))
    }

    pub fn find_group(&self, group_number: u32) -> Option<&ChannelGroup> {
        self.groups.find(&group_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn dump(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for group in self.groups.iter() {
            lines.push(format!(
                "Channel group {} (0x{:04x}): {} channel(s)",
                group.number,
                group.number,
                group.channels.len()
            ));
            for entry in group.channels.iter() {
                lines.push(format!(
                    "    {} ONID {} TSID {} SID {}",
                    entry.name, entry.network_id, entry.transport_stream_id, entry.service_id
                ));
            }
        }
        lines
    }

    pub fn log_dump(&self) {
        info!("{}", crate::SEPARATOR);
        info!("Channel groups: {}", self.groups.len());
        for line in self.dump() {
            info!("{}", line);
        }
        info!("{}", crate::SEPARATOR);
    }
}
