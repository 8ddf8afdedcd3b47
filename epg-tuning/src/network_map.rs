//! Resolution of broadcast identity (NID, TSID, SID) to tuning frequencies.
//!
//! The index is two levels deep: one [`NetworkMap`] per original network id,
//! each holding one [`NetworkMapEntry`] per transport stream id. Both levels
//! are kept in insertion order and are only ever grown through the
//! `find_or_create_*` calls; the plain `find_*` calls never insert.

use log::{debug, info};

use crate::frequency::Frequency;

/// One transport stream of a network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkMapEntry {
    pub transport_stream_id: u16,
    /// Frequency the transport stream is carried on, once known.
    pub frequency: Option<Frequency>,
    service_ids: Vec<u16>,
}

impl NetworkMapEntry {
    pub fn new(transport_stream_id: u16) -> Self {
        Self {
            transport_stream_id,
            frequency: None,
            service_ids: Vec::new(),
        }
    }

    /// Record a service carried by this transport stream.
    ///
    /// No duplicate check is made here; callers test with
    /// [`has_service`](Self::has_service) first when they need uniqueness.
    pub fn add_service_id(&mut self, service_id: u16) {
        self.service_ids.push(service_id);
    }

    pub fn has_service(&self, service_id: u16) -> bool {
        self.service_ids.contains(&service_id)
    }

    pub fn service_ids(&self) -> &[u16] {
        &self.service_ids
    }
}

/// All known transport streams of one original network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkMap {
    pub network_id: u16,
    entries: Vec<NetworkMapEntry>,
}

impl NetworkMap {
    pub fn new(network_id: u16) -> Self {
        Self {
            network_id,
            entries: Vec::new(),
        }
    }

    /// Entry for `transport_stream_id`, appended empty if missing.
    pub fn find_or_create_entry(&mut self, transport_stream_id: u16) -> &mut NetworkMapEntry {
        let position = self
            .entries
            .iter()
            .position(|e| e.transport_stream_id == transport_stream_id);
        match position {
            Some(idx) => &mut self.entries[idx],
            None => {
                debug!(
                    "Network map 0x{:04X}: created entry for TSID 0x{:04X}",
                    self.network_id, transport_stream_id
                );
                self.entries.push(NetworkMapEntry::new(transport_stream_id));
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        }
    }

    pub fn find_entry(&self, transport_stream_id: u16) -> Option<&NetworkMapEntry> {
        self.entries
            .iter()
            .find(|e| e.transport_stream_id == transport_stream_id)
    }

    pub fn entries(&self) -> &[NetworkMapEntry] {
        &self.entries
    }
}

/// Index of network maps for one collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkMapIndex {
    maps: Vec<NetworkMap>,
}

impl NetworkMapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map for `network_id`, appended empty if missing. Never fails.
    pub fn find_or_create_map(&mut self, network_id: u16) -> &mut NetworkMap {
        let position = self.maps.iter().position(|m| m.network_id == network_id);
        match position {
            Some(idx) => &mut self.maps[idx],
            None => {
                debug!("Created network map for NID 0x{:04X}", network_id);
                self.maps.push(NetworkMap::new(network_id));
                let last = self.maps.len() - 1;
                &mut self.maps[last]
            }
        }
    }

    /// Entry for (`network_id`, `transport_stream_id`), creating the map
    /// and the entry as needed.
    pub fn find_or_create_entry(
        &mut self,
        network_id: u16,
        transport_stream_id: u16,
    ) -> &mut NetworkMapEntry {
        self.find_or_create_map(network_id)
            .find_or_create_entry(transport_stream_id)
    }

    /// Whether the service is recorded for the given network and stream.
    ///
    /// Resolves through [`find_or_create_entry`](Self::find_or_create_entry),
    /// so an unknown network or stream is left behind as an empty entry. Use
    /// [`contains_service`](Self::contains_service) to query without side
    /// effects.
    pub fn check_for_service(
        &mut self,
        network_id: u16,
        transport_stream_id: u16,
        service_id: u16,
    ) -> bool {
        self.find_or_create_entry(network_id, transport_stream_id)
            .has_service(service_id)
    }

    /// Frequency of the given network and stream, if recorded.
    ///
    /// Creates empty structures for unknown identities, like
    /// [`check_for_service`](Self::check_for_service).
    pub fn find_frequency(
        &mut self,
        network_id: u16,
        transport_stream_id: u16,
    ) -> Option<&Frequency> {
        self.find_or_create_entry(network_id, transport_stream_id)
            .frequency
            .as_ref()
    }

    pub fn find_map(&self, network_id: u16) -> Option<&NetworkMap> {
        self.maps.iter().find(|m| m.network_id == network_id)
    }

    pub fn find_entry(&self, network_id: u16, transport_stream_id: u16) -> Option<&NetworkMapEntry> {
        self.find_map(network_id)?.find_entry(transport_stream_id)
    }

    /// Side-effect free variant of [`check_for_service`](Self::check_for_service).
    pub fn contains_service(&self, network_id: u16, transport_stream_id: u16, service_id: u16) -> bool {
        self.find_entry(network_id, transport_stream_id)
            .map_or(false, |e| e.has_service(service_id))
    }

    /// Side-effect free variant of [`find_frequency`](Self::find_frequency).
    pub fn frequency_for(&self, network_id: u16, transport_stream_id: u16) -> Option<&Frequency> {
        self.find_entry(network_id, transport_stream_id)?
            .frequency
            .as_ref()
    }

    pub fn maps(&self) -> &[NetworkMap] {
        &self.maps
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Diagnostic listing, one block per network in insertion order.
    pub fn dump(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for map in &self.maps {
            lines.push(format!(
                "Network map NID {} (0x{:04X}): {} transport stream(s)",
                map.network_id,
                map.network_id,
                map.entries.len()
            ));
            for entry in &map.entries {
                let frequency = entry
                    .frequency
                    .as_ref()
                    .map(Frequency::describe)
                    .unwrap_or_else(|| "no frequency".to_string());
                let services = entry
                    .service_ids
                    .iter()
                    .map(|sid| sid.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!(
                    "    TSID {} (0x{:04X}) {} services [{}]",
                    entry.transport_stream_id, entry.transport_stream_id, frequency, services
                ));
            }
        }
        lines
    }

    /// Write [`dump`](Self::dump) to the log, framed by separator lines.
    pub fn log_dump(&self) {
        info!("{}", crate::SEPARATOR);
        info!("Network maps: {}", self.maps.len());
        for line in self.dump() {
            info!("{}", line);
        }
        info!("{}", crate::SEPARATOR);
    }
}
