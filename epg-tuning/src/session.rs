//! State owned by a single collection run.

use log::{error, info};

use crate::channel_group::ChannelGroupRegistry;
use crate::error::{SerializeError, SinkError};
use crate::frequency::Frequency;
use crate::network_map::NetworkMapIndex;
use crate::provider::TuningProvider;
use crate::repeat::{self, RepeatExclusion};
use crate::xml::ElementSink;

/// Registries populated during load and read during collection.
///
/// One session owns everything; nothing here is shared between runs.
#[derive(Debug, Clone, Default)]
pub struct CollectionSession {
    pub providers: Vec<TuningProvider>,
    pub network_maps: NetworkMapIndex,
    pub channel_groups: ChannelGroupRegistry,
    pub repeat_exclusions: Vec<RepeatExclusion>,
}

impl CollectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider called `name`, appended if missing.
    pub fn find_or_create_provider(&mut self, name: &str) -> &mut TuningProvider {
        let position = self.providers.iter().position(|p| p.name == name);
        match position {
            Some(idx) => &mut self.providers[idx],
            None => {
                self.providers.push(TuningProvider::new(name));
                let last = self.providers.len() - 1;
                &mut self.providers[last]
            }
        }
    }

    pub fn find_provider(&self, name: &str) -> Option<&TuningProvider> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Record that a service was seen on a transport stream.
    ///
    /// The service id is added only if not already present; the frequency
    /// is set when the entry has none yet.
    pub fn record_service(
        &mut self,
        network_id: u16,
        transport_stream_id: u16,
        service_id: u16,
        frequency: Option<&Frequency>,
    ) {
        let known = self
            .network_maps
            .check_for_service(network_id, transport_stream_id, service_id);
        let entry = self
            .network_maps
            .find_or_create_entry(network_id, transport_stream_id);
        if !known {
            entry.add_service_id(service_id);
        }
        if entry.frequency.is_none() {
            entry.frequency = frequency.cloned();
        }
    }

    /// Frequency carrying the service, if the service is known.
    pub fn resolve_service(
        &mut self,
        network_id: u16,
        transport_stream_id: u16,
        service_id: u16,
    ) -> Option<&Frequency> {
        if !self
            .network_maps
            .check_for_service(network_id, transport_stream_id, service_id)
        {
            return None;
        }
        self.network_maps
            .find_frequency(network_id, transport_stream_id)
    }

    /// Whether a programme should be dropped as a repeat.
    pub fn is_repeat(&self, title: &str, description: &str) -> bool {
        repeat::is_excluded(&self.repeat_exclusions, title, description)
    }

    /// Total number of frequencies across providers.
    pub fn frequency_count(&self) -> usize {
        self.providers.iter().map(|p| p.frequencies().len()).sum()
    }

    /// Write every provider and its frequencies to `sink`.
    ///
    /// Returns the number of frequencies written.
    pub fn export_frequencies(&self, sink: &mut dyn ElementSink) -> Result<usize, SerializeError> {
        let mut written = 0;
        wrap(sink, "frequency list", |sink| sink.start_element("TuningFrequencies"))?;
        for provider in &self.providers {
            let label = format!("provider {}", provider.name);
            wrap(sink, &label, |sink| {
                sink.start_element("Provider")?;
                sink.write_element("Name", &provider.name)
            })?;
            for frequency in provider.frequencies() {
                frequency.serialize_to(sink)?;
                written += 1;
            }
            wrap(sink, &label, |sink| sink.end_element())?;
        }
        wrap(sink, "frequency list", |sink| sink.end_element())?;
        Ok(written)
    }

    /// Log the contents of every registry.
    pub fn log_diagnostics(&self) {
        info!(
            "Collection session: {} provider(s), {} frequency(ies), {} repeat exclusion(s)",
            self.providers.len(),
            self.frequency_count(),
            self.repeat_exclusions.len()
        );
        for provider in &self.providers {
            info!("Provider {}", provider.name);
            for frequency in provider.frequencies() {
                info!("    {}", frequency);
            }
        }
        self.network_maps.log_dump();
        self.channel_groups.log_dump();
    }
}

fn wrap(
    sink: &mut dyn ElementSink,
    item: &str,
    write: impl FnOnce(&mut dyn ElementSink) -> Result<(), SinkError>,
) -> Result<(), SerializeError> {
    write(sink).map_err(|source| {
        error!("Failed to serialize {} to {}: {}", item, sink.target(), source);
        SerializeError::Write {
            item: item.to_string(),
            target: sink.target().to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_group::ChannelGroupEntry;
    use crate::error::SinkErrorKind;
    use crate::xml::XmlElementWriter;

    fn session() -> CollectionSession {
        let mut session = CollectionSession::new();
        let kanto = session.find_or_create_provider("Kanto");
        kanto.add_frequency(Frequency::isdb_terrestrial(563_142, Some(28), 6));
        kanto.add_frequency(Frequency::isdb_terrestrial(557_142, Some(27), 6));
        session
    }

    #[test]
    fn test_find_or_create_provider() {
        let mut session = session();
        session.find_or_create_provider("Kanto");
        session.find_or_create_provider("Kinki");

        assert_eq!(session.providers.len(), 2);
        assert_eq!(session.frequency_count(), 2);
        assert!(session.find_provider("Tokai").is_none());
    }

    #[test]
    fn test_record_and_resolve_service() {
        let mut session = session();
        let nhk = Frequency::isdb_terrestrial(557_142, Some(27), 6);
        session.record_service(0x7FE0, 0x7FE0, 1024, Some(&nhk));
        session.record_service(0x7FE0, 0x7FE0, 1024, None);
        session.record_service(0x7FE0, 0x7FE0, 1025, None);

        let entry = session.network_maps.find_entry(0x7FE0, 0x7FE0).unwrap();
        assert_eq!(entry.service_ids(), &[1024, 1025]);

        assert_eq!(session.resolve_service(0x7FE0, 0x7FE0, 1025), Some(&nhk));
        assert!(session.resolve_service(0x7FE0, 0x7FE0, 2048).is_none());
    }

    #[test]
    fn test_is_repeat() {
        let mut session = session();
        session
            .repeat_exclusions
            .push(RepeatExclusion::new("<(再)>", ""));

        assert!(session.is_repeat("ニュース(再)", ""));
        assert!(!session.is_repeat("ニュース", ""));
    }

    #[test]
    fn test_export_frequencies() {
        let mut session = session();
        session
            .channel_groups
            .add_channel(1, ChannelGroupEntry::new("NHK", 0x7FE0, 0x7FE0, 1024));

        let mut writer = XmlElementWriter::new(Vec::new(), "memory");
        let written = session.export_frequencies(&mut writer).unwrap();
        assert_eq!(written, 2);

        let xml = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert!(xml.contains("<Name>Kanto</Name>"));
        let first = xml.find("<Frequency>557142</Frequency>").unwrap();
        let second = xml.find("<Frequency>563142</Frequency>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_export_reports_unbalanced_sink() {
        struct ClosedSink;

        impl ElementSink for ClosedSink {
            fn start_element(&mut self, _name: &str) -> Result<(), SinkError> {
                Err(SinkError::format("document already closed"))
            }

            fn write_element(&mut self, _name: &str, _text: &str) -> Result<(), SinkError> {
                Ok(())
            }

            fn end_element(&mut self) -> Result<(), SinkError> {
                Ok(())
            }

            fn target(&self) -> &str {
                "closed.xml"
            }
        }

        let err = session().export_frequencies(&mut ClosedSink).unwrap_err();
        assert_eq!(err.kind(), SinkErrorKind::Format);
        assert!(err.to_string().contains("closed.xml"));
    }
}
