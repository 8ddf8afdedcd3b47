//! Tuning frequencies for the supported delivery systems.
//!
//! A [`Frequency`] is a common record (carrier frequency and optional channel
//! number) plus a [`DeliverySystem`] payload. Two frequencies of different
//! delivery systems are never equal; within one system the comparison depth
//! is selected with [`EqualityLevel`].

use std::fmt;
use std::path::PathBuf;

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::{SerializeError, SinkError};
use crate::xml::ElementSink;

/// How much of a frequency takes part in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EqualityLevel {
    /// Carrier frequency and channel number only.
    Identity,
    /// Every tuning parameter.
    Full,
}

/// Fields shared by every delivery system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBase {
    /// Carrier frequency in kHz.
    #[serde(default)]
    pub frequency: u32,
    /// Broadcast channel number, where the band defines one.
    #[serde(default)]
    pub channel_number: Option<u32>,
}

/// Satellite polarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    Horizontal,
    Vertical,
    CircularLeft,
    CircularRight,
}

impl Polarization {
    pub fn code(self) -> &'static str {
        match self {
            Polarization::Horizontal => "H",
            Polarization::Vertical => "V",
            Polarization::CircularLeft => "L",
            Polarization::CircularRight => "R",
        }
    }
}

/// Delivery-system specific tuning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeliverySystem {
    /// Transport stream recorded to a file.
    File { path: PathBuf },
    /// DVB-T / DVB-T2.
    Terrestrial {
        /// Channel bandwidth in MHz.
        bandwidth: u32,
        /// Physical layer pipe, DVB-T2 only.
        #[serde(default)]
        plp_number: Option<u32>,
    },
    /// ISDB-T.
    IsdbTerrestrial {
        /// Channel bandwidth in MHz.
        bandwidth: u32,
    },
    /// DVB-S / DVB-S2.
    Satellite {
        /// Symbol rate in ksym/s.
        symbol_rate: u32,
        polarization: Polarization,
        fec_rate: String,
    },
    /// DVB-C.
    Cable {
        /// Symbol rate in ksym/s.
        symbol_rate: u32,
        modulation: String,
    },
}

impl DeliverySystem {
    /// Short name used as the persisted element name.
    pub fn name(&self) -> &'static str {
        match self {
            DeliverySystem::File { .. } => "FileFrequency",
            DeliverySystem::Terrestrial { .. } => "TerrestrialFrequency",
            DeliverySystem::IsdbTerrestrial { .. } => "IsdbTerrestrialFrequency",
            DeliverySystem::Satellite { .. } => "SatelliteFrequency",
            DeliverySystem::Cable { .. } => "CableFrequency",
        }
    }

    fn same_variant(&self, other: &DeliverySystem) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn write_fields(&self, sink: &mut dyn ElementSink) -> Result<(), SinkError> {
        match self {
            DeliverySystem::File { path } => {
                sink.write_element("Path", &path.to_string_lossy())?;
            }
            DeliverySystem::Terrestrial { bandwidth, plp_number } => {
                sink.write_element("Bandwidth", &bandwidth.to_string())?;
                if let Some(plp) = plp_number {
                    sink.write_element("PlpNumber", &plp.to_string())?;
                }
            }
            DeliverySystem::IsdbTerrestrial { bandwidth } => {
                sink.write_element("Bandwidth", &bandwidth.to_string())?;
            }
            DeliverySystem::Satellite { symbol_rate, polarization, fec_rate } => {
                sink.write_element("SymbolRate", &symbol_rate.to_string())?;
                sink.write_element("Polarization", polarization.code())?;
                sink.write_element("FEC", fec_rate)?;
            }
            DeliverySystem::Cable { symbol_rate, modulation } => {
                sink.write_element("SymbolRate", &symbol_rate.to_string())?;
                sink.write_element("Modulation", modulation)?;
            }
        }
        Ok(())
    }
}

/// A tunable frequency.
///
/// Fields are public so the load phase can fill them in; after that the
/// value is treated as read-only by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    #[serde(flatten)]
    pub base: FrequencyBase,
    #[serde(flatten)]
    pub system: DeliverySystem,
}

impl Frequency {
    pub fn new(frequency: u32, channel_number: Option<u32>, system: DeliverySystem) -> Self {
        Self {
            base: FrequencyBase {
                frequency,
                channel_number,
            },
            system,
        }
    }

    /// A transport stream file. File sources carry no carrier frequency.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(0, None, DeliverySystem::File { path: path.into() })
    }

    pub fn terrestrial(frequency: u32, channel_number: Option<u32>, bandwidth: u32, plp_number: Option<u32>) -> Self {
        Self::new(
            frequency,
            channel_number,
            DeliverySystem::Terrestrial { bandwidth, plp_number },
        )
    }

    pub fn isdb_terrestrial(frequency: u32, channel_number: Option<u32>, bandwidth: u32) -> Self {
        Self::new(
            frequency,
            channel_number,
            DeliverySystem::IsdbTerrestrial { bandwidth },
        )
    }

    /// Carrier frequency in kHz.
    pub fn frequency(&self) -> u32 {
        self.base.frequency
    }

    pub fn channel_number(&self) -> Option<u32> {
        self.base.channel_number
    }

    /// Compare with another frequency at the given level.
    ///
    /// Frequencies of different delivery systems are never equal.
    pub fn equal_to(&self, other: &Frequency, level: EqualityLevel) -> bool {
        if !self.system.same_variant(&other.system) {
            return false;
        }
        if self.base != other.base {
            return false;
        }
        match level {
            EqualityLevel::Identity => true,
            EqualityLevel::Full => self.system == other.system,
        }
    }

    /// Human readable label for logs.
    pub fn describe(&self) -> String {
        if let DeliverySystem::File { path } = &self.system {
            return format!("File: {}", path.display());
        }

        let mhz = format!("{}.{:03} MHz", self.base.frequency / 1000, self.base.frequency % 1000);
        let label = match self.base.channel_number {
            Some(channel) => format!("Channel {} ({})", channel, mhz),
            None => mhz,
        };
        match &self.system {
            DeliverySystem::Satellite { polarization, .. } => {
                format!("{} {}", label, polarization.code())
            }
            _ => label,
        }
    }

    /// Write this frequency as one element.
    ///
    /// Delivery-system fields are written first, followed by the common
    /// fields. A sink failure is logged and returned; it is never fatal.
    pub fn serialize_to(&self, sink: &mut dyn ElementSink) -> Result<(), SerializeError> {
        self.write_element(sink).map_err(|source| {
            error!(
                "Failed to serialize {} to {}: {}",
                self.describe(),
                sink.target(),
                source
            );
            SerializeError::Write {
                item: self.describe(),
                target: sink.target().to_string(),
                source,
            }
        })
    }

    fn write_element(&self, sink: &mut dyn ElementSink) -> Result<(), SinkError> {
        sink.start_element(self.system.name())?;
        self.system.write_fields(sink)?;
        self.write_base_fields(sink)?;
        sink.end_element()
    }

    fn write_base_fields(&self, sink: &mut dyn ElementSink) -> Result<(), SinkError> {
        sink.write_element("Frequency", &self.base.frequency.to_string())?;
        if let Some(channel) = self.base.channel_number {
            sink.write_element("ChannelNumber", &channel.to_string())?;
        }
        Ok(())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkErrorKind;
    use crate::xml::XmlElementWriter;

    fn all_variants() -> Vec<Frequency> {
        vec![
            Frequency::file("/rec/capture.ts"),
            Frequency::terrestrial(522_000, Some(27), 8, Some(1)),
            Frequency::isdb_terrestrial(557_142, Some(27), 6),
            Frequency::new(
                11_727_480,
                None,
                DeliverySystem::Satellite {
                    symbol_rate: 28_860,
                    polarization: Polarization::Vertical,
                    fec_rate: "3/4".to_string(),
                },
            ),
            Frequency::new(
                474_000,
                None,
                DeliverySystem::Cable {
                    symbol_rate: 6_900,
                    modulation: "QAM256".to_string(),
                },
            ),
        ]
    }

    #[test]
    fn test_equal_to_is_reflexive() {
        for freq in all_variants() {
            assert!(freq.equal_to(&freq, EqualityLevel::Identity), "{}", freq);
            assert!(freq.equal_to(&freq, EqualityLevel::Full), "{}", freq);
        }
    }

    #[test]
    fn test_different_variants_never_equal() {
        let variants = all_variants();
        for (i, a) in variants.iter().enumerate() {
            for (j, b) in variants.iter().enumerate() {
                if i != j {
                    assert!(!a.equal_to(b, EqualityLevel::Identity));
                    assert!(!a.equal_to(b, EqualityLevel::Full));
                }
            }
        }

        // Same base fields, different delivery system.
        let dvb = Frequency::terrestrial(557_142, Some(27), 6, None);
        let isdb = Frequency::isdb_terrestrial(557_142, Some(27), 6);
        assert!(!dvb.equal_to(&isdb, EqualityLevel::Identity));
    }

    #[test]
    fn test_identity_ignores_payload() {
        let a = Frequency::terrestrial(522_000, Some(27), 8, Some(0));
        let b = Frequency::terrestrial(522_000, Some(27), 7, Some(1));

        assert!(a.equal_to(&b, EqualityLevel::Identity));
        assert!(!a.equal_to(&b, EqualityLevel::Full));
    }

    #[test]
    fn test_base_fields_always_compared() {
        let a = Frequency::isdb_terrestrial(557_142, Some(27), 6);
        let b = Frequency::isdb_terrestrial(557_142, Some(28), 6);
        let c = Frequency::isdb_terrestrial(563_142, Some(27), 6);

        assert!(!a.equal_to(&b, EqualityLevel::Identity));
        assert!(!a.equal_to(&c, EqualityLevel::Identity));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Frequency::terrestrial(522_000, Some(27), 8, Some(1));
        let mut copy = original.clone();
        assert!(original.equal_to(&copy, EqualityLevel::Full));

        copy.base.frequency = 530_000;
        if let DeliverySystem::Terrestrial { plp_number, .. } = &mut copy.system {
            *plp_number = Some(2);
        }

        assert_eq!(original.frequency(), 522_000);
        assert_eq!(
            original.system,
            DeliverySystem::Terrestrial { bandwidth: 8, plp_number: Some(1) }
        );
        assert!(!original.equal_to(&copy, EqualityLevel::Identity));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            Frequency::terrestrial(522_000, Some(27), 8, None).describe(),
            "Channel 27 (522.000 MHz)"
        );
        assert_eq!(
            Frequency::isdb_terrestrial(557_142, None, 6).to_string(),
            "557.142 MHz"
        );
        assert_eq!(Frequency::file("/rec/a.ts").describe(), "File: /rec/a.ts");
    }

    #[test]
    fn test_serialize_payload_before_base() {
        let freq = Frequency::terrestrial(522_000, Some(27), 8, Some(1));
        let mut writer = XmlElementWriter::new(Vec::new(), "memory");
        freq.serialize_to(&mut writer).unwrap();
        let xml = String::from_utf8(writer.finish().unwrap()).unwrap();

        let bandwidth = xml.find("<Bandwidth>8</Bandwidth>").unwrap();
        let plp = xml.find("<PlpNumber>1</PlpNumber>").unwrap();
        let frequency = xml.find("<Frequency>522000</Frequency>").unwrap();
        let channel = xml.find("<ChannelNumber>27</ChannelNumber>").unwrap();
        assert!(xml.starts_with("<TerrestrialFrequency>"));
        assert!(bandwidth < plp && plp < frequency && frequency < channel);
    }

    /// Sink that fails after a fixed number of successful calls.
    struct FailingSink {
        remaining: usize,
    }

    impl FailingSink {
        fn step(&mut self) -> Result<(), SinkError> {
            if self.remaining == 0 {
                return Err(SinkError::io("device not ready"));
            }
            self.remaining -= 1;
            Ok(())
        }
    }

    impl ElementSink for FailingSink {
        fn start_element(&mut self, _name: &str) -> Result<(), SinkError> {
            self.step()
        }

        fn write_element(&mut self, _name: &str, _text: &str) -> Result<(), SinkError> {
            self.step()
        }

        fn end_element(&mut self) -> Result<(), SinkError> {
            self.step()
        }

        fn target(&self) -> &str {
            "TuningFrequencies.xml"
        }
    }

    #[test]
    fn test_serialize_failure_returned_as_value() {
        let freq = Frequency::isdb_terrestrial(557_142, Some(27), 6);

        for budget in 0..5 {
            let mut sink = FailingSink { remaining: budget };
            let err = freq.serialize_to(&mut sink).unwrap_err();
            assert_eq!(err.kind(), SinkErrorKind::Io);
            let message = err.to_string();
            assert!(message.contains("TuningFrequencies.xml"));
            assert!(message.contains("Channel 27"));
        }

        let mut sink = FailingSink { remaining: 5 };
        assert!(freq.serialize_to(&mut sink).is_ok());
    }
}
