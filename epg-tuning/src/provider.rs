//! Tuning providers and their frequency lists.

use log::debug;

use crate::frequency::Frequency;
use crate::sorted::{SortedEntry, SortedUniqueList};

/// Frequencies are ordered and deduplicated by carrier frequency alone.
///
/// Two entries with the same carrier value but a different delivery system
/// or payload are treated as duplicates.
impl SortedEntry for Frequency {
    type Key = u32;

    fn sort_key(&self) -> &u32 {
        &self.base.frequency
    }

    fn is_duplicate_of(&self, other: &Self) -> bool {
        self.base.frequency == other.base.frequency
    }
}

/// A named source of tuning frequencies (a satellite, a terrestrial area, a
/// cable operator).
#[derive(Debug, Clone, Default)]
pub struct TuningProvider {
    pub name: String,
    frequencies: SortedUniqueList<Frequency>,
}

impl TuningProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frequencies: SortedUniqueList::new(),
        }
    }

    /// Add a frequency in ascending carrier order.
    ///
    /// Returns false when a frequency with the same carrier value is already
    /// present; the new one is dropped.
    pub fn add_frequency(&mut self, frequency: Frequency) -> bool {
        let description = frequency.describe();
        let added = self.frequencies.insert(frequency);
        if !added {
            debug!("Provider {}: dropped duplicate frequency {}", self.name, description);
        }
        added
    }

    pub fn frequencies(&self) -> &SortedUniqueList<Frequency> {
        &self.frequencies
    }

    /// Frequency with the given carrier value.
    pub fn find_frequency(&self, frequency: u32) -> Option<&Frequency> {
        self.frequencies.find(&frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::EqualityLevel;

    fn carriers(provider: &TuningProvider) -> Vec<u32> {
        provider.frequencies().iter().map(|f| f.frequency()).collect()
    }

    #[test]
    fn test_frequencies_sorted_ascending() {
        let mut provider = TuningProvider::new("Crystal Palace");
        provider.add_frequency(Frequency::terrestrial(500, None, 8, None));
        provider.add_frequency(Frequency::terrestrial(300, None, 8, None));
        provider.add_frequency(Frequency::terrestrial(700, None, 8, None));

        assert_eq!(carriers(&provider), vec![300, 500, 700]);
    }

    #[test]
    fn test_duplicate_carrier_dropped_regardless_of_payload() {
        let mut provider = TuningProvider::new("Crystal Palace");
        provider.add_frequency(Frequency::terrestrial(500, None, 8, None));
        provider.add_frequency(Frequency::terrestrial(300, None, 8, None));
        provider.add_frequency(Frequency::terrestrial(700, None, 8, None));

        assert!(!provider.add_frequency(Frequency::terrestrial(300, Some(5), 7, Some(1))));
        assert!(!provider.add_frequency(Frequency::isdb_terrestrial(300, None, 6)));
        assert_eq!(provider.frequencies().len(), 3);

        // The first entry stays.
        let kept = provider.find_frequency(300).unwrap();
        assert!(kept.equal_to(&Frequency::terrestrial(300, None, 8, None), EqualityLevel::Full));
    }
}
