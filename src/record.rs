//! Decoded raw fields for one device poll.

use std::collections::BTreeMap;

/// The decoded, scaled fields of one physical module for one poll cycle.
///
/// A record maps field names to either scaled numeric values or text. It is
/// produced by applying a field map to each of the device's register blocks
/// and merging the partial results; once complete it is immutable and is
/// consumed by [`crate::module::Module::derive`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawFieldRecord {
    numbers: BTreeMap<&'static str, f64>,
    texts: BTreeMap<&'static str, String>,
}

impl RawFieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a scaled numeric field.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.numbers.get(name).copied()
    }

    /// Look up a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    pub(crate) fn insert_number(&mut self, name: &'static str, value: f64) {
        self.numbers.insert(name, value);
    }

    pub(crate) fn insert_text(&mut self, name: &'static str, value: String) {
        self.texts.insert(name, value);
    }

    /// Fold another partial record into this one.
    ///
    /// Used to combine the results of decoding the several discontinuous
    /// register blocks that make up one device's telemetry.
    pub fn merge(&mut self, other: RawFieldRecord) {
        self.numbers.extend(other.numbers);
        self.texts.extend(other.texts);
    }

    /// Number of decoded fields, numeric and text combined.
    pub fn len(&self) -> usize {
        self.numbers.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty() && self.texts.is_empty()
    }

    /// Iterate over the numeric fields in name order.
    pub fn numbers(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.numbers.iter().map(|(name, value)| (*name, *value))
    }

    /// Iterate over the text fields in name order.
    pub fn texts(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.texts.iter().map(|(name, value)| (*name, value.as_str()))
    }
}
