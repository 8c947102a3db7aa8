//! Per-module metric derivation.

use crate::record::RawFieldRecord;
use thiserror::Error;

/// Errors produced while deriving a [`Module`] from a raw field record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// The field map produced no field with this name. Like an out-of-range
    /// map entry, this signals a configuration bug, not a bad reading.
    #[error("raw field record has no '{0}' field")]
    MissingField(&'static str),
}

/// One physical device's decoded and derived metric set for one poll cycle.
///
/// A `Module` is constructed fresh each cycle from a [`RawFieldRecord`] and
/// never mutated afterwards; the next cycle's reading supersedes it. Its
/// identity is the device's `serial` text field.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub serial: String,
    pub manufacturer_name: String,
    pub model: String,
    /// Current in A; negative while discharging.
    pub amperage: f64,
    /// Pack voltage in V.
    pub voltage: f64,
    /// Remaining charge in Ah.
    pub energy_remaining: f64,
    /// Total charge capacity in Ah.
    pub energy_capacity: f64,
    pub cycle_number: f64,
    /// State of charge in percent. Non-finite when the reported capacity is
    /// zero; that is "no reading", not an error.
    pub energy: f64,
    /// Instantaneous power in W.
    pub power: f64,
    /// Hours until full while charging, `0` otherwise.
    pub time_to_full: f64,
    /// Hours until empty while discharging, `0` otherwise.
    pub time_to_empty: f64,
    /// The full decoded record this module was derived from.
    pub record: RawFieldRecord,
}

impl Module {
    /// Derive a module from a decoded field record.
    ///
    /// The four derivations are pure functions of the record:
    /// state of charge, power, and the two time estimates. `0` is the
    /// "not applicable" sentinel for both time fields (a module that is not
    /// charging has no time-to-full), deliberately distinct from absence;
    /// mapping it to a human "unavailable" label happens at the publish
    /// boundary.
    pub fn derive(record: RawFieldRecord) -> Result<Self, ModuleError> {
        let number = |name: &'static str| record.number(name).ok_or(ModuleError::MissingField(name));
        let text = |name: &'static str| {
            record
                .text(name)
                .map(str::to_owned)
                .ok_or(ModuleError::MissingField(name))
        };

        let amperage = number("amperage")?;
        let voltage = number("voltage")?;
        let energy_remaining = number("energyRemaining")?;
        let energy_capacity = number("energyCapacity")?;
        let cycle_number = number("cycleNumber")?;
        let serial = text("serial")?;
        let manufacturer_name = text("manufacturerName")?;
        let model = text("model")?;

        let time_to_full = if amperage > 0.0 {
            (energy_capacity - energy_remaining) / amperage
        } else {
            0.0
        };
        let time_to_empty = if amperage < 0.0 {
            (energy_remaining / amperage).abs()
        } else {
            0.0
        };

        Ok(Module {
            serial,
            manufacturer_name,
            model,
            amperage,
            voltage,
            energy_remaining,
            energy_capacity,
            cycle_number,
            energy: 100.0 * (energy_remaining / energy_capacity),
            power: amperage * voltage,
            time_to_full,
            time_to_empty,
            record,
        })
    }
}
