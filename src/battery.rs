//! Module-to-battery aggregation.
//!
//! A bank of BMS modules wired in parallel presents itself to the monitoring
//! system as one logical battery. Extensive quantities (current, charge) add
//! across parallel modules; intensive or representative quantities (voltage,
//! cycle count, derived percentages and times) are averaged. The aggregate's
//! identity is a pure function of the *set* of module serials, so it stays
//! stable across polls no matter what order the modules answered in.

use crate::module::Module;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors produced while aggregating modules into a battery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// Mean and identity are undefined over zero modules.
    #[error("cannot aggregate an empty module set")]
    EmptyModuleSet,
}

/// The aggregate over all modules polled in one cycle.
///
/// Recomputed in full each cycle; never partially updated.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    /// Non-negative identifier derived from the set of module serials.
    ///
    /// This is a CRC-32 of the deduplicated, sorted, `.`-joined serials,
    /// reinterpreted as a signed 32-bit value and made non-negative. It is
    /// collision-tolerant, not collision-free: consumers needing long-lived
    /// identity must accept the 32-bit risk.
    pub serial: u32,
    /// Deduplicated, sorted, `.`-joined manufacturer names.
    pub manufacturer_name: String,
    /// Deduplicated, sorted, `.`-joined model names.
    pub model: String,
    /// Sum across modules (extensive).
    pub amperage: f64,
    /// Sum across modules (extensive).
    pub energy_capacity: f64,
    /// Sum across modules (extensive).
    pub energy_remaining: f64,
    /// Mean across modules.
    pub cycle_number: f64,
    /// Mean across modules.
    pub energy: f64,
    /// Mean across modules.
    pub power: f64,
    /// Mean across modules; `0` sentinel semantics carry over from modules.
    pub time_to_empty: f64,
    /// Mean across modules; `0` sentinel semantics carry over from modules.
    pub time_to_full: f64,
    /// Mean across modules.
    pub voltage: f64,
}

impl Battery {
    /// Fold an ordered, non-empty sequence of modules into one battery.
    ///
    /// Duplicate modules are deliberately not deduplicated for the numeric
    /// fields: a serial appearing twice counts twice toward sums and the
    /// mean divisor. Only the identity derivation dedups.
    pub fn aggregate(modules: &[Module]) -> Result<Self, AggregateError> {
        if modules.is_empty() {
            return Err(AggregateError::EmptyModuleSet);
        }

        let mut amperage = 0.0;
        let mut cycle_number = 0.0;
        let mut energy = 0.0;
        let mut energy_capacity = 0.0;
        let mut energy_remaining = 0.0;
        let mut power = 0.0;
        let mut time_to_empty = 0.0;
        let mut time_to_full = 0.0;
        let mut voltage = 0.0;
        let mut manufacturer_names = Vec::with_capacity(modules.len());
        let mut models = Vec::with_capacity(modules.len());
        let mut serials = Vec::with_capacity(modules.len());

        for module in modules {
            amperage += module.amperage;
            cycle_number += module.cycle_number;
            energy += module.energy;
            energy_capacity += module.energy_capacity;
            energy_remaining += module.energy_remaining;
            power += module.power;
            time_to_empty += module.time_to_empty;
            time_to_full += module.time_to_full;
            voltage += module.voltage;
            manufacturer_names.push(module.manufacturer_name.as_str());
            models.push(module.model.as_str());
            serials.push(module.serial.as_str());
        }

        let count = modules.len() as f64;
        Ok(Battery {
            serial: serial_id(&serials),
            manufacturer_name: join_unique(&manufacturer_names),
            model: join_unique(&models),
            amperage,
            energy_capacity,
            energy_remaining,
            cycle_number: cycle_number / count,
            energy: energy / count,
            power: power / count,
            time_to_empty: time_to_empty / count,
            time_to_full: time_to_full / count,
            voltage: voltage / count,
        })
    }
}

/// Deduplicate, sort by byte order, and join with `.`.
fn join_unique(values: &[&str]) -> String {
    let unique: BTreeSet<&str> = values.iter().copied().collect();
    unique.into_iter().collect::<Vec<_>>().join(".")
}

/// Derive the battery identifier from the per-module serials.
///
/// The CRC-32 checksum of the joined serial string, with its signed
/// interpretation made non-negative by absolute value.
fn serial_id(serials: &[&str]) -> u32 {
    let joined = join_unique(serials);
    (crc32fast::hash(joined.as_bytes()) as i32).unsigned_abs()
}
