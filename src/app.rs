//! Poll-cycle orchestration (business logic) for `battery-bridge`.
//!
//! This module is intentionally decoupled from CLI parsing, process exit
//! codes, and the real transports, so a full cycle can be tested
//! deterministically with an in-memory register source and a recording
//! publish sink.

use crate::battery::{AggregateError, Battery};
use crate::fieldmap::DeviceMap;
use crate::module::{Module, ModuleError};
use crate::record::RawFieldRecord;
use crate::registers::DecodeError;
use crate::sink::{self, PublishError, PublishSink};
use crate::source::{FetchError, RegisterSource};
use clap::Parser;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Configuration for the poll loop.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Hostname of the Modbus TCP gateway the modules sit behind.
    #[arg(long, default_value = "localhost")]
    pub modbus_host: String,

    /// Port of the Modbus TCP gateway.
    #[arg(long, default_value_t = 502)]
    pub modbus_port: u16,

    /// Hostname of the MQTT broker.
    #[arg(long, default_value = "localhost")]
    pub mqtt_broker: String,

    /// Port of the MQTT broker.
    #[arg(long, default_value_t = 1883)]
    pub mqtt_port: u16,

    /// MQTT client identifier.
    #[arg(long, default_value = "battery-bridge")]
    pub mqtt_client_id: String,

    /// Modbus unit id of a battery module; repeat for each module.
    /// Devices are polled in the order given.
    #[arg(long = "unit", value_name = "UNIT", default_values_t = crate::bms::DEFAULT_UNITS)]
    pub units: Vec<u8>,

    /// Delay between poll cycles.
    /// Accepts duration with suffix: 3s, 1m, 500ms, 2h.
    /// Without suffix, value is interpreted as seconds.
    #[arg(long, value_parser = parse_duration, default_value = "30s")]
    pub interval: Duration,
}

/// Errors that abort a poll cycle.
///
/// Fetch failures for individual devices do not show up here; they only
/// withhold that device's module from the cycle. What does abort a cycle is
/// a configuration bug (field map vs. block mismatch, missing field) or a
/// failing publish transport.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Fetch and decode every register block for one device.
///
/// Returns `Ok(None)` when any fetch fails: a transport error or a
/// malformed response means "no data for this device this cycle", never a
/// pipeline error. Decode errors are configuration bugs and propagate.
async fn query_device(
    source: &mut dyn RegisterSource,
    map: &DeviceMap,
    unit: u8,
) -> Result<Option<RawFieldRecord>, DecodeError> {
    let mut record = RawFieldRecord::new();
    for spec in map.blocks {
        let block = match source.fetch(unit, spec.start, spec.end).await {
            Ok(block) => block,
            Err(error) => {
                warn!(unit, %error, "no data from module this cycle");
                return Ok(None);
            }
        };
        record.merge(spec.fields.decode(&block)?);
    }
    Ok(Some(record))
}

/// Run one poll cycle: query every module, publish each module's states,
/// then aggregate and publish the battery's states.
///
/// Returns the aggregated battery, or `None` when no module answered (the
/// per-module publishes that did happen are kept).
pub async fn run_cycle(
    source: &mut dyn RegisterSource,
    sink: &mut dyn PublishSink,
    map: &DeviceMap,
    units: &[u8],
) -> Result<Option<Battery>, RunError> {
    let mut modules: Vec<Module> = Vec::with_capacity(units.len());
    for &unit in units {
        info!(unit, "querying module");
        let Some(record) = query_device(source, map, unit).await? else {
            continue;
        };
        let module = Module::derive(record)?;
        for (topic, payload) in sink::module_states(&module) {
            sink.publish(topic, payload, false).await?;
        }
        modules.push(module);
    }

    let battery = match Battery::aggregate(&modules) {
        Ok(battery) => battery,
        Err(AggregateError::EmptyModuleSet) => {
            warn!("no modules answered; skipping battery publish this cycle");
            return Ok(None);
        }
    };
    for (topic, payload) in sink::battery_states(&battery) {
        sink.publish(topic, payload, false).await?;
    }
    Ok(Some(battery))
}

/// Poll forever at the configured interval.
pub async fn run(
    options: &Options,
    source: &mut dyn RegisterSource,
    sink: &mut dyn PublishSink,
) -> Result<(), RunError> {
    loop {
        run_cycle(source, sink, &crate::bms::DEVICE_MAP, &options.units).await?;
        tokio::time::sleep(options.interval).await;
    }
}

/// Parse a duration from a human-readable string.
///
/// Supports the suffixes `ms`, `s`, `m`, and `h`; a bare number is
/// interpreted as seconds.
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    let src = src.trim();
    if src.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (number, multiplier_ms) = if let Some(num) = src.strip_suffix("ms") {
        (num, 1)
    } else if let Some(num) = src.strip_suffix('h') {
        (num, 3_600_000)
    } else if let Some(num) = src.strip_suffix('m') {
        (num, 60_000)
    } else if let Some(num) = src.strip_suffix('s') {
        (num, 1000)
    } else {
        (src, 1000)
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {src}"))?;
    Ok(Duration::from_millis(value * multiplier_ms))
}
