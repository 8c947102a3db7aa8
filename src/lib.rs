//! `battery-bridge` library.
//!
//! Polls battery-management telemetry exposed as Modbus holding registers by
//! multiple BMS modules, decodes the raw words into typed engineering units,
//! aggregates the per-module readings into one logical battery, and
//! republishes both levels as MQTT state topics.
//!
//! The binary (`src/main.rs`) is responsible for CLI parsing, transport
//! setup, and process exit codes. The core pipeline lives in [`crate::app`]
//! where it can be tested deterministically with an injected register source
//! and publish sink.

pub mod app;
pub mod battery;
pub mod bms;
pub mod fieldmap;
pub mod module;
pub mod record;
pub mod registers;
pub mod sink;
pub mod source;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types at the crate root
pub use battery::{AggregateError, Battery};
pub use fieldmap::{BlockSpec, DeviceMap, FieldMap, NumericField, TextField};
pub use module::{Module, ModuleError};
pub use record::RawFieldRecord;
pub use registers::{DecodeError, RegisterBlock, Signedness};
pub use sink::{PublishError, PublishSink, battery_states, module_states};
pub use source::{FetchError, RegisterSource};
