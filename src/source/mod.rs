//! Register source abstraction.
//!
//! The decode pipeline does not care where register blocks come from. This
//! module defines the fetch seam; the real Modbus TCP backend lives in
//! [`modbus`] behind the `modbus` feature, and tests substitute in-memory
//! fakes.

#[cfg(feature = "modbus")]
pub mod modbus;

use crate::registers::{DecodeError, RegisterBlock};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors produced while fetching a register block.
///
/// The pipeline treats every fetch error the same way: no data for this
/// device this cycle. Retry and backoff are the transport's business.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection-level failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The device answered with a protocol exception.
    #[error("device exception: {0}")]
    Exception(String),
    /// The device answered with the wrong number of registers.
    #[error(transparent)]
    Malformed(#[from] DecodeError),
}

/// Capability to read a register block from a device.
///
/// `fetch` reads holding registers `start..=end` from the device at Modbus
/// unit id `unit` and returns them as an addressable block.
pub trait RegisterSource: Send {
    fn fetch(
        &mut self,
        unit: u8,
        start: u16,
        end: u16,
    ) -> Pin<Box<dyn Future<Output = Result<RegisterBlock, FetchError>> + Send + '_>>;
}
