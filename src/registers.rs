//! Raw register blocks and the primitive decode operations on them.
//!
//! A BMS module exposes its telemetry as 16-bit holding registers. The
//! transport hands us a contiguous run of words covering an inclusive
//! absolute address range; this module interprets those words as integers
//! spanning one or more registers, or as packed ASCII text.

use thiserror::Error;

/// Signedness of a numeric register field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signedness {
    Unsigned,
    Signed,
}

/// Errors produced while interpreting a register block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The block's word count does not match its declared address range.
    #[error("malformed block: range {lo}..={hi} expects {expected} registers, got {actual}")]
    MalformedBlock {
        lo: u16,
        hi: u16,
        expected: usize,
        actual: usize,
    },
    /// A field map entry references registers outside the supplied block.
    /// This signals a field-map/block mismatch, i.e. a configuration bug.
    #[error("field '{name}': registers {addr}..{addr}+{count} outside block {lo}..={hi}")]
    OutOfRangeField {
        name: &'static str,
        addr: u16,
        count: u16,
        lo: u16,
        hi: u16,
    },
}

/// A contiguous run of 16-bit registers read from one device, addressable
/// by absolute register address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBlock {
    lo: u16,
    hi: u16,
    words: Vec<u16>,
}

impl RegisterBlock {
    /// Wrap raw words covering the inclusive range `lo..=hi`.
    ///
    /// Fails with [`DecodeError::MalformedBlock`] when the word count does
    /// not match the range.
    pub fn new(lo: u16, hi: u16, words: Vec<u16>) -> Result<Self, DecodeError> {
        let expected = if hi >= lo { usize::from(hi - lo) + 1 } else { 0 };
        if expected == 0 || words.len() != expected {
            return Err(DecodeError::MalformedBlock {
                lo,
                hi,
                expected,
                actual: words.len(),
            });
        }
        Ok(RegisterBlock { lo, hi, words })
    }

    /// First register address covered by this block.
    pub fn lo(&self) -> u16 {
        self.lo
    }

    /// Last register address covered by this block.
    pub fn hi(&self) -> u16 {
        self.hi
    }

    fn slice(&self, name: &'static str, addr: u16, count: u16) -> Result<&[u16], DecodeError> {
        let out_of_range = DecodeError::OutOfRangeField {
            name,
            addr,
            count,
            lo: self.lo,
            hi: self.hi,
        };
        if count == 0 || addr < self.lo {
            return Err(out_of_range);
        }
        let start = usize::from(addr - self.lo);
        let end = start + usize::from(count);
        self.words.get(start..end).ok_or(out_of_range)
    }

    /// Read `span` consecutive registers starting at `addr` as one integer.
    ///
    /// The first register holds the high-order half: registers are
    /// big-endian-concatenated into a `16 * span`-bit value, reinterpreted
    /// as two's complement when `sign` is [`Signedness::Signed`].
    pub fn number_at(
        &self,
        name: &'static str,
        addr: u16,
        span: u16,
        sign: Signedness,
    ) -> Result<i64, DecodeError> {
        let words = self.slice(name, addr, span)?;
        let mut raw: u64 = 0;
        for word in words {
            raw = (raw << 16) | u64::from(*word);
        }
        let bits = 16 * u32::from(span);
        let value = match sign {
            Signedness::Signed if bits < 64 && raw & (1u64 << (bits - 1)) != 0 => {
                (raw | (u64::MAX << bits)) as i64
            }
            _ => raw as i64,
        };
        Ok(value)
    }

    /// Read `count` registers starting at `addr` as packed ASCII text.
    ///
    /// Each register carries two characters (high byte first), so the result
    /// is always exactly `2 * count` characters long. Trailing fill bytes
    /// are preserved verbatim; trimming is the caller's policy.
    pub fn ascii_at(&self, name: &'static str, addr: u16, count: u16) -> Result<String, DecodeError> {
        let words = self.slice(name, addr, count)?;
        let mut text = String::with_capacity(2 * words.len());
        for word in words {
            text.push(char::from((word >> 8) as u8));
            text.push(char::from((word & 0xff) as u8));
        }
        Ok(text)
    }
}
