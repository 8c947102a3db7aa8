//! Declarative field maps: which register ranges decode to which named,
//! typed, scaled fields.
//!
//! A field map is static configuration, defined once. Changing a map changes
//! which fields appear in a [`RawFieldRecord`] but never the decoding
//! algorithm, which keeps the decoder generic and testable independently of
//! any one device's register layout.

use crate::record::RawFieldRecord;
use crate::registers::{DecodeError, RegisterBlock, Signedness};

/// A numeric field: `span` registers starting at `addr`, big-endian,
/// multiplied by a fixed decimal `scale` after sign interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericField {
    pub name: &'static str,
    pub addr: u16,
    pub span: u16,
    pub sign: Signedness,
    pub scale: f64,
}

/// A text field: `registers` registers starting at `addr`, two ASCII
/// characters per register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    pub name: &'static str,
    pub addr: u16,
    pub registers: u16,
}

/// The ordered field specifications applied to one register block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMap {
    pub numeric: &'static [NumericField],
    pub text: &'static [TextField],
}

impl FieldMap {
    /// Decode every declared field out of `block`.
    ///
    /// Fails with [`DecodeError::OutOfRangeField`] when any entry references
    /// registers the block does not cover; a mismatch between map and block
    /// is a configuration bug and must not be silently defaulted.
    pub fn decode(&self, block: &RegisterBlock) -> Result<RawFieldRecord, DecodeError> {
        let mut record = RawFieldRecord::new();
        for field in self.numeric {
            let raw = block.number_at(field.name, field.addr, field.span, field.sign)?;
            record.insert_number(field.name, raw as f64 * field.scale);
        }
        for field in self.text {
            let text = block.ascii_at(field.name, field.addr, field.registers)?;
            record.insert_text(field.name, text);
        }
        Ok(record)
    }
}

/// One register block to fetch from a device: the inclusive address range
/// and the fields decoded out of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpec {
    pub start: u16,
    pub end: u16,
    pub fields: FieldMap,
}

/// A full device description: the ordered, discontinuous register blocks
/// that together produce one [`RawFieldRecord`] per poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceMap {
    pub blocks: &'static [BlockSpec],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{put_ascii, put_number};

    const MAP: FieldMap = FieldMap {
        numeric: &[
            NumericField {
                name: "amperage",
                addr: 100,
                span: 1,
                sign: Signedness::Signed,
                scale: 0.01,
            },
            NumericField {
                name: "energyRemaining",
                addr: 101,
                span: 2,
                sign: Signedness::Unsigned,
                scale: 0.001,
            },
        ],
        text: &[TextField {
            name: "serial",
            addr: 103,
            registers: 3,
        }],
    };

    fn sample_block() -> RegisterBlock {
        let mut words = vec![0u16; 6];
        put_number(&mut words, 100, 100, 1, -250); // -2.50 A
        put_number(&mut words, 100, 101, 2, 96_000); // 96.000 kWh-scale units
        put_ascii(&mut words, 100, 103, "SN0042");
        RegisterBlock::new(100, 105, words).unwrap()
    }

    #[test]
    fn test_decode_applies_scale_and_sign() {
        let record = MAP.decode(&sample_block()).unwrap();
        assert_eq!(record.number("amperage"), Some(-2.5));
        assert_eq!(record.number("energyRemaining"), Some(96.0));
        assert_eq!(record.text("serial"), Some("SN0042"));
    }

    #[test]
    fn test_decode_is_pure() {
        let block = sample_block();
        assert_eq!(MAP.decode(&block).unwrap(), MAP.decode(&block).unwrap());
    }

    #[test]
    fn test_decode_surfaces_out_of_range_entry() {
        // Same fields, but the block only covers 100..=104: the serial's
        // last register falls outside.
        let words = vec![0u16; 5];
        let block = RegisterBlock::new(100, 104, words).unwrap();
        assert!(matches!(
            MAP.decode(&block),
            Err(DecodeError::OutOfRangeField { name: "serial", .. })
        ));
    }
}
