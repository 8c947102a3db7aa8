//! Register map for the supported BMS modules.
//!
//! The modules expose their telemetry as three discontinuous holding
//! register blocks. Addresses, spans, signedness, and decimal scales follow
//! the vendor register documentation; the map is plain data, so supporting
//! a different device means writing a different table, not a different
//! decoder.

use crate::fieldmap::{BlockSpec, DeviceMap, FieldMap, NumericField, TextField};
use crate::registers::Signedness::{Signed, Unsigned};

/// Modbus unit ids the modules answer on by default.
pub const DEFAULT_UNITS: [u8; 4] = [48, 49, 50, 51];

const fn number(
    name: &'static str,
    addr: u16,
    span: u16,
    sign: crate::registers::Signedness,
    scale: f64,
) -> NumericField {
    NumericField {
        name,
        addr,
        span,
        sign,
        scale,
    }
}

const fn text(name: &'static str, addr: u16, registers: u16) -> TextField {
    TextField {
        name,
        addr,
        registers,
    }
}

/// Cell-level block: per-cell voltages and temperatures.
const CELL_FIELDS: FieldMap = FieldMap {
    numeric: &[
        number("cellVoltageCount", 5000, 1, Unsigned, 1.0),
        number("cell01Voltage", 5001, 1, Unsigned, 0.1),
        number("cell02Voltage", 5002, 1, Unsigned, 0.1),
        number("cell03Voltage", 5003, 1, Unsigned, 0.1),
        number("cell04Voltage", 5004, 1, Unsigned, 0.1),
        number("cell05Voltage", 5005, 1, Unsigned, 0.1),
        number("cell06Voltage", 5006, 1, Unsigned, 0.1),
        number("cell07Voltage", 5007, 1, Unsigned, 0.1),
        number("cell08Voltage", 5008, 1, Unsigned, 0.1),
        number("cell09Voltage", 5009, 1, Unsigned, 0.1),
        number("cell10Voltage", 5010, 1, Unsigned, 0.1),
        number("cell11Voltage", 5011, 1, Unsigned, 0.1),
        number("cell12Voltage", 5012, 1, Unsigned, 0.1),
        number("cell13Voltage", 5013, 1, Unsigned, 0.1),
        number("cell14Voltage", 5014, 1, Unsigned, 0.1),
        number("cell15Voltage", 5015, 1, Unsigned, 0.1),
        number("cell16Voltage", 5016, 1, Unsigned, 0.1),
        number("cellTempCount", 5017, 1, Unsigned, 1.0),
        number("cell01Temp", 5018, 1, Signed, 0.1),
        number("cell02Temp", 5019, 1, Signed, 0.1),
        number("cell03Temp", 5020, 1, Signed, 0.1),
        number("cell04Temp", 5021, 1, Signed, 0.1),
        number("cell05Temp", 5022, 1, Signed, 0.1),
        number("cell06Temp", 5023, 1, Signed, 0.1),
        number("cell07Temp", 5024, 1, Signed, 0.1),
        number("cell08Temp", 5025, 1, Signed, 0.1),
        number("cell09Temp", 5026, 1, Signed, 0.1),
        number("cell10Temp", 5027, 1, Signed, 0.1),
        number("cell11Temp", 5028, 1, Signed, 0.1),
        number("cell12Temp", 5029, 1, Signed, 0.1),
        number("cell13Temp", 5030, 1, Signed, 0.1),
        number("cell14Temp", 5031, 1, Signed, 0.1),
        number("cell15Temp", 5032, 1, Signed, 0.1),
        number("cell16Temp", 5033, 1, Signed, 0.1),
    ],
    text: &[],
};

/// Pack-level block: temperatures, current, voltage, charge counters,
/// operating limits.
const PACK_FIELDS: FieldMap = FieldMap {
    numeric: &[
        number("bmsTemp", 5035, 1, Signed, 0.1),
        number("envTempCount", 5036, 1, Unsigned, 1.0),
        number("env01Temp", 5037, 1, Signed, 0.1),
        number("env02Temp", 5038, 1, Signed, 0.1),
        number("heaterTempCount", 5039, 1, Unsigned, 1.0),
        number("heater01Temp", 5040, 1, Signed, 0.1),
        number("heater02Temp", 5041, 1, Signed, 0.1),
        number("amperage", 5042, 1, Signed, 0.01),
        number("voltage", 5043, 1, Unsigned, 0.1),
        number("energyRemaining", 5044, 2, Unsigned, 0.001),
        number("energyCapacity", 5046, 2, Unsigned, 0.001),
        number("cycleNumber", 5048, 1, Signed, 1.0),
        number("chargeVoltageLimit", 5049, 1, Signed, 0.1),
        number("dischargeVoltageLimit", 5050, 1, Signed, 0.1),
        number("chargeCurrentLimit", 5051, 1, Signed, 0.01),
        number("dischargeCurrentLimit", 5052, 1, Signed, 0.01),
    ],
    text: &[],
};

/// Status block: alarm words, status words, and identity strings.
const STATUS_FIELDS: FieldMap = FieldMap {
    numeric: &[
        number("alarminfoCellVoltage", 5100, 2, Unsigned, 1.0),
        number("alarminfoCellTemperature", 5102, 2, Unsigned, 1.0),
        number("alarminfoOther", 5104, 2, Unsigned, 1.0),
        number("status1", 5106, 1, Unsigned, 1.0),
        number("status2", 5107, 1, Unsigned, 1.0),
        number("status3", 5108, 1, Unsigned, 1.0),
        number("statusChargeDischarge", 5109, 1, Unsigned, 1.0),
    ],
    text: &[
        text("serial", 5110, 8),
        text("manufacturerVersion", 5118, 1),
        text("mainlineVersion", 5119, 2),
        text("communicationProtocolVersion", 5121, 1),
        text("model", 5122, 8),
        text("softwareVersion", 5130, 2),
        text("manufacturerName", 5132, 10),
    ],
};

/// The full per-device map: the three register blocks fetched each poll.
pub const DEVICE_MAP: DeviceMap = DeviceMap {
    blocks: &[
        BlockSpec {
            start: 5000,
            end: 5034,
            fields: CELL_FIELDS,
        },
        BlockSpec {
            start: 5035,
            end: 5053,
            fields: PACK_FIELDS,
        },
        BlockSpec {
            start: 5100,
            end: 5142,
            fields: STATUS_FIELDS,
        },
    ],
};
