use crate::module::Module;
use crate::record::RawFieldRecord;

/// Encode `value` into `span` big-endian registers at absolute address
/// `addr`, inside a word buffer whose first word sits at address `lo`.
pub fn put_number(words: &mut [u16], lo: u16, addr: u16, span: u16, value: i64) {
    let start = usize::from(addr - lo);
    let raw = value as u64;
    for i in 0..usize::from(span) {
        let shift = 16 * (usize::from(span) - 1 - i);
        words[start + i] = ((raw >> shift) & 0xffff) as u16;
    }
}

/// Encode ASCII text (two characters per register) at absolute address
/// `addr`, inside a word buffer whose first word sits at address `lo`.
pub fn put_ascii(words: &mut [u16], lo: u16, addr: u16, text: &str) {
    assert!(text.len() % 2 == 0, "text must fill whole registers");
    let start = usize::from(addr - lo);
    for (i, pair) in text.as_bytes().chunks(2).enumerate() {
        words[start + i] = (u16::from(pair[0]) << 8) | u16::from(pair[1]);
    }
}

/// Build a raw field record carrying the fields [`Module::derive`] needs.
pub fn sample_record(
    serial: &str,
    amperage: f64,
    voltage: f64,
    energy_remaining: f64,
    energy_capacity: f64,
    cycle_number: f64,
) -> RawFieldRecord {
    let mut record = RawFieldRecord::new();
    record.insert_number("amperage", amperage);
    record.insert_number("voltage", voltage);
    record.insert_number("energyRemaining", energy_remaining);
    record.insert_number("energyCapacity", energy_capacity);
    record.insert_number("cycleNumber", cycle_number);
    record.insert_text("serial", serial.to_string());
    record.insert_text("manufacturerName", "ACME ENERGY".to_string());
    record.insert_text("model", "PB-5000".to_string());
    record
}

/// Build a derived module straight from sample raw fields.
pub fn sample_module(
    serial: &str,
    amperage: f64,
    voltage: f64,
    energy_remaining: f64,
    energy_capacity: f64,
    cycle_number: f64,
) -> Module {
    Module::derive(sample_record(
        serial,
        amperage,
        voltage,
        energy_remaining,
        energy_capacity,
        cycle_number,
    ))
    .expect("sample record carries every required field")
}
