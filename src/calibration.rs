use crate::Response;

/// Idle command payload used for tag detection calibration.
///
/// Byte 11 is the DAC high threshold and is overwritten with each candidate value.
pub const CALIBRATION_PAYLOAD: [u8; 14] = [
    0x03, 0xA1, 0x00, 0xF8, 0x01, 0x18, 0x00, 0x20, 0x60, 0x60, 0x00, 0x00, 0x3F, 0x01,
];

/// Offset of the DAC high threshold inside [`CALIBRATION_PAYLOAD`].
pub const DAC_OFFSET: usize = 11;

/// Candidate thresholds tried, in order, by [`FixedSweep`].
pub const SWEEP_VALUES: [u8; 8] = [0x00, 0xFC, 0x7C, 0x3C, 0x5C, 0x6C, 0x74, 0x70];

/// Chooses the DAC threshold values sent during calibration.
///
/// The driver asks for a value, sends it, drains the chip's reply and hands
/// that reply back on the next call. Returning `None` ends calibration.
pub trait Calibration {
    fn next_value(&mut self, previous: Option<&Response>) -> Option<u8>;
}

/// Open-loop sweep over [`SWEEP_VALUES`], ignoring what the chip answers.
#[derive(Debug, Default, Clone)]
pub struct FixedSweep {
    index: usize,
}

impl FixedSweep {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Calibration for FixedSweep {
    fn next_value(&mut self, _previous: Option<&Response>) -> Option<u8> {
        let value = SWEEP_VALUES.get(self.index).copied()?;
        self.index += 1;
        Some(value)
    }
}

/// Builds the Idle payload carrying `dac` as its threshold.
pub fn calibration_payload(dac: u8) -> [u8; 14] {
    let mut payload = CALIBRATION_PAYLOAD;
    payload[DAC_OFFSET] = dac;
    payload
}
