use serde::{Deserialize, Serialize};

/// mask of the 24 data bits of every register
pub const REGISTER_MASK: u32 = 0x00FF_FFFF;
/// bit 23, sign of the two's complement registers
pub const SIGN_BIT: u32 = 1 << 23;
/// 2^23 - 1, full scale of the signed registers
pub const SIGNED_OUTPUT_MAX: u32 = REGISTER_MASK >> 1;
/// 2^24 - 1, full scale of the unsigned registers
pub const UNSIGNED_OUTPUT_MAX: u32 = REGISTER_MASK;

/// Signed fixed point register value to a fraction of full scale, roughly [-1, 1).
///
/// Negative values have the sign bit removed and full scale subtracted, so 0x800000 maps to
/// -1.0 and 0xFFFFFF maps to 0.0. Bits above 23 are ignored.
pub fn signed_to_float(raw: u32) -> f64 {
    let raw = raw & REGISTER_MASK;
    let value = if raw & SIGN_BIT != 0 {
        (raw ^ SIGN_BIT) as i32 - SIGNED_OUTPUT_MAX as i32
    } else {
        raw as i32
    };
    value as f64 / SIGNED_OUTPUT_MAX as f64
}

/// Unsigned fixed point register value to a fraction of full scale, [0, 1].
pub fn unsigned_to_float(raw: u32) -> f64 {
    (raw & REGISTER_MASK) as f64 / UNSIGNED_OUTPUT_MAX as f64
}

/// Software gains turning normalized chip output into physical units.
///
/// The power gain is derived and always equals `current * voltage`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gains {
    current: f64,
    voltage: f64,
    power: f64,
}

impl Default for Gains {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Gains {
    pub fn new(current: f64, voltage: f64) -> Self {
        Self {
            current,
            voltage,
            power: current * voltage,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn set_current(&mut self, gain: f64) {
        self.current = gain;
        self.power = self.current * self.voltage;
    }

    pub fn set_voltage(&mut self, gain: f64) {
        self.voltage = gain;
        self.power = self.current * self.voltage;
    }
}

/// Bounds the data-ready polling of a calibration.
///
/// The status register is read at most `max_polls` times with `poll_interval_us` between
/// reads, so the wait is roughly `max_polls * poll_interval_us` plus bus time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationTimeout {
    pub max_polls: u32,
    pub poll_interval_us: u32,
}

impl Default for CalibrationTimeout {
    fn default() -> Self {
        // calibration takes about one computation cycle, 1 s at default cycle count
        Self {
            max_polls: 2_000,
            poll_interval_us: 1_000,
        }
    }
}

/// Result of an on-chip calibration plus the software gains in use at the time.
///
/// The chip loses its offset and gain registers on reset, so this is what gets stored and
/// written back.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    pub current_offset: u32,
    pub current_gain: u32,
    pub voltage_offset: u32,
    pub voltage_gain: u32,
    /// software current gain, amperes at full scale
    pub current_scale: f64,
    /// software voltage gain, volts at full scale
    pub voltage_scale: f64,
}

impl Default for CalibrationRecord {
    fn default() -> Self {
        // chip reset values: zero offsets, unity gain (0x400000 = 1.0)
        Self {
            current_offset: 0,
            current_gain: 0x400000,
            voltage_offset: 0,
            voltage_gain: 0x400000,
            current_scale: 1.0,
            voltage_scale: 1.0,
        }
    }
}
