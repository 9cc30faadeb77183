/// single-byte commands, sent without a data phase
pub const START_SINGLE_CONVERSION: u8 = 0xE0;
pub const START_MULTI_CONVERSION: u8 = 0xE8;
pub const SYNC0: u8 = 0xFE;
pub const SYNC1: u8 = 0xFF;
pub const POWER_UP_HALT: u8 = 0xA0;
pub const CALIBRATE_CONTROL: u8 = 0xC0;

/// set in the command byte of a register write, cleared for a read
pub const WRITE_REGISTER: u8 = 0x40;

/// three SYNC1 followed by SYNC0 put the serial port into command mode
pub const SYNC_SEQUENCE: [u8; 4] = [SYNC1, SYNC1, SYNC1, SYNC0];

/// Selector bits of the calibration command.
///
/// Combine a channel with a kind, e.g. `CalibrationTarget::CURRENT | CalibrationTarget::GAIN`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CalibrationTarget(u8);

impl CalibrationTarget {
    pub const OFFSET: Self = Self(0x01);
    pub const GAIN: Self = Self(0x02);
    pub const CURRENT: Self = Self(0x08);
    pub const VOLTAGE: Self = Self(0x10);
    pub const CURRENT_VOLTAGE: Self = Self(0x18);
    pub const ALL: Self = Self(0x1B);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// full command byte for this target
    pub const fn command(self) -> u8 {
        CALIBRATE_CONTROL | (self.0 & Self::ALL.0)
    }
}

impl core::ops::BitOr for CalibrationTarget {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[allow(unused)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PowerDownMode {
    /// software power-down, oscillator keeps running
    #[default]
    Standby = 0x80,
    Mode1 = 0x88,
    /// sleep, lowest consumption
    Sleep = 0x90,
    Mode3 = 0x98,
}

impl PowerDownMode {
    pub fn command(self) -> u8 {
        self as u8
    }
}
