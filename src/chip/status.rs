/// Bits of the STATUS and INTERRUPT_MASK registers.
pub mod bits {
    pub const INVALID_COMMAND: u32 = 1 << 0;
    pub const LOW_SUPPLY: u32 = 1 << 1;
    pub const CURRENT_OSCILLATION: u32 = 1 << 2;
    pub const VOLTAGE_OSCILLATION: u32 = 1 << 3;
    pub const WATCHDOG: u32 = 1 << 4;
    pub const EOUT_OUT_OF_RANGE: u32 = 1 << 11;
    pub const ENERGY_OUT_OF_RANGE: u32 = 1 << 12;
    pub const VRMS_OUT_OF_RANGE: u32 = 1 << 13;
    pub const IRMS_OUT_OF_RANGE: u32 = 1 << 14;
    pub const POWER_OUT_OF_RANGE: u32 = 1 << 15;
    pub const VOLTAGE_OUT_OF_RANGE: u32 = 1 << 16;
    pub const CURRENT_OUT_OF_RANGE: u32 = 1 << 17;
    pub const MATH_ERROR: u32 = 1 << 19;
    pub const NEGATIVE_ENERGY: u32 = 1 << 21;
    pub const ENERGY_OUTPUT: u32 = 1 << 22;
    pub const DATA_READY: u32 = 1 << 23;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub invalid_command: bool,
    pub low_supply: bool,
    pub current_oscillation: bool,
    pub voltage_oscillation: bool,
    pub watchdog: bool,
    pub eout_out_of_range: bool,
    pub energy_out_of_range: bool,
    pub vrms_out_of_range: bool,
    pub irms_out_of_range: bool,
    pub power_out_of_range: bool,
    pub voltage_out_of_range: bool,
    pub current_out_of_range: bool,
    pub math_error: bool,
    pub negative_energy: bool,
    pub energy_output: bool,
    pub data_ready: bool,
}

impl Status {
    pub fn from_bits(raw: u32) -> Self {
        use bits::*;
        Self {
            invalid_command: raw & INVALID_COMMAND != 0,
            low_supply: raw & LOW_SUPPLY != 0,
            current_oscillation: raw & CURRENT_OSCILLATION != 0,
            voltage_oscillation: raw & VOLTAGE_OSCILLATION != 0,
            watchdog: raw & WATCHDOG != 0,
            eout_out_of_range: raw & EOUT_OUT_OF_RANGE != 0,
            energy_out_of_range: raw & ENERGY_OUT_OF_RANGE != 0,
            vrms_out_of_range: raw & VRMS_OUT_OF_RANGE != 0,
            irms_out_of_range: raw & IRMS_OUT_OF_RANGE != 0,
            power_out_of_range: raw & POWER_OUT_OF_RANGE != 0,
            voltage_out_of_range: raw & VOLTAGE_OUT_OF_RANGE != 0,
            current_out_of_range: raw & CURRENT_OUT_OF_RANGE != 0,
            math_error: raw & MATH_ERROR != 0,
            negative_energy: raw & NEGATIVE_ENERGY != 0,
            energy_output: raw & ENERGY_OUTPUT != 0,
            data_ready: raw & DATA_READY != 0,
        }
    }

    /// any of the range, oscillation or math faults
    pub fn has_fault(&self) -> bool {
        self.invalid_command
            || self.low_supply
            || self.current_oscillation
            || self.voltage_oscillation
            || self.eout_out_of_range
            || self.energy_out_of_range
            || self.vrms_out_of_range
            || self.irms_out_of_range
            || self.power_out_of_range
            || self.voltage_out_of_range
            || self.current_out_of_range
            || self.math_error
    }
}
