use serde::{Deserialize, Serialize};

/// CHIP_RESET bit of the CONFIG register, triggers a software reset
pub const CHIP_RESET: u32 = 1 << 7;

#[allow(unused)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cs5460CurrentGain {
    /// ±250 mV input range
    #[default]
    X10 = 0,
    /// ±50 mV input range
    X50 = 1,
}

#[allow(unused)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoftInterrupt {
    /// INT held low while asserted
    #[default]
    Low = 0,
    High = 1,
    FallingEdge = 2,
    RisingEdge = 3,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipConfiguration {
    /// clock divider K, 4 bits; 1 for a 4.096 MHz crystal
    pub clock_divider: u8,
    pub invert_cpu_clock: bool,
    pub current_high_pass: bool,
    pub voltage_high_pass: bool,
    /// software-driven EDIR / EOUT levels, only used with `energy_pins_software`
    pub edir_level: bool,
    pub eout_level: bool,
    pub energy_pins_software: bool,
    pub soft_interrupt: SoftInterrupt,
    /// 2 bit phase compensation
    pub phase_compensation: u8,
    pub wire_and: bool,
    pub current_gain: Cs5460CurrentGain,
}

impl Default for ChipConfiguration {
    fn default() -> Self {
        Self {
            clock_divider: 1,
            invert_cpu_clock: false,
            current_high_pass: false,
            voltage_high_pass: false,
            edir_level: false,
            eout_level: false,
            energy_pins_software: false,
            soft_interrupt: Default::default(),
            phase_compensation: 0,
            wire_and: false,
            current_gain: Default::default(),
        }
    }
}

impl ChipConfiguration {
    /// value of the CONFIG register; CHIP_RESET is never set
    pub fn to_bits(&self) -> u32 {
        let mut config = self.clock_divider as u32 & 0xF;
        config |= (self.invert_cpu_clock as u32) << 4;
        config |= (self.current_high_pass as u32) << 5;
        config |= (self.voltage_high_pass as u32) << 6;
        config |= (self.edir_level as u32) << 8;
        config |= (self.eout_level as u32) << 9;
        config |= (self.energy_pins_software as u32) << 10;
        config |= (self.soft_interrupt as u32) << 11;
        config |= (self.phase_compensation as u32 & 0x3) << 13;
        config |= (self.wire_and as u32) << 15;
        config |= (self.current_gain as u32) << 16;
        config
    }

    pub fn from_bits(bits: u32) -> Self {
        let soft_interrupt = match (bits >> 11) & 0x3 {
            0 => SoftInterrupt::Low,
            1 => SoftInterrupt::High,
            2 => SoftInterrupt::FallingEdge,
            _ => SoftInterrupt::RisingEdge,
        };
        let current_gain = if bits & (1 << 16) != 0 {
            Cs5460CurrentGain::X50
        } else {
            Cs5460CurrentGain::X10
        };
        Self {
            clock_divider: (bits & 0xF) as u8,
            invert_cpu_clock: bits & (1 << 4) != 0,
            current_high_pass: bits & (1 << 5) != 0,
            voltage_high_pass: bits & (1 << 6) != 0,
            edir_level: bits & (1 << 8) != 0,
            eout_level: bits & (1 << 9) != 0,
            energy_pins_software: bits & (1 << 10) != 0,
            soft_interrupt,
            phase_compensation: ((bits >> 13) & 0x3) as u8,
            wire_and: bits & (1 << 15) != 0,
            current_gain,
        }
    }
}
