#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(non_camel_case_types, unused)]
pub enum Reg {
    /// configuration register
    CONFIG = 0x00,
    /// current channel DC offset
    CURRENT_OFFSET = 0x01,
    /// current channel gain
    CURRENT_GAIN = 0x02,
    /// voltage channel DC offset
    VOLTAGE_OFFSET = 0x03,
    /// voltage channel gain
    VOLTAGE_GAIN = 0x04,
    /// number of A/D conversions per computation cycle
    CYCLE_COUNT = 0x05,
    /// energy-to-frequency output pulse rate
    PULSE_RATE = 0x06,
    /// last instantaneous current sample
    LAST_CURRENT = 0x07,
    /// last instantaneous voltage sample
    LAST_VOLTAGE = 0x08,
    /// last instantaneous power sample
    LAST_POWER = 0x09,
    /// energy accumulated over the last computation cycle
    TOTAL_ENERGY = 0x0A,
    /// RMS current over the last computation cycle
    RMS_CURRENT = 0x0B,
    /// RMS voltage over the last computation cycle
    RMS_VOLTAGE = 0x0C,
    /// time base calibration
    TIME_BASE_CALIBRATION = 0x0D,
    /// status register, bits are cleared by writing ones
    STATUS = 0x0F,
    /// interrupt mask, same bit layout as STATUS
    INTERRUPT_MASK = 0x1A,
}

impl Reg {
    /// register number shifted into the command byte; bit 0 is unused, bit 6 selects write
    pub fn addr(&self) -> u8 {
        2 * (*self as u8)
    }
}
