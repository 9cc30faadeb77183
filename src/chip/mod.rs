mod registers;
pub use registers::Reg;

mod commands;
pub use commands::*;

mod configuration;
pub use configuration::*;

mod status;
pub use status::{bits as status_bits, Status};

use log::{debug, trace, warn};

use crate::calibration::{
    signed_to_float, unsigned_to_float, CalibrationRecord, CalibrationTimeout, Gains, REGISTER_MASK,
};
use crate::config::Cs5460Config;
use crate::driver::Cs5460Driver;
use crate::error::Error;

/// minimum reset pulse width and settle time, in microseconds
pub const RESET_PULSE_US: u32 = 50;

/// A CS5460 on a [`Cs5460Driver`].
///
/// Owns the driver, so bus access is serialized by `&mut self`. Every register access is one
/// complete chip select frame.
pub struct Cs5460<D: Cs5460Driver> {
    driver: D,
    gains: Gains,
    calibration_timeout: Option<CalibrationTimeout>,
}

impl<D: Cs5460Driver> Cs5460<D> {
    /// unit gains and untimed calibration; no bus traffic
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            gains: Gains::default(),
            calibration_timeout: None,
        }
    }

    /// gains and calibration timeout from `config`; the chip itself is not touched, see
    /// [`configure`](Self::configure)
    pub fn with_config(driver: D, config: &Cs5460Config) -> Self {
        Self {
            driver,
            gains: Gains::new(config.current_gain, config.voltage_gain),
            calibration_timeout: config.calibration_timeout,
        }
    }

    pub fn free(self) -> D {
        self.driver
    }

    /// Sends the sync sequence so the serial port is in command mode, releasing RESET first
    /// if it is wired.
    pub fn initialize(&mut self) -> Result<(), Error<D::Error>> {
        debug!("cs5460: sending sync sequence");
        self.driver.sync(&SYNC_SEQUENCE).map_err(Error::Driver)
    }

    /// 24 bit register content, MSB first on the wire
    pub fn read_register(&mut self, reg: Reg) -> Result<u32, Error<D::Error>> {
        let buf_tx = [reg.addr() & !WRITE_REGISTER, SYNC1, SYNC1, SYNC1];
        let mut buf_rx = [0u8; 4];
        self.driver
            .transaction(&buf_tx, &mut buf_rx)
            .map_err(Error::Driver)?;
        let value = u32::from_be_bytes([0, buf_rx[1], buf_rx[2], buf_rx[3]]);
        trace!("cs5460: read {:?} = {:#08x}", reg, value);
        Ok(value)
    }

    /// writes the low 24 bits of `value`, MSB first; higher bits are dropped
    pub fn write_register(&mut self, reg: Reg, value: u32) -> Result<(), Error<D::Error>> {
        let buf_tx = [
            reg.addr() | WRITE_REGISTER,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ];
        let mut buf_rx = [0u8; 4];
        trace!("cs5460: write {:?} = {:#08x}", reg, value & REGISTER_MASK);
        self.driver
            .transaction(&buf_tx, &mut buf_rx)
            .map_err(Error::Driver)
    }

    /// single command byte without data phase
    pub fn send(&mut self, command: u8) -> Result<(), Error<D::Error>> {
        let mut buf_rx = [0u8; 1];
        self.driver
            .transaction(&[command], &mut buf_rx)
            .map_err(Error::Driver)
    }

    /// clears the STATUS bits set in `mask`
    pub fn clear_status(&mut self, mask: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::STATUS, mask)
    }

    pub fn start_single_conversion(&mut self) -> Result<(), Error<D::Error>> {
        self.send(START_SINGLE_CONVERSION)
    }

    pub fn start_multi_conversion(&mut self) -> Result<(), Error<D::Error>> {
        self.send(START_MULTI_CONVERSION)
    }

    /// wakes the chip from power-down and halts any running conversion
    pub fn power_up_halt(&mut self) -> Result<(), Error<D::Error>> {
        self.send(POWER_UP_HALT)
    }

    pub fn power_down(&mut self, mode: PowerDownMode) -> Result<(), Error<D::Error>> {
        self.send(mode.command())
    }

    /// Hardware reset through RESET if wired, otherwise a software reset through CONFIG.
    pub fn reset_chip(&mut self) -> Result<(), Error<D::Error>> {
        if self.driver.has_reset_line() {
            debug!("cs5460: hardware reset");
            self.driver
                .hardware_reset(RESET_PULSE_US)
                .map_err(Error::Driver)
        } else {
            debug!("cs5460: software reset");
            self.write_register(Reg::CONFIG, CHIP_RESET)?;
            self.driver.delay_us(RESET_PULSE_US);
            Ok(())
        }
    }

    /// writes `config` to CONFIG
    pub fn configure(&mut self, config: &ChipConfiguration) -> Result<(), Error<D::Error>> {
        let bits = config.to_bits();
        debug!("cs5460: configuration {:#08x}", bits);
        self.write_register(Reg::CONFIG, bits)
    }

    pub fn read_configuration(&mut self) -> Result<ChipConfiguration, Error<D::Error>> {
        Ok(ChipConfiguration::from_bits(self.read_register(Reg::CONFIG)?))
    }

    // ---------------------------------------------------------------------
    // calibration

    /// Runs an on-chip calibration and waits for data ready, then clears it.
    ///
    /// Waits forever unless a [`CalibrationTimeout`] was configured, in which case this behaves
    /// like [`calibrate_with_timeout`](Self::calibrate_with_timeout).
    pub fn calibrate(&mut self, target: CalibrationTarget) -> Result<(), Error<D::Error>> {
        let timeout = self.calibration_timeout;
        self.calibrate_inner(target, timeout)
    }

    pub fn calibrate_with_timeout(
        &mut self,
        target: CalibrationTarget,
        timeout: CalibrationTimeout,
    ) -> Result<(), Error<D::Error>> {
        self.calibrate_inner(target, Some(timeout))
    }

    fn calibrate_inner(
        &mut self,
        target: CalibrationTarget,
        timeout: Option<CalibrationTimeout>,
    ) -> Result<(), Error<D::Error>> {
        let command = target.command();
        debug!("cs5460: calibration command {:#04x}", command);
        self.send(command)?;

        let mut polls = 0u32;
        loop {
            if let Some(timeout) = timeout {
                if polls >= timeout.max_polls {
                    warn!("cs5460: calibration {:#04x} timed out after {} polls", command, polls);
                    return Err(Error::CalibrationTimeout { polls });
                }
                if polls > 0 && timeout.poll_interval_us > 0 {
                    self.driver.delay_us(timeout.poll_interval_us);
                }
            }
            let status = self.status()?;
            polls = polls.saturating_add(1);
            if status & status_bits::DATA_READY != 0 {
                break;
            }
        }

        debug!("cs5460: calibration done after {} polls", polls);
        self.clear_status(status_bits::DATA_READY)
    }

    pub fn calibrate_voltage_offset(&mut self) -> Result<u32, Error<D::Error>> {
        self.calibrate(CalibrationTarget::VOLTAGE | CalibrationTarget::OFFSET)?;
        self.read_register(Reg::VOLTAGE_OFFSET)
    }

    pub fn calibrate_voltage_gain(&mut self) -> Result<u32, Error<D::Error>> {
        self.calibrate(CalibrationTarget::VOLTAGE | CalibrationTarget::GAIN)?;
        self.read_register(Reg::VOLTAGE_GAIN)
    }

    pub fn calibrate_current_offset(&mut self) -> Result<u32, Error<D::Error>> {
        self.calibrate(CalibrationTarget::CURRENT | CalibrationTarget::OFFSET)?;
        self.read_register(Reg::CURRENT_OFFSET)
    }

    pub fn calibrate_current_gain(&mut self) -> Result<u32, Error<D::Error>> {
        self.calibrate(CalibrationTarget::CURRENT | CalibrationTarget::GAIN)?;
        self.read_register(Reg::CURRENT_GAIN)
    }

    pub fn set_calibration_timeout(&mut self, timeout: Option<CalibrationTimeout>) {
        self.calibration_timeout = timeout;
    }

    pub fn set_current_offset(&mut self, raw: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::CURRENT_OFFSET, raw)
    }

    pub fn set_current_gain_register(&mut self, raw: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::CURRENT_GAIN, raw)
    }

    pub fn set_voltage_offset(&mut self, raw: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::VOLTAGE_OFFSET, raw)
    }

    pub fn set_voltage_gain_register(&mut self, raw: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::VOLTAGE_GAIN, raw)
    }

    /// reads the four calibration registers together with the current software gains
    pub fn capture_calibration(&mut self) -> Result<CalibrationRecord, Error<D::Error>> {
        Ok(CalibrationRecord {
            current_offset: self.read_register(Reg::CURRENT_OFFSET)?,
            current_gain: self.read_register(Reg::CURRENT_GAIN)?,
            voltage_offset: self.read_register(Reg::VOLTAGE_OFFSET)?,
            voltage_gain: self.read_register(Reg::VOLTAGE_GAIN)?,
            current_scale: self.gains.current(),
            voltage_scale: self.gains.voltage(),
        })
    }

    /// writes a previously captured record back, e.g. after a reset
    pub fn restore_calibration(&mut self, record: &CalibrationRecord) -> Result<(), Error<D::Error>> {
        debug!("cs5460: restoring calibration {:?}", record);
        self.set_current_offset(record.current_offset)?;
        self.set_current_gain_register(record.current_gain)?;
        self.set_voltage_offset(record.voltage_offset)?;
        self.set_voltage_gain_register(record.voltage_gain)?;
        self.gains = Gains::new(record.current_scale, record.voltage_scale);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // gains

    pub fn set_current_gain(&mut self, gain: f64) {
        self.gains.set_current(gain);
    }

    pub fn set_voltage_gain(&mut self, gain: f64) {
        self.gains.set_voltage(gain);
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    // ---------------------------------------------------------------------
    // measurements

    pub fn raw_current(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::LAST_CURRENT)
    }

    pub fn current(&mut self) -> Result<f64, Error<D::Error>> {
        Ok(signed_to_float(self.raw_current()?) * self.gains.current())
    }

    pub fn raw_voltage(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::LAST_VOLTAGE)
    }

    pub fn voltage(&mut self) -> Result<f64, Error<D::Error>> {
        Ok(signed_to_float(self.raw_voltage()?) * self.gains.voltage())
    }

    pub fn raw_power(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::LAST_POWER)
    }

    pub fn power(&mut self) -> Result<f64, Error<D::Error>> {
        Ok(signed_to_float(self.raw_power()?) * self.gains.power())
    }

    pub fn raw_energy(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::TOTAL_ENERGY)
    }

    /// energy of the last computation cycle
    pub fn energy(&mut self) -> Result<f64, Error<D::Error>> {
        Ok(signed_to_float(self.raw_energy()?) * self.gains.power())
    }

    pub fn raw_rms_current(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::RMS_CURRENT)
    }

    pub fn rms_current(&mut self) -> Result<f64, Error<D::Error>> {
        Ok(unsigned_to_float(self.raw_rms_current()?) * self.gains.current())
    }

    pub fn raw_rms_voltage(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::RMS_VOLTAGE)
    }

    pub fn rms_voltage(&mut self) -> Result<f64, Error<D::Error>> {
        Ok(unsigned_to_float(self.raw_rms_voltage()?) * self.gains.voltage())
    }

    /// RMS current times RMS voltage times the power gain. The RMS values already carry their
    /// own gains, so the power gain is applied on top of them.
    pub fn apparent_power(&mut self) -> Result<f64, Error<D::Error>> {
        Ok(self.rms_current()? * self.rms_voltage()? * self.gains.power())
    }

    /// Not finite when the apparent power is zero (no load); callers have to check.
    pub fn power_factor(&mut self) -> Result<f64, Error<D::Error>> {
        Ok(self.power()? / self.apparent_power()?)
    }

    /// raw STATUS register
    pub fn status(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::STATUS)
    }

    pub fn read_status(&mut self) -> Result<Status, Error<D::Error>> {
        Ok(Status::from_bits(self.status()?))
    }

    // ---------------------------------------------------------------------
    // misc registers and pins

    pub fn interrupt_mask(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::INTERRUPT_MASK)
    }

    /// same bit layout as STATUS, see [`status_bits`]
    pub fn set_interrupt_mask(&mut self, mask: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::INTERRUPT_MASK, mask)
    }

    pub fn cycle_count(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::CYCLE_COUNT)
    }

    /// conversions per computation cycle
    pub fn set_cycle_count(&mut self, count: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::CYCLE_COUNT, count)
    }

    pub fn pulse_rate(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::PULSE_RATE)
    }

    pub fn set_pulse_rate(&mut self, raw: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::PULSE_RATE, raw)
    }

    pub fn time_base_calibration(&mut self) -> Result<u32, Error<D::Error>> {
        self.read_register(Reg::TIME_BASE_CALIBRATION)
    }

    pub fn set_time_base_calibration(&mut self, raw: u32) -> Result<(), Error<D::Error>> {
        self.write_register(Reg::TIME_BASE_CALIBRATION, raw)
    }

    /// EDIR level, `None` if the pin is not wired
    pub fn energy_direction(&mut self) -> Result<Option<bool>, Error<D::Error>> {
        self.driver.energy_direction().map_err(Error::Driver)
    }

    /// EOUT level, `None` if the pin is not wired
    pub fn energy_output(&mut self) -> Result<Option<bool>, Error<D::Error>> {
        self.driver.energy_output().map_err(Error::Driver)
    }
}
