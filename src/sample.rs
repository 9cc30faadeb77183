use crate::calibration::{signed_to_float, unsigned_to_float};
use crate::chip::{Cs5460, Reg, Status};
use crate::driver::Cs5460Driver;
use crate::error::Error;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSample {
    pub current: u32,
    pub voltage: u32,
    pub power: u32,
    pub energy: u32,
    pub rms_current: u32,
    pub rms_voltage: u32,
    pub status: u32,
}

/// One reading of every measurement register, with gains applied.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    pub current: f64,
    pub voltage: f64,
    pub power: f64,
    pub energy: f64,
    pub rms_current: f64,
    pub rms_voltage: f64,
    /// `rms_current * rms_voltage * power gain`
    pub apparent_power: f64,
    /// `power / apparent_power`, not finite without load
    pub power_factor: f64,
    pub status: Status,
}

pub fn read_raw_sample<D: Cs5460Driver>(chip: &mut Cs5460<D>) -> Result<RawSample, Error<D::Error>> {
    use Reg::*;
    Ok(RawSample {
        current: chip.read_register(LAST_CURRENT)?,
        voltage: chip.read_register(LAST_VOLTAGE)?,
        power: chip.read_register(LAST_POWER)?,
        energy: chip.read_register(TOTAL_ENERGY)?,
        rms_current: chip.read_register(RMS_CURRENT)?,
        rms_voltage: chip.read_register(RMS_VOLTAGE)?,
        status: chip.read_register(STATUS)?,
    })
}

impl<D: Cs5460Driver> Cs5460<D> {
    /// Reads each measurement register once and derives apparent power and power factor from
    /// those same readings.
    pub fn read_measurement(&mut self) -> Result<Measurement, Error<D::Error>> {
        let raw = read_raw_sample(self)?;
        let gains = self.gains();

        let power = signed_to_float(raw.power) * gains.power();
        let rms_current = unsigned_to_float(raw.rms_current) * gains.current();
        let rms_voltage = unsigned_to_float(raw.rms_voltage) * gains.voltage();
        let apparent_power = rms_current * rms_voltage * gains.power();

        Ok(Measurement {
            current: signed_to_float(raw.current) * gains.current(),
            voltage: signed_to_float(raw.voltage) * gains.voltage(),
            power,
            energy: signed_to_float(raw.energy) * gains.power(),
            rms_current,
            rms_voltage,
            apparent_power,
            power_factor: power / apparent_power,
            status: Status::from_bits(raw.status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::status_bits;
    use crate::testing::SimChip;

    #[test]
    fn snapshot_matches_individual_getters() {
        let sim = SimChip::new();
        sim.set_register(Reg::LAST_CURRENT, 0x200000);
        sim.set_register(Reg::LAST_VOLTAGE, 0xC00000);
        sim.set_register(Reg::LAST_POWER, 0x100000);
        sim.set_register(Reg::TOTAL_ENERGY, 0x080000);
        sim.set_register(Reg::RMS_CURRENT, 0x800000);
        sim.set_register(Reg::RMS_VOLTAGE, 0x400000);
        sim.set_register(Reg::STATUS, status_bits::DATA_READY);

        let mut chip = Cs5460::new(sim.driver());
        chip.set_current_gain(10.0);
        chip.set_voltage_gain(400.0);

        let sample = chip.read_measurement().unwrap();

        assert_eq!(sample.current, chip.current().unwrap());
        assert_eq!(sample.voltage, chip.voltage().unwrap());
        assert_eq!(sample.power, chip.power().unwrap());
        assert_eq!(sample.energy, chip.energy().unwrap());
        assert_eq!(sample.rms_current, chip.rms_current().unwrap());
        assert_eq!(sample.rms_voltage, chip.rms_voltage().unwrap());
        assert_eq!(sample.apparent_power, chip.apparent_power().unwrap());
        assert_eq!(sample.power_factor, chip.power_factor().unwrap());
        assert!(sample.status.data_ready);
        assert!(sample.voltage < 0.0);
    }

    #[test]
    fn raw_sample_reads_each_register_once() {
        let sim = SimChip::new();
        let mut chip = Cs5460::new(sim.driver());

        let raw = read_raw_sample(&mut chip).unwrap();

        assert_eq!(raw, RawSample::default());
        assert_eq!(sim.status_reads(), 1);
        let commands: Vec<u8> = sim.sent_bytes().chunks(4).map(|frame| frame[0]).collect();
        assert_eq!(commands, [0x0E, 0x10, 0x12, 0x14, 0x16, 0x18, 0x1E]);
    }
}
