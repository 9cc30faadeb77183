use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use super::{pins::NoPin, spi::Cs5460SpiError, Cs5460Driver};

/// Drives the chip through a [`SpiDevice`], which owns chip select and frames each
/// transaction itself. Use this when the bus is shared with other devices, e.g. through
/// `embedded-hal-bus`.
///
/// Since chip select is not ours to toggle, [`sync`](Cs5460Driver::sync) releases RESET
/// just before the sync transaction instead of inside it.
pub struct Cs5460DeviceDriver<DEV, DELAY, RST = NoPin, EDIR = NoPin, EOUT = NoPin> {
    spi_device: DEV,
    pin_reset: Option<RST>,
    pin_edir: Option<EDIR>,
    pin_eout: Option<EOUT>,
    delay: DELAY,
}

impl<DEV, DELAY> Cs5460DeviceDriver<DEV, DELAY> {
    pub fn new(spi_device: DEV, delay: DELAY) -> Self {
        Self {
            spi_device,
            pin_reset: None,
            pin_edir: None,
            pin_eout: None,
            delay,
        }
    }
}

impl<DEV, DELAY, RST, EDIR, EOUT> Cs5460DeviceDriver<DEV, DELAY, RST, EDIR, EOUT> {
    pub fn with_reset<R>(self, pin_reset: R) -> Cs5460DeviceDriver<DEV, DELAY, R, EDIR, EOUT> {
        Cs5460DeviceDriver {
            spi_device: self.spi_device,
            pin_reset: Some(pin_reset),
            pin_edir: self.pin_edir,
            pin_eout: self.pin_eout,
            delay: self.delay,
        }
    }

    pub fn with_energy_direction<P>(self, pin_edir: P) -> Cs5460DeviceDriver<DEV, DELAY, RST, P, EOUT> {
        Cs5460DeviceDriver {
            spi_device: self.spi_device,
            pin_reset: self.pin_reset,
            pin_edir: Some(pin_edir),
            pin_eout: self.pin_eout,
            delay: self.delay,
        }
    }

    pub fn with_energy_output<P>(self, pin_eout: P) -> Cs5460DeviceDriver<DEV, DELAY, RST, EDIR, P> {
        Cs5460DeviceDriver {
            spi_device: self.spi_device,
            pin_reset: self.pin_reset,
            pin_edir: self.pin_edir,
            pin_eout: Some(pin_eout),
            delay: self.delay,
        }
    }

    pub fn release(self) -> (DEV, DELAY) {
        (self.spi_device, self.delay)
    }
}

impl<DEV, DELAY, RST, EDIR, EOUT> Cs5460Driver for Cs5460DeviceDriver<DEV, DELAY, RST, EDIR, EOUT>
where
    DEV: SpiDevice,
    DELAY: DelayNs,
    RST: OutputPin,
    EDIR: InputPin,
    EOUT: InputPin,
{
    type Error = Cs5460SpiError<DEV::Error>;

    fn transaction(&mut self, buf_tx: &[u8], buf_rx: &mut [u8]) -> Result<(), Self::Error> {
        self.spi_device
            .transfer(buf_rx, buf_tx)
            .map_err(Cs5460SpiError::Spi)
    }

    fn sync(&mut self, pattern: &[u8]) -> Result<(), Self::Error> {
        if let Some(pin_reset) = self.pin_reset.as_mut() {
            pin_reset.set_high().map_err(|_| Cs5460SpiError::Pin)?;
        }
        self.spi_device.write(pattern).map_err(Cs5460SpiError::Spi)
    }

    fn has_reset_line(&self) -> bool {
        self.pin_reset.is_some()
    }

    fn hardware_reset(&mut self, pulse_us: u32) -> Result<(), Self::Error> {
        let Some(pin_reset) = self.pin_reset.as_mut() else {
            return Ok(());
        };
        pin_reset.set_low().map_err(|_| Cs5460SpiError::Pin)?;
        self.delay.delay_us(pulse_us);
        pin_reset.set_high().map_err(|_| Cs5460SpiError::Pin)?;
        self.delay.delay_us(pulse_us);
        Ok(())
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn energy_direction(&mut self) -> Result<Option<bool>, Self::Error> {
        match self.pin_edir.as_mut() {
            Some(pin) => pin.is_high().map(Some).map_err(|_| Cs5460SpiError::Pin),
            None => Ok(None),
        }
    }

    fn energy_output(&mut self) -> Result<Option<bool>, Self::Error> {
        match self.pin_eout.as_mut() {
            Some(pin) => pin.is_high().map(Some).map_err(|_| Cs5460SpiError::Pin),
            None => Ok(None),
        }
    }
}
