use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use super::{pins::NoPin, Cs5460Driver};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cs5460SpiError<E> {
    Spi(E),
    Pin,
}

/// Drives the chip through an exclusively owned [`SpiBus`] and a manually toggled chip select.
///
/// RESET, EDIR and EOUT are optional; attach them with [`with_reset`](Self::with_reset),
/// [`with_energy_direction`](Self::with_energy_direction) and
/// [`with_energy_output`](Self::with_energy_output). Construction does not touch any line.
pub struct Cs5460SpiDriver<SPI, CS, DELAY, RST = NoPin, EDIR = NoPin, EOUT = NoPin> {
    spi_bus: SPI,
    pin_cs: CS,
    pin_reset: Option<RST>,
    pin_edir: Option<EDIR>,
    pin_eout: Option<EOUT>,
    delay: DELAY,
}

impl<SPI, CS, DELAY> Cs5460SpiDriver<SPI, CS, DELAY> {
    pub fn new(spi_bus: SPI, pin_cs: CS, delay: DELAY) -> Self {
        Self {
            spi_bus,
            pin_cs,
            pin_reset: None,
            pin_edir: None,
            pin_eout: None,
            delay,
        }
    }
}

impl<SPI, CS, DELAY, RST, EDIR, EOUT> Cs5460SpiDriver<SPI, CS, DELAY, RST, EDIR, EOUT> {
    pub fn with_reset<R>(self, pin_reset: R) -> Cs5460SpiDriver<SPI, CS, DELAY, R, EDIR, EOUT> {
        Cs5460SpiDriver {
            spi_bus: self.spi_bus,
            pin_cs: self.pin_cs,
            pin_reset: Some(pin_reset),
            pin_edir: self.pin_edir,
            pin_eout: self.pin_eout,
            delay: self.delay,
        }
    }

    pub fn with_energy_direction<P>(self, pin_edir: P) -> Cs5460SpiDriver<SPI, CS, DELAY, RST, P, EOUT> {
        Cs5460SpiDriver {
            spi_bus: self.spi_bus,
            pin_cs: self.pin_cs,
            pin_reset: self.pin_reset,
            pin_edir: Some(pin_edir),
            pin_eout: self.pin_eout,
            delay: self.delay,
        }
    }

    pub fn with_energy_output<P>(self, pin_eout: P) -> Cs5460SpiDriver<SPI, CS, DELAY, RST, EDIR, P> {
        Cs5460SpiDriver {
            spi_bus: self.spi_bus,
            pin_cs: self.pin_cs,
            pin_reset: self.pin_reset,
            pin_edir: self.pin_edir,
            pin_eout: Some(pin_eout),
            delay: self.delay,
        }
    }

    /// gives back the bus, chip select and delay; optional pins are dropped
    pub fn release(self) -> (SPI, CS, DELAY) {
        (self.spi_bus, self.pin_cs, self.delay)
    }
}

impl<SPI, CS, DELAY, RST, EDIR, EOUT> Cs5460Driver for Cs5460SpiDriver<SPI, CS, DELAY, RST, EDIR, EOUT>
where
    SPI: SpiBus,
    CS: OutputPin,
    DELAY: DelayNs,
    RST: OutputPin,
    EDIR: InputPin,
    EOUT: InputPin,
{
    type Error = Cs5460SpiError<SPI::Error>;

    fn transaction(&mut self, buf_tx: &[u8], buf_rx: &mut [u8]) -> Result<(), Self::Error> {
        self.pin_cs.set_low().map_err(|_| Cs5460SpiError::Pin)?;
        let result = self
            .spi_bus
            .transfer(buf_rx, buf_tx)
            .and_then(|_| self.spi_bus.flush());
        // deselect even if the transfer failed, the chip must see the frame end
        let deselect = self.pin_cs.set_high();
        result.map_err(Cs5460SpiError::Spi)?;
        deselect.map_err(|_| Cs5460SpiError::Pin)
    }

    fn sync(&mut self, pattern: &[u8]) -> Result<(), Self::Error> {
        self.pin_cs.set_low().map_err(|_| Cs5460SpiError::Pin)?;
        let released = match self.pin_reset.as_mut() {
            Some(pin_reset) => pin_reset.set_high().map_err(|_| Cs5460SpiError::Pin),
            None => Ok(()),
        };
        // no sync bytes while RESET may still be held low
        let result = released.and_then(|_| {
            self.spi_bus
                .write(pattern)
                .and_then(|_| self.spi_bus.flush())
                .map_err(Cs5460SpiError::Spi)
        });
        let deselect = self.pin_cs.set_high();
        result?;
        deselect.map_err(|_| Cs5460SpiError::Pin)
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
