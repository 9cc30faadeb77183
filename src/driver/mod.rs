pub mod device;
pub mod pins;
pub mod spi;

/// Transport between the chip logic and the physical bus.
///
/// Every call to [`Cs5460Driver::transaction`] is one complete select → transfer → deselect
/// span; implementations must not split it or let other traffic interleave.
pub trait Cs5460Driver {
    type Error;

    /// full-duplex exchange of `buf_tx.len()` bytes, framed by a single chip select pulse.
    /// `buf_rx` has the same length as `buf_tx`.
    fn transaction(&mut self, buf_tx: &[u8], buf_rx: &mut [u8]) -> Result<(), Self::Error>;

    // The serial port is initialized to command mode by three or more SYNC1 bytes followed by
    // one SYNC0. The reset line (if wired) is released inside the same chip select span.
    fn sync(&mut self, pattern: &[u8]) -> Result<(), Self::Error>;

    /// true if a RESET line is wired, decided once at construction
    fn has_reset_line(&self) -> bool;

    /// pulse RESET low for `pulse_us`, then hold it high for another `pulse_us`
    fn hardware_reset(&mut self, pulse_us: u32) -> Result<(), Self::Error>;

    fn delay_us(&mut self, us: u32);

    /// level of the EDIR pin, `None` if not wired
    fn energy_direction(&mut self) -> Result<Option<bool>, Self::Error>;

    /// level of the EOUT pin, `None` if not wired
    fn energy_output(&mut self) -> Result<Option<bool>, Self::Error>;
}
