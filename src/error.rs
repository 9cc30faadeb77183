use core::fmt;

/// Error of a chip operation, generic over the transport error of the driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// the bus or a control line failed
    Driver(E),
    /// a bounded calibration saw no data-ready flag within its poll budget
    CalibrationTimeout { polls: u32 },
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Driver(e) => write!(f, "driver error: {e:?}"),
            Error::CalibrationTimeout { polls } => {
                write!(f, "calibration not ready after {polls} status polls")
            }
        }
    }
}
