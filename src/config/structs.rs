use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationTimeout;
use crate::chip::ChipConfiguration;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Cs5460Config {
    /// amperes at full scale of the current channel
    pub current_gain: f64,
    /// volts at full scale of the voltage channel
    pub voltage_gain: f64,
    // None waits for data ready forever
    pub calibration_timeout: Option<CalibrationTimeout>,
    // written to the CONFIG register by `Cs5460::configure`
    pub chip: ChipConfiguration,
}

impl Default for Cs5460Config {
    fn default() -> Self {
        Self {
            current_gain: 1.0,
            voltage_gain: 1.0,
            calibration_timeout: None,
            chip: Default::default(),
        }
    }
}
