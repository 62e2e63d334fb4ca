use serde::{Deserialize, Serialize};

use crate::icon::Asset;

/// UI-ready weather observation, decoupled from the provider's JSON shape.
///
/// Replaced wholesale on every successful lookup; never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherViewModel {
    pub location: String,
    /// Floored, not rounded: 21.9 becomes 21 and -0.1 becomes -1.
    pub temperature_celsius: i32,
    pub humidity_percent: u8,
    pub wind_speed_mps: f64,
    pub icon: Asset,
}

impl WeatherViewModel {
    pub fn new(
        location: impl Into<String>,
        temperature: f64,
        humidity_percent: u8,
        wind_speed_mps: f64,
        icon: Asset,
    ) -> Self {
        Self {
            location: location.into(),
            temperature_celsius: floor_celsius(temperature),
            humidity_percent,
            wind_speed_mps,
            icon,
        }
    }
}

fn floor_celsius(temp: f64) -> i32 {
    temp.floor() as i32
}
