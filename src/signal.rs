use serde::{Deserialize, Serialize};
use std::fmt;

/// RSSI mapped to 0% on the bar
pub const RSSI_FLOOR: i32 = -100;
/// Width of the dBm window mapped onto the bar
pub const RSSI_SPAN: i32 = 60;

/// Signal strength bucket used to color the RSSI bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalClass {
    Strong,
    Moderate,
    Weak,
}

impl SignalClass {
    pub fn from_rssi(rssi: i32) -> Self {
        if rssi > -60 {
            SignalClass::Strong
        } else if rssi > -80 {
            SignalClass::Moderate
        } else {
            SignalClass::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalClass::Strong => "strong",
            SignalClass::Moderate => "moderate",
            SignalClass::Weak => "weak",
        }
    }
}

impl fmt::Display for SignalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bar fill for `rssi` in percent, clamped to `0..=100`
pub fn width_percent(rssi: i32) -> f64 {
    let percent = (f64::from(rssi) - f64::from(RSSI_FLOOR)) * 100.0 / f64::from(RSSI_SPAN);
    percent.clamp(0.0, 100.0)
}

/// CSS-style width for the RSSI bar, e.g. `"83.33%"`.
///
/// Rounded to two decimals; whole numbers print without a fraction.
pub fn calculate_width(rssi: i32) -> String {
    let rounded = (width_percent(rssi) * 100.0).round() / 100.0;
    format!("{rounded}%")
}
