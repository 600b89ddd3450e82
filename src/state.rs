//! State readout - resistance/conductance conversion with bounded scaling
//!
//! A device stores raw resistance. Consumers read it either as resistance or
//! as conductance (`g = 1/r`), optionally remapped into the device's own
//! achievable range:
//!
//! | Quantity    | Scaled 0 at | Scaled 1 at |
//! |-------------|-------------|-------------|
//! | Resistance  | `r_min`     | `r_max`     |
//! | Conductance | `r_max`     | `r_min`     |
//!
//! Every reading is offset by machine epsilon so no consumer ever sees an
//! exact zero, then multiplied by a gain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Offset added to every reading
pub const EPSILON: f64 = f64::EPSILON;

/// Default gain applied to readings
pub const DEFAULT_GAIN: f64 = 1e4;

/// Physical quantity a reading is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Resistance,
    #[default]
    Conductance,
}

impl Quantity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resistance => "resistance",
            Self::Conductance => "conductance",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resistance" => Ok(Self::Resistance),
            "conductance" => Ok(Self::Conductance),
            other => Err(Error::InvalidArgument(format!(
                "unknown quantity '{}', expected 'resistance' or 'conductance'",
                other
            ))),
        }
    }
}

/// Convert a resistance into a reading.
///
/// `resistance`, `r_min` and `r_max` must be strictly positive with
/// `r_min < r_max`; device constructors guarantee this, so the divisions
/// below are always defined.
pub fn read_state(
    resistance: f64,
    r_min: f64,
    r_max: f64,
    quantity: Quantity,
    scaled: bool,
    gain: f64,
) -> f64 {
    let value = match (quantity, scaled) {
        (Quantity::Resistance, false) => resistance,
        (Quantity::Resistance, true) => (resistance - r_min) / (r_max - r_min),
        (Quantity::Conductance, false) => 1.0 / resistance,
        (Quantity::Conductance, true) => {
            let g = 1.0 / resistance;
            let g_min = 1.0 / r_max;
            let g_max = 1.0 / r_min;
            (g - g_min) / (g_max - g_min)
        }
    };

    gain * (value + EPSILON)
}
