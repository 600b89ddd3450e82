//! Generic bidirectional power-law memristor
//!
//! Two branches, selected by pulse polarity:
//!
//! - **Set** (`V > 0`): `r(n) = r_min + r_max * n^a`, rising toward `r_max`
//! - **Reset** (`V < 0`): `r(n) = r_reset - r_reset * n^c`, falling toward 0,
//!   referenced to a separate reset resistance
//!
//! A zero-voltage pulse leaves the device untouched.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::law::{Bounds, DeviceLaw};

/// Default reset-resistance reference (Ω)
pub const DEFAULT_RESET_RESISTANCE: f64 = 1e9;

/// Bidirectional power law with asymmetric set/reset branches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLaw {
    /// Set-branch exponent
    pub a: f64,
    /// Reset-branch exponent
    pub c: f64,
    /// Reference resistance of the reset branch
    pub r_reset: f64,
}

impl Default for PowerLaw {
    fn default() -> Self {
        Self {
            a: 1e-3,
            c: 1e-3,
            r_reset: DEFAULT_RESET_RESISTANCE,
        }
    }
}

impl PowerLaw {
    pub fn new(a: f64, c: f64, r_reset: f64) -> Result<Self> {
        let law = Self { a, c, r_reset };
        law.check_coefficients()?;
        Ok(law)
    }

    fn check_coefficients(&self) -> Result<()> {
        for (name, value) in [("a", self.a), ("c", self.c), ("r_reset", self.r_reset)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "power law {} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl DeviceLaw for PowerLaw {
    fn name(&self) -> &'static str {
        "power_law"
    }

    fn validate(&self, bounds: Bounds) -> Result<()> {
        bounds.validate()?;
        self.check_coefficients()
    }

    fn compute_pulse_number(&self, resistance: f64, voltage: f64, bounds: Bounds) -> f64 {
        if voltage >= 0.0 {
            let x = ((resistance - bounds.r_min) / bounds.r_max).max(0.0);
            x.powf(1.0 / self.a)
        } else {
            let y = ((self.r_reset - resistance) / self.r_reset).max(0.0);
            y.powf(1.0 / self.c)
        }
    }

    fn compute_resistance(&self, n: f64, voltage: f64, bounds: Bounds) -> Option<f64> {
        if voltage > 0.0 {
            Some(bounds.r_min + bounds.r_max * n.powf(self.a))
        } else if voltage < 0.0 {
            Some(self.r_reset - self.r_reset * n.powf(self.c))
        } else {
            None
        }
    }
}
