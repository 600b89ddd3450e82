//! Empirical two-parameter drift law
//!
//! Forward curve `r(n) = r_min + r_max * n^c`. The fitted law has exponent
//! `c = a + b*V` for positive pulses. Negative voltages are folded onto the
//! positive curve here, so the exponent actually used is `c = a + b*|V|`.
//! With `a < 0` and `b <= 0` it is negative for every voltage and each pulse
//! moves the device toward `r_min`, whatever its polarity.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::law::{Bounds, DeviceLaw};

/// Empirical law fitted on measured devices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnoukLaw {
    /// Voltage-independent part of the exponent
    pub a: f64,
    /// Voltage slope of the exponent
    pub b: f64,
}

impl Default for AnoukLaw {
    fn default() -> Self {
        Self { a: -0.128, b: -0.522 }
    }
}

impl AnoukLaw {
    pub fn new(a: f64, b: f64) -> Result<Self> {
        let law = Self { a, b };
        law.check_coefficients()?;
        Ok(law)
    }

    /// Exponent `c` of the forward curve; negative voltages use `|V|`
    pub fn exponent(&self, voltage: f64) -> f64 {
        self.a + self.b * voltage.abs()
    }

    fn check_coefficients(&self) -> Result<()> {
        if !self.a.is_finite() || !self.b.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "anouk coefficients must be finite, got a={} b={}",
                self.a, self.b
            )));
        }
        // c = a + b|V| must stay negative at every voltage
        if self.a >= 0.0 || self.b > 0.0 {
            return Err(Error::InvalidParameter(format!(
                "anouk law needs a < 0 and b <= 0, got a={} b={}",
                self.a, self.b
            )));
        }
        Ok(())
    }
}

impl DeviceLaw for AnoukLaw {
    fn name(&self) -> &'static str {
        "anouk"
    }

    fn validate(&self, bounds: Bounds) -> Result<()> {
        bounds.validate()?;
        self.check_coefficients()
    }

    fn compute_pulse_number(&self, resistance: f64, voltage: f64, bounds: Bounds) -> f64 {
        let x = (resistance - bounds.r_min) / bounds.r_max;
        if x <= 0.0 {
            // At r_min the curve has been followed to its limit
            return f64::INFINITY;
        }
        x.powf(1.0 / self.exponent(voltage))
    }

    fn compute_resistance(&self, n: f64, voltage: f64, bounds: Bounds) -> Option<f64> {
        if n.is_infinite() {
            return Some(bounds.r_min);
        }
        Some(bounds.r_min + bounds.r_max * n.powf(self.exponent(voltage)))
    }
}
