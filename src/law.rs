//! Device laws - closed-form resistance drift in terms of pulse count
//!
//! A law never updates resistance incrementally. It is written as a forward
//! curve `r(n)` over the cumulative pulse count `n`, plus its inverse. A pulse
//! recovers `n` from the present resistance, then steps the curve forward by
//! one:
//!
//! ```text
//! n     = compute_pulse_number(r, V)
//! old_r = compute_resistance(n, V)
//! r     = compute_resistance(n + 1, V)
//! ```
//!
//! For bidirectional devices the set and reset branches are separate curves
//! that are not inverses of each other, so the count has to be recovered on
//! the branch selected by the pulse polarity.

use serde::{Deserialize, Serialize};

use crate::anouk::AnoukLaw;
use crate::error::{Error, Result};
use crate::power_law::PowerLaw;

/// Technology bounds of a device, `0 < r_min < r_max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub r_min: f64,
    pub r_max: f64,
}

impl Bounds {
    pub fn new(r_min: f64, r_max: f64) -> Result<Self> {
        let bounds = Self { r_min, r_max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.r_min.is_finite() || !self.r_max.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "resistance bounds must be finite, got [{}, {}]",
                self.r_min, self.r_max
            )));
        }
        if self.r_min <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "r_min must be strictly positive, got {}",
                self.r_min
            )));
        }
        if self.r_min >= self.r_max {
            return Err(Error::InvalidParameter(format!(
                "r_min ({}) must be below r_max ({})",
                self.r_min, self.r_max
            )));
        }
        Ok(())
    }

    /// Is `r` inside `[r_min, r_max]`?
    pub fn contains(&self, r: f64) -> bool {
        r >= self.r_min && r <= self.r_max
    }

    pub fn clamp(&self, r: f64) -> f64 {
        r.clamp(self.r_min, self.r_max)
    }
}

/// Analytic law of a memristor variant
///
/// Both primitives must be provided; there is no generic fallback.
pub trait DeviceLaw {
    /// Short identifier used in logs and exports
    fn name(&self) -> &'static str;

    /// Check the coefficients against the device bounds
    fn validate(&self, bounds: Bounds) -> Result<()>;

    /// Invert the forward law: pulse count consistent with `resistance` on
    /// the branch selected by `voltage`.
    fn compute_pulse_number(&self, resistance: f64, voltage: f64, bounds: Bounds) -> f64;

    /// Forward law: resistance after `n` pulses at `voltage`.
    ///
    /// `None` means the device does not respond to this voltage and keeps
    /// its present state.
    fn compute_resistance(&self, n: f64, voltage: f64, bounds: Bounds) -> Option<f64>;
}

/// Runtime-selectable law, for hosts that pick the variant from a config file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceModel {
    Anouk(AnoukLaw),
    PowerLaw(PowerLaw),
}

impl Default for DeviceModel {
    fn default() -> Self {
        Self::Anouk(AnoukLaw::default())
    }
}

impl From<AnoukLaw> for DeviceModel {
    fn from(law: AnoukLaw) -> Self {
        Self::Anouk(law)
    }
}

impl From<PowerLaw> for DeviceModel {
    fn from(law: PowerLaw) -> Self {
        Self::PowerLaw(law)
    }
}

impl DeviceLaw for DeviceModel {
    fn name(&self) -> &'static str {
        match self {
            Self::Anouk(law) => law.name(),
            Self::PowerLaw(law) => law.name(),
        }
    }

    fn validate(&self, bounds: Bounds) -> Result<()> {
        match self {
            Self::Anouk(law) => law.validate(bounds),
            Self::PowerLaw(law) => law.validate(bounds),
        }
    }

    fn compute_pulse_number(&self, resistance: f64, voltage: f64, bounds: Bounds) -> f64 {
        match self {
            Self::Anouk(law) => law.compute_pulse_number(resistance, voltage, bounds),
            Self::PowerLaw(law) => law.compute_pulse_number(resistance, voltage, bounds),
        }
    }

    fn compute_resistance(&self, n: f64, voltage: f64, bounds: Bounds) -> Option<f64> {
        match self {
            Self::Anouk(law) => law.compute_resistance(n, voltage, bounds),
            Self::PowerLaw(law) => law.compute_resistance(n, voltage, bounds),
        }
    }
}
