//! Memristor device - resistance state, pulse update and readout
//!
//! A device holds one resistance inside its technology bounds. The only
//! mutation is [`Memristor::pulse`], which runs the law's
//! invert-then-step-forward update and clamps the result back into
//! `[r_min, r_max]`. History snapshots are taken only on
//! [`Memristor::save_state`], at whatever sampling interval the host chooses.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::anouk::AnoukLaw;
use crate::config::MemristorConfig;
use crate::error::{Error, Result};
use crate::law::{Bounds, DeviceLaw};
use crate::power_law::PowerLaw;
use crate::state::{read_state, Quantity, DEFAULT_GAIN};

/// Single memristive device driven by law `L`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memristor<L> {
    law: L,
    bounds: Bounds,
    resistance: f64,
    history: Vec<f64>,
}

impl<L: DeviceLaw> Memristor<L> {
    /// Build a device, sampling its initial resistance from `config`
    pub fn new<R: Rng + ?Sized>(law: L, config: &MemristorConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let resistance = config.initial.sample(rng);
        Self::with_resistance(law, config.r_min, config.r_max, resistance)
    }

    /// Build a device at a known resistance
    pub fn with_resistance(law: L, r_min: f64, r_max: f64, resistance: f64) -> Result<Self> {
        let bounds = Bounds::new(r_min, r_max)?;
        law.validate(bounds)?;

        if !bounds.contains(resistance) {
            return Err(Error::InvalidParameter(format!(
                "initial resistance {} outside [{}, {}]",
                resistance, r_min, r_max
            )));
        }

        Ok(Self {
            law,
            bounds,
            resistance,
            history: Vec::new(),
        })
    }

    /// Apply one programming pulse.
    ///
    /// Returns the change reported by the law, `r(n + 1) - r(n)`. A law that
    /// does not respond to `voltage` leaves the device untouched and reports
    /// zero.
    pub fn pulse(&mut self, voltage: f64) -> Result<f64> {
        if !voltage.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "pulse voltage must be finite, got {}",
                voltage
            )));
        }

        let n = self.law.compute_pulse_number(self.resistance, voltage, self.bounds);
        let (Some(old_r), Some(new_r)) = (
            self.law.compute_resistance(n, voltage, self.bounds),
            self.law.compute_resistance(n + 1.0, voltage, self.bounds),
        ) else {
            return Ok(0.0);
        };

        if new_r.is_nan() || old_r.is_nan() {
            return Err(Error::InvalidState(format!(
                "{} law produced NaN at r={} V={}",
                self.law.name(),
                self.resistance,
                voltage
            )));
        }

        let clamped = self.bounds.clamp(new_r);
        if clamped != new_r {
            tracing::trace!(
                law = self.law.name(),
                raw = new_r,
                clamped,
                "law overshoot clamped into device bounds"
            );
        }

        self.resistance = clamped;
        Ok(clamped - self.bounds.clamp(old_r))
    }

    /// Reading with the default gain
    pub fn get_state(&self, quantity: Quantity, scaled: bool) -> f64 {
        self.get_state_with_gain(quantity, scaled, DEFAULT_GAIN)
    }

    pub fn get_state_with_gain(&self, quantity: Quantity, scaled: bool, gain: f64) -> f64 {
        read_state(
            self.resistance,
            self.bounds.r_min,
            self.bounds.r_max,
            quantity,
            scaled,
            gain,
        )
    }

    /// Append the present resistance to the history
    pub fn save_state(&mut self) {
        self.history.push(self.resistance);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Check a deserialized device against its invariants
    pub fn validate(&self) -> Result<()> {
        self.law.validate(self.bounds)?;
        if !self.bounds.contains(self.resistance) {
            return Err(Error::InvalidState(format!(
                "resistance {} outside [{}, {}]",
                self.resistance, self.bounds.r_min, self.bounds.r_max
            )));
        }
        if let Some(r) = self.history.iter().find(|r| !self.bounds.contains(**r)) {
            return Err(Error::InvalidState(format!(
                "history sample {} outside [{}, {}]",
                r, self.bounds.r_min, self.bounds.r_max
            )));
        }
        Ok(())
    }

    /// Is the device pinned at either bound?
    pub fn is_saturated(&self) -> bool {
        self.resistance <= self.bounds.r_min || self.resistance >= self.bounds.r_max
    }
}

impl<L> Memristor<L> {
    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    pub fn r_min(&self) -> f64 {
        self.bounds.r_min
    }

    pub fn r_max(&self) -> f64 {
        self.bounds.r_max
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn law(&self) -> &L {
        &self.law
    }
}

impl Memristor<AnoukLaw> {
    /// Empirical device with default parameters and a random initial state
    pub fn anouk() -> Result<Self> {
        Self::new(
            AnoukLaw::default(),
            &MemristorConfig::anouk(),
            &mut rand::thread_rng(),
        )
    }
}

impl Memristor<PowerLaw> {
    /// Power-law device with default parameters and a random initial state
    pub fn power_law() -> Result<Self> {
        Self::new(
            PowerLaw::default(),
            &MemristorConfig::power_law(),
            &mut rand::thread_rng(),
        )
    }
}
