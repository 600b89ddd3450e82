//! Differential pair - one signed weight from two unsigned devices
//!
//! Each device can only drift in one direction per pulse polarity, so a single
//! device cannot represent a signed weight that must move both ways. The pair
//! reads `plus - minus` and pulses at most one side per update:
//!
//! | Policy    | `adj > 0` | `adj < 0` | `adj == 0` |
//! |-----------|-----------|-----------|------------|
//! | `Same`    | plus      | minus     | none       |
//! | `Inverse` | minus     | plus      | none       |
//!
//! The combined reading is bounded by the two devices' ranges and saturates
//! once the pulsed side reaches its bound.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::anouk::AnoukLaw;
use crate::config::PairConfig;
use crate::error::{Error, Result};
use crate::law::DeviceLaw;
use crate::memristor::Memristor;
use crate::power_law::PowerLaw;
use crate::state::Quantity;

/// Which device of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Plus,
    Minus,
}

/// Mapping from adjustment sign to the pulsed device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulsePolicy {
    #[default]
    Same,
    Inverse,
}

impl PulsePolicy {
    /// Device to pulse for this adjustment, if any
    pub fn target(&self, adjustment: f64) -> Option<Side> {
        if adjustment > 0.0 {
            Some(match self {
                Self::Same => Side::Plus,
                Self::Inverse => Side::Minus,
            })
        } else if adjustment < 0.0 {
            Some(match self {
                Self::Same => Side::Minus,
                Self::Inverse => Side::Plus,
            })
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Inverse => "inverse",
        }
    }
}

impl fmt::Display for PulsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PulsePolicy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "same" => Ok(Self::Same),
            "inverse" => Ok(Self::Inverse),
            other => Err(Error::InvalidArgument(format!(
                "unknown pulse policy '{}', expected 'same' or 'inverse'",
                other
            ))),
        }
    }
}

/// Plus/minus devices encoding one signed weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemristorPair<L> {
    plus: Memristor<L>,
    minus: Memristor<L>,
    pulse_voltage: f64,
    gain: f64,
}

impl<L: DeviceLaw> MemristorPair<L> {
    /// Compose two existing devices
    pub fn new(plus: Memristor<L>, minus: Memristor<L>, pulse_voltage: f64, gain: f64) -> Result<Self> {
        check_drive(pulse_voltage, gain)?;
        Ok(Self {
            plus,
            minus,
            pulse_voltage,
            gain,
        })
    }

    /// Two fresh devices of the same law, sampled from `config`
    pub fn from_config<R: Rng + ?Sized>(law: L, config: &PairConfig, rng: &mut R) -> Result<Self>
    where
        L: Clone,
    {
        config.validate()?;
        let plus = Memristor::new(law.clone(), &config.device, &mut *rng)?;
        let minus = Memristor::new(law, &config.device, rng)?;
        Self::new(plus, minus, config.pulse_voltage, config.gain)
    }

    /// Pulse at most one device according to `policy`, then read the pair.
    ///
    /// Only the sign of `adjustment` is consulted; zero pulses nothing.
    pub fn pulse(
        &mut self,
        adjustment: f64,
        quantity: Quantity,
        policy: PulsePolicy,
        scaled: bool,
    ) -> Result<f64> {
        if adjustment.is_nan() {
            return Err(Error::InvalidArgument(
                "adjustment must not be NaN".to_string(),
            ));
        }

        if let Some(side) = policy.target(adjustment) {
            let voltage = self.pulse_voltage;
            self.device_mut(side).pulse(voltage)?;
        }

        Ok(self.get_state(quantity, scaled))
    }

    /// Signed reading `plus - minus`
    pub fn get_state(&self, quantity: Quantity, scaled: bool) -> f64 {
        self.plus.get_state_with_gain(quantity, scaled, self.gain)
            - self.minus.get_state_with_gain(quantity, scaled, self.gain)
    }

    pub fn save_state(&mut self) {
        self.plus.save_state();
        self.minus.save_state();
    }

    /// Device invariants plus a usable pulse voltage and gain
    pub fn validate(&self) -> Result<()> {
        check_drive(self.pulse_voltage, self.gain)?;
        self.plus.validate()?;
        self.minus.validate()
    }

    /// Is either device pinned at a bound?
    pub fn is_saturated(&self) -> bool {
        self.plus.is_saturated() || self.minus.is_saturated()
    }

    fn device_mut(&mut self, side: Side) -> &mut Memristor<L> {
        match side {
            Side::Plus => &mut self.plus,
            Side::Minus => &mut self.minus,
        }
    }
}

impl<L> MemristorPair<L> {
    pub fn plus(&self) -> &Memristor<L> {
        &self.plus
    }

    pub fn minus(&self) -> &Memristor<L> {
        &self.minus
    }

    pub fn device(&self, side: Side) -> &Memristor<L> {
        match side {
            Side::Plus => &self.plus,
            Side::Minus => &self.minus,
        }
    }

    pub fn pulse_voltage(&self) -> f64 {
        self.pulse_voltage
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }
}

impl MemristorPair<AnoukLaw> {
    /// Pair of default empirical devices
    pub fn anouk() -> Result<Self> {
        Self::from_config(AnoukLaw::default(), &PairConfig::anouk(), &mut rand::thread_rng())
    }
}

impl MemristorPair<PowerLaw> {
    /// Pair of default power-law devices
    pub fn power_law() -> Result<Self> {
        Self::from_config(PowerLaw::default(), &PairConfig::power_law(), &mut rand::thread_rng())
    }
}

/// A pair must pulse at a finite voltage and read with a positive gain.
/// A zero gain would bring back exact-zero readings.
pub(crate) fn check_drive(pulse_voltage: f64, gain: f64) -> Result<()> {
    if !pulse_voltage.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "pulse voltage must be finite, got {}",
            pulse_voltage
        )));
    }
    if !gain.is_finite() || gain <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "gain must be finite and positive, got {}",
            gain
        )));
    }
    Ok(())
}
