//! Configuration for devices, pairs and crossbars
//!
//! Presets follow the measured defaults of each device family. All configs
//! are serde types so a host can keep them in a JSON file next to its
//! experiment.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::crossbar::pair_count;
use crate::error::{Error, Result};
use crate::law::{Bounds, DeviceModel};
use crate::pair::check_drive;
use crate::state::DEFAULT_GAIN;

/// Distribution of a fresh device's resistance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialResistance {
    Fixed(f64),
    Uniform { low: f64, high: f64 },
}

impl InitialResistance {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Fixed(r) => r,
            Self::Uniform { low, high } if low < high => rng.gen_range(low..=high),
            Self::Uniform { low, .. } => low,
        }
    }

    fn validate(&self, bounds: Bounds) -> Result<()> {
        let (low, high) = match *self {
            Self::Fixed(r) => (r, r),
            Self::Uniform { low, high } => (low, high),
        };
        if low > high {
            return Err(Error::InvalidParameter(format!(
                "initial range is empty: [{}, {}]",
                low, high
            )));
        }
        if !bounds.contains(low) || !bounds.contains(high) {
            return Err(Error::InvalidParameter(format!(
                "initial range [{}, {}] outside device bounds [{}, {}]",
                low, high, bounds.r_min, bounds.r_max
            )));
        }
        Ok(())
    }
}

/// Technology bounds and initial state of one device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemristorConfig {
    /// Lowest reachable resistance (Ω)
    pub r_min: f64,

    /// Highest reachable resistance (Ω)
    pub r_max: f64,

    /// Where fresh devices start
    pub initial: InitialResistance,
}

impl Default for MemristorConfig {
    fn default() -> Self {
        Self::anouk()
    }
}

impl MemristorConfig {
    /// Measured empirical device, starting in its high-resistance half
    pub fn anouk() -> Self {
        Self {
            r_min: 1e2,
            r_max: 2.5e8,
            initial: InitialResistance::Uniform {
                low: 1e8,
                high: 2.5e8,
            },
        }
    }

    /// Generic power-law device, starting in a narrow mid band
    pub fn power_law() -> Self {
        Self {
            r_min: 1e2,
            r_max: 2.5e8,
            initial: InitialResistance::Uniform {
                low: 1e8,
                high: 1.1e8,
            },
        }
    }

    pub fn bounds(&self) -> Result<Bounds> {
        Bounds::new(self.r_min, self.r_max)
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = self.bounds()?;
        self.initial.validate(bounds)
    }
}

/// How a differential pair drives and reads its devices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairConfig {
    /// Config shared by both devices
    pub device: MemristorConfig,

    /// Voltage of every programming pulse
    pub pulse_voltage: f64,

    /// Gain applied to readings
    pub gain: f64,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self::anouk()
    }
}

impl PairConfig {
    pub fn anouk() -> Self {
        Self {
            device: MemristorConfig::anouk(),
            pulse_voltage: 0.1,
            gain: DEFAULT_GAIN,
        }
    }

    /// Pulses on the reset branch, so the pulsed device gains conductance
    pub fn power_law() -> Self {
        Self {
            device: MemristorConfig::power_law(),
            pulse_voltage: -0.1,
            gain: DEFAULT_GAIN,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.device.validate()?;
        check_drive(self.pulse_voltage, self.gain)
    }
}

/// A `rows x cols` matrix of differential pairs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossbarConfig {
    /// Post-synaptic dimension
    pub rows: usize,

    /// Pre-synaptic dimension
    pub cols: usize,

    pub pair: PairConfig,

    /// Law used when the crossbar is built from this config alone
    pub model: DeviceModel,

    /// Seed for reproducible initial states
    pub seed: Option<u64>,
}

impl Default for CrossbarConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            pair: PairConfig::anouk(),
            model: DeviceModel::default(),
            seed: None,
        }
    }
}

impl CrossbarConfig {
    pub fn anouk(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            pair: PairConfig::anouk(),
            model: DeviceModel::Anouk(Default::default()),
            seed: None,
        }
    }

    pub fn power_law(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            pair: PairConfig::power_law(),
            model: DeviceModel::PowerLaw(Default::default()),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        pair_count(self.rows, self.cols)?;
        self.pair.validate()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: CrossbarConfig =
            serde_json::from_str(&json).map_err(|e| Error::Deserialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
