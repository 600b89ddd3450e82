//! History export - crossbar trajectories for external analysis
//!
//! Turns the history snapshots of every device into one serde document:
//! per sample, the plus and minus resistance matrices and the raw weight
//! matrix `1/r_plus - 1/r_minus`. Plotting and any further formatting belong
//! to the consumer.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::crossbar::MemristorCrossbar;
use crate::error::{Error, Result};
use crate::law::DeviceLaw;

/// Exported trajectories of a crossbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryExport {
    /// Law of the exported devices
    pub law: String,

    pub rows: usize,
    pub cols: usize,

    /// Number of snapshots
    pub samples: usize,

    /// `[sample][row * cols + col]`
    pub plus_resistance: Vec<Vec<f64>>,

    /// `[sample][row * cols + col]`
    pub minus_resistance: Vec<Vec<f64>>,

    /// Raw conductance difference, `[sample][row * cols + col]`
    pub weights: Vec<Vec<f64>>,

    pub metadata: ExportMetadata,
}

/// Metadata for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub exported_at: String,
    pub crossbar_created_at: String,
}

impl HistoryExport {
    /// Collect every device history of `crossbar`.
    ///
    /// Fails if devices hold different numbers of snapshots, which means
    /// someone called `save_state` on individual pairs.
    pub fn from_crossbar<L: DeviceLaw>(crossbar: &MemristorCrossbar<L>) -> Result<Self> {
        let samples = crossbar.samples();
        let law = crossbar
            .pairs()
            .first()
            .map(|p| p.plus().law().name())
            .unwrap_or_default()
            .to_string();

        for pair in crossbar.pairs() {
            for device in [pair.plus(), pair.minus()] {
                if device.history().len() != samples {
                    return Err(Error::InvalidState(format!(
                        "uneven history: expected {} samples, device holds {}",
                        samples,
                        device.history().len()
                    )));
                }
            }
        }

        let mut plus_resistance = Vec::with_capacity(samples);
        let mut minus_resistance = Vec::with_capacity(samples);
        let mut weights = Vec::with_capacity(samples);

        for t in 0..samples {
            let plus: Vec<f64> = crossbar.pairs().iter().map(|p| p.plus().history()[t]).collect();
            let minus: Vec<f64> = crossbar.pairs().iter().map(|p| p.minus().history()[t]).collect();
            let weight = plus
                .iter()
                .zip(&minus)
                .map(|(rp, rm)| 1.0 / rp - 1.0 / rm)
                .collect();

            plus_resistance.push(plus);
            minus_resistance.push(minus);
            weights.push(weight);
        }

        tracing::debug!(law = %law, samples, pairs = crossbar.len(), "history exported");

        Ok(Self {
            law,
            rows: crossbar.rows(),
            cols: crossbar.cols(),
            samples,
            plus_resistance,
            minus_resistance,
            weights,
            metadata: ExportMetadata {
                exported_at: chrono::Utc::now().to_rfc3339(),
                crossbar_created_at: crossbar.created_at().to_rfc3339(),
            },
        })
    }

    /// Weight of one connection at one sample
    pub fn weight_at(&self, sample: usize, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let idx = row.checked_mul(self.cols)?.checked_add(col)?;
        self.weights.get(sample)?.get(idx).copied()
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::Deserialization(e.to_string()))
    }
}
