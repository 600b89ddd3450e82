//! Crossbar - a weight matrix of differential pairs
//!
//! One pair per connection weight, stored row-major (`rows` post-synaptic,
//! `cols` pre-synaptic). Pairs share no state, so a host can drive the matrix
//! one update vector per learning step and read back the weights it needs
//! for its transform.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::CrossbarConfig;
use crate::error::{Error, Result};
use crate::law::DeviceLaw;
use crate::pair::{MemristorPair, PulsePolicy};
use crate::state::Quantity;

/// Matrix of memristor pairs sharing one law
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemristorCrossbar<L> {
    rows: usize,
    cols: usize,
    pairs: Vec<MemristorPair<L>>,
    created_at: DateTime<Utc>,
}

/// Summary of a crossbar's present weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossbarStats {
    pub pairs: usize,
    pub mean_weight: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    /// Gini coefficient of the weights (0 = uniform, toward 1 = sparse)
    pub gini: f64,
    /// Pairs with at least one device pinned at a bound
    pub saturated_pairs: usize,
    /// History snapshots taken so far
    pub samples: usize,
}

impl<L: DeviceLaw + Clone> MemristorCrossbar<L> {
    /// Build from config, seeding from `config.seed` when present
    pub fn new(law: L, config: &CrossbarConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(law, config, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(law: L, config: &CrossbarConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let pairs = (0..pair_count(config.rows, config.cols)?)
            .map(|_| MemristorPair::from_config(law.clone(), &config.pair, &mut *rng))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            law = law.name(),
            rows = config.rows,
            cols = config.cols,
            "crossbar created"
        );

        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            pairs,
            created_at: Utc::now(),
        })
    }
}

impl<L: DeviceLaw> MemristorCrossbar<L> {
    /// Build from pairs already laid out row-major
    pub fn from_pairs(rows: usize, cols: usize, pairs: Vec<MemristorPair<L>>) -> Result<Self> {
        let expected = pair_count(rows, cols)?;
        if pairs.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: pairs.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            pairs,
            created_at: Utc::now(),
        })
    }

    /// Apply one adjustment per pair (row-major) and return the new weights.
    ///
    /// The whole vector is checked before any device is touched.
    pub fn pulse(
        &mut self,
        adjustments: &[f64],
        quantity: Quantity,
        policy: PulsePolicy,
        scaled: bool,
    ) -> Result<Vec<f64>> {
        if adjustments.len() != self.pairs.len() {
            return Err(Error::DimensionMismatch {
                expected: self.pairs.len(),
                actual: adjustments.len(),
            });
        }
        if let Some(idx) = adjustments.iter().position(|a| a.is_nan()) {
            return Err(Error::InvalidArgument(format!(
                "adjustment at index {} is NaN",
                idx
            )));
        }

        self.pairs
            .iter_mut()
            .zip(adjustments)
            .map(|(pair, &adj)| pair.pulse(adj, quantity, policy, scaled))
            .collect()
    }

    /// Present weights, row-major
    pub fn weights(&self, quantity: Quantity, scaled: bool) -> Vec<f64> {
        self.pairs
            .iter()
            .map(|pair| pair.get_state(quantity, scaled))
            .collect()
    }

    /// Snapshot every device
    pub fn save_state(&mut self) {
        for pair in &mut self.pairs {
            pair.save_state();
        }
    }

    pub fn stats(&self, quantity: Quantity, scaled: bool) -> CrossbarStats {
        let weights = self.weights(quantity, scaled);
        let n = weights.len().max(1) as f64;
        let (min_weight, max_weight) = if weights.is_empty() {
            (0.0, 0.0)
        } else {
            (
                weights.iter().copied().fold(f64::INFINITY, f64::min),
                weights.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            )
        };

        CrossbarStats {
            pairs: self.pairs.len(),
            mean_weight: weights.iter().sum::<f64>() / n,
            min_weight,
            max_weight,
            gini: gini(&weights),
            saturated_pairs: self.pairs.iter().filter(|p| p.is_saturated()).count(),
            samples: self.samples(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let expected = pair_count(self.rows, self.cols)
            .map_err(|e| Error::InvalidState(e.to_string()))?;
        if self.pairs.len() != expected {
            return Err(Error::InvalidState(format!(
                "{}x{} crossbar holds {} pairs",
                self.rows,
                self.cols,
                self.pairs.len()
            )));
        }
        for pair in &self.pairs {
            pair.validate()?;
        }
        Ok(())
    }
}

impl<L> MemristorCrossbar<L> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn pair(&self, row: usize, col: usize) -> Option<&MemristorPair<L>> {
        self.index(row, col).and_then(|i| self.pairs.get(i))
    }

    pub fn pair_mut(&mut self, row: usize, col: usize) -> Option<&mut MemristorPair<L>> {
        self.index(row, col).and_then(move |i| self.pairs.get_mut(i))
    }

    pub fn pairs(&self) -> &[MemristorPair<L>] {
        &self.pairs
    }

    /// Disjoint mutable access for hosts that spread pairs over threads
    pub fn pairs_mut(&mut self) -> &mut [MemristorPair<L>] {
        &mut self.pairs
    }

    /// Number of history snapshots taken
    pub fn samples(&self) -> usize {
        self.pairs
            .first()
            .map(|p| p.plus().history().len())
            .unwrap_or(0)
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        row.checked_mul(self.cols)?.checked_add(col)
    }
}

impl<L: DeviceLaw + Serialize + DeserializeOwned> MemristorCrossbar<L> {
    /// Save to disk as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        tracing::debug!(path = %path.display(), pairs = self.pairs.len(), "crossbar saved");
        Ok(())
    }

    /// Load from disk, rejecting state that breaks the device invariants
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;

        let crossbar: Self =
            serde_json::from_str(&json).map_err(|e| Error::Deserialization(e.to_string()))?;

        if let Err(e) = crossbar.validate() {
            tracing::warn!(path = %path.display(), error = %e, "rejecting crossbar state");
            return Err(e);
        }

        tracing::debug!(path = %path.display(), pairs = crossbar.pairs.len(), "crossbar loaded");
        Ok(crossbar)
    }

    /// Compact binary checkpoint
    pub fn checkpoint(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn restore(bytes: &[u8]) -> Result<Self> {
        let crossbar: Self =
            bincode::deserialize(bytes).map_err(|e| Error::Deserialization(e.to_string()))?;
        crossbar.validate()?;
        Ok(crossbar)
    }
}

/// Number of pairs in a `rows x cols` crossbar; both sides must be non-zero
pub(crate) fn pair_count(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidParameter(format!(
            "crossbar needs at least one row and column, got {}x{}",
            rows, cols
        )));
    }
    rows.checked_mul(cols).ok_or_else(|| {
        Error::InvalidParameter(format!("{}x{} crossbar is too large", rows, cols))
    })
}

/// Gini coefficient of a set of values.
///
/// Negative inputs are shifted up so the minimum is zero and a small offset
/// keeps the sum positive. Empty input gives 0.
pub fn gini(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let shift = if min < 0.0 { -min } else { 0.0 };

    let mut sorted: Vec<f64> = values.iter().map(|v| v + shift + 1e-7).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    let total: f64 = sorted.iter().sum();
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (2.0 * (i as f64 + 1.0) - n - 1.0) * v)
        .sum();

    weighted / (n * total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anouk::AnoukLaw;
    use crate::law::DeviceModel;

    fn crossbar(rows: usize, cols: usize) -> MemristorCrossbar<AnoukLaw> {
        let config = CrossbarConfig::anouk(rows, cols).with_seed(3);
        MemristorCrossbar::new(AnoukLaw::default(), &config).unwrap()
    }

    #[test]
    fn test_layout() {
        let xbar = crossbar(3, 4);
        assert_eq!(xbar.len(), 12);
        assert_eq!(xbar.rows(), 3);
        assert_eq!(xbar.cols(), 4);
        assert!(xbar.pair(2, 3).is_some());
        assert!(xbar.pair(3, 0).is_none());
        assert!(xbar.pair(0, 4).is_none());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = crossbar(2, 2);
        let b = crossbar(2, 2);
        assert_eq!(
            a.weights(Quantity::Resistance, false),
            b.weights(Quantity::Resistance, false)
        );
    }

    #[test]
    fn test_pulse_dimension_mismatch() {
        let mut xbar = crossbar(2, 2);
        let result = xbar.pulse(&[1.0, -1.0], Quantity::Conductance, PulsePolicy::Same, true);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch { expected: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_nan_rejected_before_any_pulse() {
        let mut xbar = crossbar(1, 3);
        let before = xbar.clone();

        let result = xbar.pulse(&[1.0, f64::NAN, 1.0], Quantity::Conductance, PulsePolicy::Same, true);

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(xbar, before);
    }

    #[test]
    fn test_pulse_moves_only_selected_pairs() {
        let mut xbar = crossbar(1, 3);
        let before = xbar.weights(Quantity::Conductance, true);

        let after = xbar
            .pulse(&[1.0, 0.0, -1.0], Quantity::Conductance, PulsePolicy::Same, true)
            .unwrap();

        assert!(after[0] > before[0]);
        assert_eq!(after[1], before[1]);
        assert!(after[2] < before[2]);
        assert_eq!(after, xbar.weights(Quantity::Conductance, true));
    }

    #[test]
    fn test_save_state_counts_samples() {
        let mut xbar = crossbar(2, 2);
        assert_eq!(xbar.samples(), 0);

        xbar.save_state();
        xbar.save_state();
        assert_eq!(xbar.samples(), 2);
        assert_eq!(xbar.stats(Quantity::Conductance, true).samples, 2);
    }

    #[test]
    fn test_from_pairs_checks_shape() {
        let xbar = crossbar(1, 2);
        let pairs = xbar.pairs().to_vec();
        assert!(MemristorCrossbar::from_pairs(1, 2, pairs.clone()).is_ok());
        assert!(MemristorCrossbar::from_pairs(2, 2, pairs).is_err());
    }

    #[test]
    fn test_from_pairs_rejects_empty_and_huge_shapes() {
        let empty: Vec<MemristorPair<AnoukLaw>> = Vec::new();
        assert!(matches!(
            MemristorCrossbar::from_pairs(0, 0, empty.clone()),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            MemristorCrossbar::from_pairs(usize::MAX, 2, empty),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_stats_of_empty_crossbar_are_zero() {
        let xbar: MemristorCrossbar<AnoukLaw> = MemristorCrossbar {
            rows: 0,
            cols: 0,
            pairs: Vec::new(),
            created_at: Utc::now(),
        };
        let stats = xbar.stats(Quantity::Conductance, true);
        assert_eq!(stats.pairs, 0);
        assert_eq!(stats.min_weight, 0.0);
        assert_eq!(stats.max_weight, 0.0);
        assert_eq!(stats.mean_weight, 0.0);
        assert!(xbar.validate().is_err());
    }

    #[test]
    fn test_checkpoint_restore() {
        let config = CrossbarConfig::power_law(2, 3).with_seed(5);
        let mut xbar = MemristorCrossbar::new(config.model, &config).unwrap();
        xbar.save_state();

        let bytes = xbar.checkpoint().unwrap();
        let restored = MemristorCrossbar::<DeviceModel>::restore(&bytes).unwrap();

        assert_eq!(restored, xbar);
    }

    #[test]
    fn test_gini_uniform_is_zero() {
        assert!(gini(&[0.5; 10]).abs() < 1e-9);
        assert_eq!(gini(&[]), 0.0);
    }

    #[test]
    fn test_gini_sparse_is_high() {
        let mut values = vec![0.0; 99];
        values.push(1.0);
        assert!(gini(&values) > 0.95);
    }

    #[test]
    fn test_gini_shifts_negatives() {
        let g = gini(&[-1.0, -1.0, -1.0, 1.0]);
        assert!(g > 0.0 && g < 1.0);
    }
}
