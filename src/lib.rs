//! # Memristor Synapse
//!
//! Physical models of two-terminal resistive memory devices (memristors) and
//! differential pairs of them that hold one signed synaptic weight for a
//! learning network.
//!
//! ## Core Concept
//!
//! A memristor's resistance persists and moves nonlinearly with every
//! programming pulse, but a single device only drifts one way per pulse
//! polarity. Two devices read as `plus - minus` give a signed, bounded weight
//! that a learning rule can push in either direction by pulsing one side:
//!
//! ```text
//!   adjustment ──► policy ──► plus or minus ──► pulse(V)
//!                                   │
//!   weight ◄── get_state(plus) - get_state(minus)
//! ```
//!
//! ## Device Laws
//!
//! | Law         | Branches         | Direction                     |
//! |-------------|------------------|-------------------------------|
//! | **Anouk**   | one              | toward `r_min` on every pulse |
//! | **PowerLaw**| set / reset      | `V > 0` up, `V < 0` down      |
//!
//! Both are closed-form curves over the cumulative pulse count. A pulse
//! recovers the count from the present resistance, then steps forward by one.
//!
//! ## Features
//!
//! - **Bounded state** - resistance always clamped into `[r_min, r_max]`
//! - **Scaled readout** - resistance or conductance mapped onto `[0, 1]`,
//!   epsilon-guarded, with gain
//! - **History** - append-only snapshots at host-chosen intervals
//! - **Crossbars** - a weight matrix of pairs with stats and checkpoints
//! - **Export** - trajectories as a serde document
//!
//! ## Example
//!
//! ```rust,no_run
//! use memristor_synapse::{MemristorPair, PulsePolicy, Quantity};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let mut synapse = MemristorPair::anouk()?;
//!
//! // Learning rule asked for a positive update
//! let weight = synapse.pulse(0.3, Quantity::Conductance, PulsePolicy::Same, true)?;
//!
//! // Sample for later analysis
//! synapse.save_state();
//!
//! assert_eq!(weight, synapse.get_state(Quantity::Conductance, true));
//! # Ok(())
//! # }
//! ```

pub mod anouk;
pub mod config;
pub mod crossbar;
pub mod error;
pub mod export;
pub mod law;
pub mod memristor;
pub mod pair;
pub mod power_law;
pub mod state;

// Re-exports
pub use crate::anouk::AnoukLaw;
pub use crate::config::{CrossbarConfig, InitialResistance, MemristorConfig, PairConfig};
pub use crate::crossbar::{gini, CrossbarStats, MemristorCrossbar};
pub use crate::error::{Error, Result};
pub use crate::export::{ExportMetadata, HistoryExport};
pub use crate::law::{Bounds, DeviceLaw, DeviceModel};
pub use crate::memristor::Memristor;
pub use crate::pair::{MemristorPair, PulsePolicy, Side};
pub use crate::power_law::{PowerLaw, DEFAULT_RESET_RESISTANCE};
pub use crate::state::{read_state, Quantity, DEFAULT_GAIN, EPSILON};
