//! `arealign-recon` — Areal statistical-unit boundary reconciliation engine.
//!
//! Reconciles two vintages of statistical-unit boundaries: for every zone
//! of an older base layer, selects the best-fitting geometry assembled
//! from one or more touching units of a newer revision layer, scored by
//! the area-overlap (Dice) coefficient.
//!
//! Pure engine crate: receives pre-loaded boundary layers, returns
//! corrected zones. No CLI or IO dependencies; coordinate systems are the
//! caller's concern (both layers must share one spatial reference).

pub mod adjacency;
pub mod assemble;
pub mod combine;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod index;
pub mod matcher;
pub mod model;
pub mod summary;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{ReconInput, ReconResult, ZoneRecord};
