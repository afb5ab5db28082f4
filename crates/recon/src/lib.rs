//! `vatcheck-recon`: ledger reconciliation engine.
//!
//! Pure engine crate: receives two pre-loaded datasets, returns one
//! classified result. No CLI or IO dependencies.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod model;
pub mod normalize;
pub mod resolve;
pub mod summary;

pub use config::ReconConfig;
pub use engine::{reconcile, reconcile_default};
pub use error::ReconError;
pub use model::{CanonicalField, Cell, ColumnMapping, Dataset, GroupKey, ReconResult, VatEstimate};
pub use normalize::{normalize, normalize_amount};
pub use summary::estimate_vat;
