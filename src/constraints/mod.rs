//! Feasible region: simplex, per-company cap and beta band.

pub mod region;

pub use region::{FeasibilityReport, FeasibleRegion, WEIGHT_TOLERANCE};
