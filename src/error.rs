//! Error types for mo-portfolio.

use thiserror::Error;

use crate::objective::Objective;

/// Error type for portfolio optimization.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// No weight vector satisfies all constraints at once.
    #[error("Problem is infeasible: {0}")]
    Infeasible(String),

    /// The conic backend failed or did not converge within its budget.
    #[error("Solver error: {0}")]
    SolverError(String),

    /// Ideal and nadir coincide, so normalization is undefined.
    #[error("Degenerate range for {objective}: ideal and nadir both equal {value}")]
    DegenerateRange { objective: Objective, value: f64 },

    /// Malformed company table, configuration or weight vector.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O failure while reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for portfolio operations.
pub type Result<T> = std::result::Result<T, PortfolioError>;
