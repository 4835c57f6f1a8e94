//! # mo-portfolio
//!
//! Multiobjective portfolio construction over five objectives: expected
//! return, sustainability (ESG score), dividend yield, clean energy and the
//! price-to-earnings ratio.
//!
//! Two methods are available, both solved exactly as linear programs with the
//! Clarabel solver:
//!
//! - **Epsilon-constraint**: optimize one objective while bounding the other
//!   four.
//! - **Reference point**: build a payoff table, estimate the ideal and nadir
//!   vectors, normalize, and minimize an augmented achievement scalarizing
//!   function for a decision maker's aspiration levels.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mo_portfolio::prelude::*;
//!
//! let table = load_csv("companies.csv", &LoadOptions::default())?;
//!
//! let config = SolveConfig::epsilon(Objective::PeRatio, vec![0.09, 0.6, 2.0, 1.0]);
//! let report = run(&table, &config)?;
//!
//! println!("{}", report);
//! ```
//!
//! ## Feasible Region
//!
//! Both methods share one region:
//!
//! - Weights sum to 1
//! - Every weight lies in `[0, cap]` (cap 0.05 by default)
//! - Portfolio beta `Σ w_j β_j` lies in `[1 - tol, 1 + tol]` (tol 0.1 by default)
//!
//! ## Architecture
//!
//! - **Company table** with an `n x 5` attribute matrix
//! - **Objective table** declaring the sense of each objective and the
//!   direction of its epsilon bounds
//! - **LP backend** stuffing labelled rows into Clarabel's conic form
//! - **Reports** as JSON or plain text

pub mod config;
pub mod constraints;
pub mod data;
pub mod error;
pub mod lp;
pub mod method;
pub mod objective;
pub mod report;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use mo_portfolio::prelude::*;
/// ```
pub mod prelude {
    // Data
    pub use crate::data::{load_csv, read_csv, Company, CompanyTable, LoadOptions};

    // Objectives
    pub use crate::objective::{
        evaluate, BoundDirection, Evaluation, Objective, ObjectiveTable, ObjectiveVector, Sense,
    };

    // Region
    pub use crate::constraints::{FeasibilityReport, FeasibleRegion};

    // Methods
    pub use crate::method::{
        estimate_ideal_nadir, run, solve_achievement, solve_epsilon_constraint, Normalizer,
    };

    // Configuration and output
    pub use crate::config::{Method, SolveConfig};
    pub use crate::lp::Settings;
    pub use crate::report::{Holding, Report};

    // Errors
    pub use crate::error::{PortfolioError, Result};
}

// Re-export main types at crate root
pub use config::SolveConfig;
pub use error::{PortfolioError, Result};
pub use method::run;
pub use report::Report;
