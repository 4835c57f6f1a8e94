//! Clarabel solver integration.
//!
//! This module provides the interface to the Clarabel conic solver.

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use serde::{Deserialize, Serialize};

use super::stuffing::{ConeDims, StuffedProblem};
use crate::error::{PortfolioError, Result};

/// Solution status from the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Converged to the reduced accuracy tolerances only.
    AlmostOptimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Maximum iterations or time reached.
    MaxIterations,
    /// Numerical difficulties.
    NumericalError,
    /// Unknown status.
    Unknown,
}

impl From<SolverStatus> for SolveStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::AlmostSolved => SolveStatus::AlmostOptimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                SolveStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                SolveStatus::Unbounded
            }
            SolverStatus::MaxIterations | SolverStatus::MaxTime => SolveStatus::MaxIterations,
            SolverStatus::NumericalError | SolverStatus::InsufficientProgress => {
                SolveStatus::NumericalError
            }
            _ => SolveStatus::Unknown,
        }
    }
}

impl SolveStatus {
    /// Statuses whose primal point is still worth looking at.
    pub fn has_usable_point(self) -> bool {
        matches!(
            self,
            SolveStatus::Optimal
                | SolveStatus::AlmostOptimal
                | SolveStatus::MaxIterations
                | SolveStatus::NumericalError
        )
    }
}

/// Solver settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Print solver output.
    pub verbose: bool,
    /// Maximum iterations.
    pub max_iter: u32,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Absolute duality gap tolerance.
    pub tol_gap_abs: f64,
    /// Relative duality gap tolerance.
    pub tol_gap_rel: f64,
    /// Feasibility tolerance.
    pub tol_feas: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            verbose: false,
            max_iter: 1000,
            time_limit: f64::INFINITY,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
            tol_feas: 1e-8,
        }
    }
}

/// Solution from the solver.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status.
    pub status: SolveStatus,
    /// Objective value at the primal point, in the program's own sense.
    pub value: Option<f64>,
    /// Primal variable values, present whenever the status has a usable point.
    pub primal: Option<Vec<f64>>,
    /// Solve time in seconds.
    pub solve_time: f64,
    /// Number of iterations.
    pub iterations: u32,
}

impl Solution {
    /// Primal values, or a solver error naming the status.
    pub fn primal_or_err(&self) -> Result<&[f64]> {
        self.primal.as_deref().ok_or_else(|| {
            PortfolioError::SolverError(format!("no primal point ({:?})", self.status))
        })
    }
}

/// Solve the stuffed problem using Clarabel.
pub fn solve(problem: &StuffedProblem, settings: &Settings) -> Result<Solution> {
    let p = to_clarabel_csc(&problem.p);
    let a = to_clarabel_csc(&problem.a);
    let cones = to_clarabel_cones(&problem.cone_dims);

    let clarabel_settings = DefaultSettingsBuilder::default()
        .verbose(settings.verbose)
        .max_iter(settings.max_iter)
        .time_limit(settings.time_limit)
        .tol_gap_abs(settings.tol_gap_abs)
        .tol_gap_rel(settings.tol_gap_rel)
        .tol_feas(settings.tol_feas)
        .build()
        .map_err(|e| PortfolioError::SolverError(format!("invalid settings: {}", e)))?;

    let mut solver = DefaultSolver::new(&p, &problem.q, &a, &problem.b, &cones, clarabel_settings);
    solver.solve();

    let status: SolveStatus = solver.solution.status.into();
    let solve_time = solver.solution.solve_time;
    let iterations = solver.info.iterations;

    let x = &solver.solution.x;
    let usable = status.has_usable_point() && x.iter().all(|v| v.is_finite());

    if usable {
        let value: f64 = problem.q.iter().zip(x.iter()).map(|(qi, xi)| qi * xi).sum();
        Ok(Solution {
            status,
            value: Some(value),
            primal: Some(x.clone()),
            solve_time,
            iterations,
        })
    } else {
        Ok(Solution {
            status,
            value: None,
            primal: None,
            solve_time,
            iterations,
        })
    }
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &nalgebra_sparse::CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

/// Convert cone dimensions to Clarabel cones.
fn to_clarabel_cones(dims: &ConeDims) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();

    if dims.zero > 0 {
        cones.push(SupportedConeT::ZeroConeT(dims.zero));
    }

    if dims.nonneg > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(dims.nonneg));
    }

    cones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.verbose);
        assert_eq!(settings.max_iter, 1000);
        assert!(settings.time_limit.is_infinite());
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: Settings = serde_json::from_str(r#"{"max_iter": 50}"#).unwrap();
        assert_eq!(settings.max_iter, 50);
        assert_eq!(settings.tol_gap_abs, 1e-8);
    }

    #[test]
    fn test_to_clarabel_cones() {
        let cones = to_clarabel_cones(&ConeDims { zero: 1, nonneg: 4 });
        assert_eq!(cones.len(), 2);
        let cones = to_clarabel_cones(&ConeDims { zero: 0, nonneg: 4 });
        assert_eq!(cones.len(), 1);
    }

    #[test]
    fn test_usable_statuses() {
        assert!(SolveStatus::MaxIterations.has_usable_point());
        assert!(!SolveStatus::Infeasible.has_usable_point());
        assert!(!SolveStatus::Unbounded.has_usable_point());
    }
}
