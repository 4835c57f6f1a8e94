//! Linear program definition and solving API.
//!
//! ```ignore
//! let solution = LinearProgram::maximize(returns)
//!     .subject_to(region.constraints(&table))
//!     .solve()?;
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::clarabel::{solve, Settings, Solution, SolveStatus};
use super::stuffing::stuff_program;
use crate::error::{PortfolioError, Result};

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    /// True if `a` is strictly better than `b` under this sense.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Sense::Minimize => a < b,
            Sense::Maximize => a > b,
        }
    }

    /// The best of two values.
    pub fn best(self, a: f64, b: f64) -> f64 {
        if self.is_better(b, a) {
            b
        } else {
            a
        }
    }

    /// The worst of two values.
    pub fn worst(self, a: f64, b: f64) -> f64 {
        if self.is_better(b, a) {
            a
        } else {
            b
        }
    }
}

/// Relation between the left-hand side and the right-hand side of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `a·x == rhs`, zero cone.
    Eq,
    /// `a·x >= rhs`, nonnegative cone.
    Geq,
    /// `a·x <= rhs`, nonnegative cone.
    Leq,
}

/// A single labelled linear constraint `Σ terms <relation> rhs`.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    /// Human-readable description used in diagnostics.
    pub label: String,
    /// Sparse coefficients as (variable index, coefficient).
    pub terms: Vec<(usize, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(
        label: impl Into<String>,
        terms: Vec<(usize, f64)>,
        relation: Relation,
        rhs: f64,
    ) -> Self {
        Self {
            label: label.into(),
            terms,
            relation,
            rhs,
        }
    }

    /// Build from a dense coefficient slice, keeping only nonzeros.
    pub fn dense(label: impl Into<String>, coeffs: &[f64], relation: Relation, rhs: f64) -> Self {
        let terms = coeffs
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0.0)
            .map(|(j, c)| (j, *c))
            .collect();
        Self::new(label, terms, relation, rhs)
    }

    /// Bound on a single variable.
    pub fn single(label: impl Into<String>, var: usize, relation: Relation, rhs: f64) -> Self {
        Self::new(label, vec![(var, 1.0)], relation, rhs)
    }

    /// Left-hand side at `x`.
    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.terms.iter().map(|(j, c)| c * x[*j]).sum()
    }

    /// Amount by which `x` violates the row (zero when satisfied).
    pub fn violation(&self, x: &[f64]) -> f64 {
        let lhs = self.lhs(x);
        match self.relation {
            Relation::Eq => (lhs - self.rhs).abs(),
            Relation::Geq => (self.rhs - lhs).max(0.0),
            Relation::Leq => (lhs - self.rhs).max(0.0),
        }
    }
}

/// A linear program over `cost.len()` free variables.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    pub sense: Sense,
    pub cost: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
}

impl LinearProgram {
    /// Create a minimization problem.
    pub fn minimize(cost: Vec<f64>) -> Self {
        Self {
            sense: Sense::Minimize,
            cost,
            constraints: Vec::new(),
        }
    }

    /// Create a maximization problem.
    pub fn maximize(cost: Vec<f64>) -> Self {
        Self {
            sense: Sense::Maximize,
            cost,
            constraints: Vec::new(),
        }
    }

    /// Create a problem with an explicit sense.
    pub fn optimize(sense: Sense, cost: Vec<f64>) -> Self {
        Self {
            sense,
            cost,
            constraints: Vec::new(),
        }
    }

    /// Add constraints to the problem.
    pub fn subject_to(mut self, constraints: impl IntoIterator<Item = LinearConstraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Add a single constraint.
    pub fn constraint(mut self, c: LinearConstraint) -> Self {
        self.constraints.push(c);
        self
    }

    pub fn num_vars(&self) -> usize {
        self.cost.len()
    }

    /// Check indices and finiteness of every coefficient.
    pub fn validate(&self) -> Result<()> {
        let n = self.num_vars();
        if n == 0 {
            return Err(PortfolioError::InvalidInput(
                "linear program has no variables".into(),
            ));
        }
        if self.cost.iter().any(|c| !c.is_finite()) {
            return Err(PortfolioError::InvalidInput(
                "objective has non-finite coefficients".into(),
            ));
        }
        for c in &self.constraints {
            if !c.rhs.is_finite() {
                return Err(PortfolioError::InvalidInput(format!(
                    "constraint '{}' has non-finite right-hand side",
                    c.label
                )));
            }
            for (j, v) in &c.terms {
                if *j >= n || !v.is_finite() {
                    return Err(PortfolioError::InvalidInput(format!(
                        "constraint '{}' has an invalid term ({}, {})",
                        c.label, j, v
                    )));
                }
            }
        }
        Ok(())
    }

    /// Solve with default settings.
    pub fn solve(&self) -> Result<Solution> {
        self.solve_with(&Settings::default())
    }

    /// Solve and turn every status other than (almost) optimal into an error.
    pub fn solve_with(&self, settings: &Settings) -> Result<Solution> {
        let solution = self.solve_unchecked(settings)?;

        match solution.status {
            SolveStatus::Optimal => Ok(solution),
            SolveStatus::AlmostOptimal => {
                warn!(
                    iterations = solution.iterations,
                    "solver reached reduced accuracy only"
                );
                Ok(solution)
            }
            SolveStatus::Infeasible => Err(PortfolioError::Infeasible(
                "no point satisfies all constraints".into(),
            )),
            SolveStatus::Unbounded => {
                Err(PortfolioError::SolverError("Problem is unbounded".into()))
            }
            SolveStatus::MaxIterations => Err(PortfolioError::SolverError(format!(
                "Maximum iterations reached ({})",
                settings.max_iter
            ))),
            SolveStatus::NumericalError => Err(PortfolioError::SolverError(
                "Solver encountered numerical difficulties".into(),
            )),
            SolveStatus::Unknown => {
                Err(PortfolioError::SolverError("Unknown solver status".into()))
            }
        }
    }

    /// Solve and return whatever the backend produced, whatever the status.
    ///
    /// Only malformed programs and backend setup failures are errors here.
    pub fn solve_unchecked(&self, settings: &Settings) -> Result<Solution> {
        self.validate()?;

        let stuffed = stuff_program(self);
        debug!(
            vars = self.num_vars(),
            rows = stuffed.cone_dims.total(),
            nnz = stuffed.a.nnz(),
            "solving linear program"
        );

        let mut solution = solve(&stuffed, settings)?;

        if self.sense == Sense::Maximize {
            solution.value = solution.value.map(|v| -v);
        }

        debug!(
            status = ?solution.status,
            iterations = solution.iterations,
            solve_time = solution.solve_time,
            value = ?solution.value,
            "linear program finished"
        );
        Ok(solution)
    }
}
