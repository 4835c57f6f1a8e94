//! The feasible region shared by both solve paths.
//!
//! - Simplex: `Σ w_j == 1`
//! - Box: `0 <= w_j <= cap`
//! - Beta band: `1 - tol <= Σ w_j β_j <= 1 + tol`, as two one-sided rows

use serde::{Deserialize, Serialize};

use crate::data::CompanyTable;
use crate::error::{PortfolioError, Result};
use crate::lp::{LinearConstraint, Relation};
use crate::objective::portfolio_beta;

/// Tolerance used when checking a finished weight vector.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Per-company cap and beta band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeasibleRegion {
    /// Largest allowed weight for any single company.
    pub weight_cap: f64,
    /// Half-width of the band around a portfolio beta of 1.
    pub beta_tolerance: f64,
}

impl Default for FeasibleRegion {
    fn default() -> Self {
        Self {
            weight_cap: 0.05,
            beta_tolerance: 0.1,
        }
    }
}

/// Outcome of checking a weight vector against the region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityReport {
    pub sum_weights: f64,
    pub beta: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    pub violations: Vec<String>,
}

impl FeasibilityReport {
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

impl FeasibleRegion {
    pub fn new(weight_cap: f64, beta_tolerance: f64) -> Result<Self> {
        let region = Self {
            weight_cap,
            beta_tolerance,
        };
        region.validate()?;
        Ok(region)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.weight_cap.is_finite() && self.weight_cap > 0.0) {
            return Err(PortfolioError::InvalidInput(format!(
                "weight cap must be positive, got {}",
                self.weight_cap
            )));
        }
        if !(self.beta_tolerance.is_finite() && self.beta_tolerance >= 0.0) {
            return Err(PortfolioError::InvalidInput(format!(
                "beta tolerance must be non-negative, got {}",
                self.beta_tolerance
            )));
        }
        Ok(())
    }

    /// `(1 - tol, 1 + tol)`.
    pub fn beta_band(&self) -> (f64, f64) {
        (1.0 - self.beta_tolerance, 1.0 + self.beta_tolerance)
    }

    /// Rule out regions that are empty for simple reasons, before solving.
    pub fn precheck(&self, table: &CompanyTable) -> Result<()> {
        self.validate()?;

        let n = table.len();
        if n as f64 * self.weight_cap < 1.0 - WEIGHT_TOLERANCE {
            return Err(PortfolioError::Infeasible(format!(
                "weight cap {} is too low for {} companies to sum to 1 (needs at least {:.6})",
                self.weight_cap,
                n,
                1.0 / n as f64
            )));
        }

        let (lo, hi) = self.beta_band();
        let min_beta = table.betas().min();
        let max_beta = table.betas().max();
        if max_beta < lo || min_beta > hi {
            return Err(PortfolioError::Infeasible(format!(
                "beta band [{}, {}] does not intersect company betas [{}, {}]",
                lo, hi, min_beta, max_beta
            )));
        }
        Ok(())
    }

    /// Linear rows of the region over variables `0..table.len()`.
    ///
    /// Programs with extra variables after the weights leave those free.
    pub fn constraints(&self, table: &CompanyTable) -> Vec<LinearConstraint> {
        let n = table.len();
        let (lo, hi) = self.beta_band();
        let betas: Vec<(usize, f64)> = table.betas().iter().copied().enumerate().collect();

        let mut rows = Vec::with_capacity(2 * n + 3);
        rows.push(LinearConstraint::new(
            "sum of weights == 1",
            (0..n).map(|j| (j, 1.0)).collect(),
            Relation::Eq,
            1.0,
        ));
        rows.push(LinearConstraint::new(
            format!("portfolio beta <= {}", hi),
            betas.clone(),
            Relation::Leq,
            hi,
        ));
        rows.push(LinearConstraint::new(
            format!("portfolio beta >= {}", lo),
            betas,
            Relation::Geq,
            lo,
        ));
        for (j, name) in table.names().enumerate() {
            rows.push(LinearConstraint::single(
                format!("weight of {} >= 0", name),
                j,
                Relation::Geq,
                0.0,
            ));
            rows.push(LinearConstraint::single(
                format!("weight of {} <= {}", name, self.weight_cap),
                j,
                Relation::Leq,
                self.weight_cap,
            ));
        }
        rows
    }

    /// Project solver round-off back into `[0, cap]`.
    pub fn clamp(&self, weights: &[f64]) -> Vec<f64> {
        weights
            .iter()
            .map(|w| w.clamp(0.0, self.weight_cap))
            .collect()
    }

    /// Check every predicate of the region within [`WEIGHT_TOLERANCE`].
    pub fn check(&self, table: &CompanyTable, weights: &[f64]) -> Result<FeasibilityReport> {
        let beta = portfolio_beta(table, weights)?;
        let sum_weights: f64 = weights.iter().sum();
        let min_weight = weights.iter().copied().fold(f64::INFINITY, f64::min);
        let max_weight = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut violations = Vec::new();
        if (sum_weights - 1.0).abs() > WEIGHT_TOLERANCE {
            violations.push(format!("sum of weights is {}", sum_weights));
        }
        if min_weight < -WEIGHT_TOLERANCE {
            violations.push(format!("negative weight {}", min_weight));
        }
        if max_weight > self.weight_cap + WEIGHT_TOLERANCE {
            violations.push(format!(
                "weight {} exceeds cap {}",
                max_weight, self.weight_cap
            ));
        }
        let (lo, hi) = self.beta_band();
        if beta < lo - WEIGHT_TOLERANCE || beta > hi + WEIGHT_TOLERANCE {
            violations.push(format!("portfolio beta {} outside [{}, {}]", beta, lo, hi));
        }

        Ok(FeasibilityReport {
            sum_weights,
            beta,
            min_weight,
            max_weight,
            violations,
        })
    }
}
