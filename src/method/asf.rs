//! Achievement scalarizing function.
//!
//! ```text
//! s(w) = max_i (f̂_i(w) - r̂_i) + ρ Σ_i f̂_i(w)
//! ```
//!
//! `f̂` is the normalized objective vector and `r̂` the normalized reference
//! point. Every `f̂_i` is affine in `w`, so the max is replaced by an epigraph
//! variable `t`:
//!
//! ```text
//! minimize    t + ρ Σ_i f̂_i(w)
//! subject to  t >= f̂_i(w) - r̂_i    for every objective i
//!             w in the feasible region
//! ```

use tracing::{debug, info};

use super::normalize::Normalizer;
use crate::constraints::FeasibleRegion;
use crate::data::CompanyTable;
use crate::error::{PortfolioError, Result};
use crate::lp::{LinearConstraint, LinearProgram, Relation, Settings};
use crate::objective::{evaluate, Evaluation, Objective, ObjectiveVector};

/// Default augmentation coefficient.
pub const DEFAULT_RHO: f64 = 1e-6;

/// Minimizer of the achievement function.
#[derive(Debug, Clone)]
pub struct AchievementSolution {
    pub weights: Vec<f64>,
    pub evaluation: Evaluation,
    /// Normalized objectives at `weights`.
    pub normalized: ObjectiveVector,
    /// Normalized reference point.
    pub normalized_reference: ObjectiveVector,
    /// `s(w)` at the returned weights.
    pub achievement: f64,
    /// `max_i (f̂_i(w) - r̂_i)` alone.
    pub max_term: f64,
}

/// Evaluate `s` for already normalized objectives.
pub fn achievement_value(
    normalized: &ObjectiveVector,
    normalized_reference: &ObjectiveVector,
    rho: f64,
) -> (f64, f64) {
    let max_term = Objective::ALL
        .into_iter()
        .map(|o| normalized[o] - normalized_reference[o])
        .fold(f64::NEG_INFINITY, f64::max);
    (max_term + rho * normalized.sum(), max_term)
}

/// Build the epigraph LP. Variables are `[w_0 .. w_{n-1}, t]`.
pub fn achievement_program(
    table: &CompanyTable,
    region: &FeasibleRegion,
    normalizer: &Normalizer,
    normalized_reference: &ObjectiveVector,
    rho: f64,
) -> LinearProgram {
    let n = table.len();
    let t = n;

    let mut cost = vec![0.0; n + 1];
    cost[t] = 1.0;

    let mut rows = Vec::with_capacity(Objective::ALL.len());
    for o in Objective::ALL {
        let (coeffs, offset) = normalizer.affine_row(table, o);
        for (c, a) in cost.iter_mut().zip(&coeffs) {
            *c += rho * a;
        }

        // t - a·w >= offset - r̂
        let mut terms: Vec<(usize, f64)> = coeffs
            .iter()
            .enumerate()
            .filter(|(_, a)| **a != 0.0)
            .map(|(j, a)| (j, -a))
            .collect();
        terms.push((t, 1.0));
        rows.push(LinearConstraint::new(
            format!("achievement epigraph for {}", o),
            terms,
            Relation::Geq,
            offset - normalized_reference[o],
        ));
    }

    LinearProgram::minimize(cost)
        .subject_to(region.constraints(table))
        .subject_to(rows)
}

/// Minimize the achievement function for `reference` over the region.
pub fn solve_achievement(
    table: &CompanyTable,
    region: &FeasibleRegion,
    normalizer: &Normalizer,
    reference: &ObjectiveVector,
    rho: f64,
    settings: &Settings,
) -> Result<AchievementSolution> {
    if !reference.is_finite() {
        return Err(PortfolioError::InvalidInput(format!(
            "reference point {} is not finite",
            reference
        )));
    }
    if !(rho.is_finite() && rho >= 0.0) {
        return Err(PortfolioError::InvalidInput(format!(
            "augmentation coefficient must be non-negative, got {}",
            rho
        )));
    }
    region.precheck(table)?;

    let normalized_reference = normalizer.normalize(reference);
    info!(%reference, normalized = %normalized_reference, rho, "minimizing achievement function");

    let program = achievement_program(table, region, normalizer, &normalized_reference, rho);
    let solution = program.solve_with(settings)?;
    let x = solution.primal_or_err()?;

    let weights = region.clamp(&x[..table.len()]);
    let evaluation = evaluate(table, &weights)?;
    let normalized = normalizer.normalize(&evaluation.objectives);
    let (achievement, max_term) = achievement_value(&normalized, &normalized_reference, rho);
    debug!(achievement, max_term, epigraph = x[table.len()], "achievement solved");

    Ok(AchievementSolution {
        weights,
        evaluation,
        normalized,
        normalized_reference,
        achievement,
        max_term,
    })
}
