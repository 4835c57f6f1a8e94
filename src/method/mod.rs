//! Multiobjective solve methods.
//!
//! - [`epsilon`]: one objective optimized, the rest bounded
//! - [`payoff`], [`normalize`], [`asf`]: the reference-point pipeline

pub mod asf;
pub mod epsilon;
pub mod normalize;
pub mod payoff;

use tracing::{info, warn};

use crate::config::{Method, SolveConfig};
use crate::data::CompanyTable;
use crate::error::{PortfolioError, Result};
use crate::objective::evaluate;
use crate::report::{Report, StartPoint};

pub use asf::{solve_achievement, AchievementSolution};
pub use epsilon::{solve_epsilon_constraint, EpsilonBound, EpsilonSolution};
pub use normalize::Normalizer;
pub use payoff::{estimate_ideal_nadir, IdealNadir, PayoffRow, PayoffTable};

/// Run the configured method and build its report.
pub fn run(table: &CompanyTable, config: &SolveConfig) -> Result<Report> {
    config.validate()?;
    info!(
        method = config.method.kind(),
        companies = table.len(),
        weight_cap = config.region.weight_cap,
        beta_tolerance = config.region.beta_tolerance,
        "starting solve"
    );

    let report = match &config.method {
        Method::EpsilonConstraint { objective, bounds } => {
            let solution = solve_epsilon_constraint(
                table,
                &config.region,
                &config.objectives,
                *objective,
                bounds,
                &config.settings,
            )?;
            Report::epsilon(table, &config.region, solution, config.holding_threshold)?
        }
        Method::ReferencePoint { reference, start } => {
            let start = match start {
                Some(w) => w.clone(),
                None => table.uniform_weights(),
            };
            // Validates the length before any solve.
            let start_eval = evaluate(table, &start).map_err(|e| match e {
                PortfolioError::InvalidInput(msg) => {
                    PortfolioError::InvalidInput(format!("starting point: {}", msg))
                }
                other => other,
            })?;
            let start_check = config.region.check(table, &start)?;
            if !start_check.is_feasible() {
                warn!(
                    violations = ?start_check.violations,
                    "starting point is outside the feasible region"
                );
            }

            let estimate = estimate_ideal_nadir(
                table,
                &config.region,
                &config.objectives,
                &config.settings,
                config.parallel,
            )?;
            let normalizer = Normalizer::new(estimate.ideal, estimate.nadir)?;
            let normalized_start = normalizer.normalize(&start_eval.objectives);
            info!(%normalized_start, "normalized objectives at starting point");

            let solution = solve_achievement(
                table,
                &config.region,
                &normalizer,
                reference,
                config.rho,
                &config.settings,
            )?;
            Report::reference_point(
                table,
                &config.region,
                *reference,
                estimate,
                solution,
                StartPoint {
                    objectives: start_eval.objectives,
                    normalized: normalized_start,
                    violations: start_check.violations,
                },
                config.holding_threshold,
            )?
        }
    };

    info!(
        feasible = report.feasible,
        holdings = report.holdings.len(),
        beta = report.beta,
        "solve finished"
    );
    Ok(report)
}
