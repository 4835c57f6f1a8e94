//! Payoff table, ideal vector and nadir estimate.
//!
//! Each objective is optimized alone over the feasible region. The row of
//! the payoff table is the full objective vector at that optimum. The ideal
//! is the best value in each column and the nadir estimate the worst; the
//! nadir taken from a payoff table is a heuristic and can be too optimistic.

use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::constraints::FeasibleRegion;
use crate::data::CompanyTable;
use crate::error::{PortfolioError, Result};
use crate::lp::{LinearProgram, Settings, SolveStatus};
use crate::objective::{
    evaluate, objective_coefficients, Objective, ObjectiveTable, ObjectiveVector, OBJECTIVE_COUNT,
};

/// Single-objective optimum and the objective vector it produces.
#[derive(Debug, Clone, Serialize)]
pub struct PayoffRow {
    pub objective: Objective,
    #[serde(skip)]
    pub weights: Vec<f64>,
    pub values: ObjectiveVector,
    pub status: SolveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// One row per objective, in [`Objective::ALL`] order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PayoffTable {
    rows: Vec<PayoffRow>,
}

impl PayoffTable {
    pub fn rows(&self) -> &[PayoffRow] {
        &self.rows
    }

    fn column(&self, objective: Objective) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |r| r.values[objective])
    }

    /// Best value of each column.
    pub fn ideal(&self, objectives: &ObjectiveTable) -> ObjectiveVector {
        ObjectiveVector::from_fn(|o| {
            let sense = objectives.sense(o);
            self.column(o)
                .reduce(|a, b| sense.best(a, b))
                .unwrap_or(f64::NAN)
        })
    }

    /// Worst value of each column.
    pub fn nadir(&self, objectives: &ObjectiveTable) -> ObjectiveVector {
        ObjectiveVector::from_fn(|o| {
            let sense = objectives.sense(o);
            self.column(o)
                .reduce(|a, b| sense.worst(a, b))
                .unwrap_or(f64::NAN)
        })
    }

    /// 5 x 5 matrix; row `k` is the objective vector when `k` is optimized.
    pub fn matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.rows.len(), OBJECTIVE_COUNT, |r, c| self.rows[r].values.0[c])
    }

    pub fn warnings(&self) -> impl Iterator<Item = (Objective, &str)> {
        self.rows
            .iter()
            .filter_map(|r| r.warning.as_deref().map(|w| (r.objective, w)))
    }
}

/// Ideal and nadir vectors with the table they came from.
#[derive(Debug, Clone, Serialize)]
pub struct IdealNadir {
    pub ideal: ObjectiveVector,
    pub nadir: ObjectiveVector,
    pub payoff: PayoffTable,
}

/// Solve the five single-objective problems and summarize them.
pub fn estimate_ideal_nadir(
    table: &CompanyTable,
    region: &FeasibleRegion,
    objectives: &ObjectiveTable,
    settings: &Settings,
    parallel: bool,
) -> Result<IdealNadir> {
    region.precheck(table)?;
    info!(companies = table.len(), parallel, "building payoff table");

    let solve_row = |o: &Objective| payoff_row(table, region, objectives, *o, settings);
    let rows = if parallel {
        Objective::ALL[..]
            .par_iter()
            .map(solve_row)
            .collect::<Result<Vec<_>>>()?
    } else {
        Objective::ALL
            .iter()
            .map(solve_row)
            .collect::<Result<Vec<_>>>()?
    };

    let payoff = PayoffTable { rows };
    let ideal = payoff.ideal(objectives);
    let nadir = payoff.nadir(objectives);
    debug!(%ideal, %nadir, "ideal and nadir estimated");

    Ok(IdealNadir {
        ideal,
        nadir,
        payoff,
    })
}

fn payoff_row(
    table: &CompanyTable,
    region: &FeasibleRegion,
    objectives: &ObjectiveTable,
    objective: Objective,
    settings: &Settings,
) -> Result<PayoffRow> {
    let sense = objectives.sense(objective);
    let solution = LinearProgram::optimize(sense, objective_coefficients(table, objective))
        .subject_to(region.constraints(table))
        .solve_unchecked(settings)?;

    let warning = match solution.status {
        SolveStatus::Optimal => None,
        SolveStatus::Infeasible => {
            return Err(PortfolioError::Infeasible(format!(
                "no feasible portfolio while optimizing {}",
                objective
            )))
        }
        SolveStatus::Unbounded => {
            return Err(PortfolioError::SolverError(format!(
                "{} is unbounded over the region",
                objective
            )))
        }
        status => Some(format!(
            "{} sub-problem stopped with status {:?} after {} iterations; point kept",
            objective, status, solution.iterations
        )),
    };

    let x = solution.primal.as_deref().ok_or_else(|| {
        PortfolioError::SolverError(format!(
            "{} sub-problem returned no usable point ({:?})",
            objective, solution.status
        ))
    })?;
    if let Some(w) = &warning {
        warn!(%objective, status = ?solution.status, "payoff sub-problem degraded: {}", w);
    }

    let weights = region.clamp(x);
    let values = evaluate(table, &weights)?.objectives;
    debug!(%objective, value = values[objective], "payoff row");

    Ok(PayoffRow {
        objective,
        weights,
        values,
        status: solution.status,
        warning,
    })
}
