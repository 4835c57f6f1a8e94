//! Epsilon-constraint method.
//!
//! One objective is optimized; the other four become bound constraints whose
//! directions come from the [`ObjectiveTable`]. Everything is linear, so the
//! whole problem is a single LP.

use serde::Serialize;
use tracing::{debug, info};

use crate::constraints::FeasibleRegion;
use crate::data::CompanyTable;
use crate::error::{PortfolioError, Result};
use crate::lp::{LinearConstraint, LinearProgram, Settings};
use crate::objective::{
    evaluate, objective_coefficients, BoundDirection, Evaluation, Objective, ObjectiveTable, Sense,
};

/// Slack allowed when comparing a bound with the best value its objective
/// reaches on its own.
const REACHABLE_TOLERANCE: f64 = 1e-6;

/// A bound placed on a non-optimized objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpsilonBound {
    pub objective: Objective,
    pub direction: BoundDirection,
    pub value: f64,
}

impl EpsilonBound {
    fn label(&self) -> String {
        format!("{} {} {}", self.objective, self.direction.symbol(), self.value)
    }

    fn to_constraint(self, table: &CompanyTable) -> LinearConstraint {
        LinearConstraint::dense(
            self.label(),
            &objective_coefficients(table, self.objective),
            self.direction.relation(),
            self.value,
        )
    }
}

/// Result of an epsilon-constraint solve.
#[derive(Debug, Clone)]
pub struct EpsilonSolution {
    pub objective: Objective,
    pub sense: Sense,
    /// Optimal value of the optimized objective.
    pub value: f64,
    pub weights: Vec<f64>,
    pub evaluation: Evaluation,
    pub bounds: Vec<EpsilonBound>,
}

/// Pair the four bounds with the remaining objectives.
///
/// `bounds` is ordered like [`Objective::ALL`] with `objective` left out.
pub fn epsilon_bounds(
    objectives: &ObjectiveTable,
    objective: Objective,
    bounds: &[f64],
) -> Result<Vec<EpsilonBound>> {
    if bounds.len() != Objective::ALL.len() - 1 {
        return Err(PortfolioError::InvalidInput(format!(
            "expected 4 bounds for the objectives other than {}, got {}",
            objective,
            bounds.len()
        )));
    }
    if let Some(b) = bounds.iter().find(|b| !b.is_finite()) {
        return Err(PortfolioError::InvalidInput(format!(
            "bound {} is not finite",
            b
        )));
    }

    Ok(objectives
        .bounded(objective)
        .zip(bounds)
        .map(|((o, direction), value)| EpsilonBound {
            objective: o,
            direction,
            value: *value,
        })
        .collect())
}

/// Build the epsilon-constraint LP.
pub fn epsilon_program(
    table: &CompanyTable,
    region: &FeasibleRegion,
    objectives: &ObjectiveTable,
    objective: Objective,
    bounds: &[EpsilonBound],
) -> LinearProgram {
    LinearProgram::optimize(
        objectives.sense(objective),
        objective_coefficients(table, objective),
    )
    .subject_to(region.constraints(table))
    .subject_to(bounds.iter().map(|b| b.to_constraint(table)))
}

/// Optimize `objective` subject to bounds on the other four.
pub fn solve_epsilon_constraint(
    table: &CompanyTable,
    region: &FeasibleRegion,
    objectives: &ObjectiveTable,
    objective: Objective,
    bounds: &[f64],
    settings: &Settings,
) -> Result<EpsilonSolution> {
    let bounds = epsilon_bounds(objectives, objective, bounds)?;
    region.precheck(table)?;

    let sense = objectives.sense(objective);
    info!(%objective, ?sense, companies = table.len(), "epsilon-constraint solve");
    for b in &bounds {
        debug!(bound = %b.label(), "epsilon bound");
    }

    let program = epsilon_program(table, region, objectives, objective, &bounds);
    let solution = match program.solve_with(settings) {
        Ok(solution) => solution,
        Err(PortfolioError::Infeasible(_)) => {
            return Err(diagnose_infeasibility(table, region, &bounds, settings))
        }
        Err(e) => return Err(e),
    };

    let weights = region.clamp(solution.primal_or_err()?);
    let evaluation = evaluate(table, &weights)?;

    Ok(EpsilonSolution {
        objective,
        sense,
        value: evaluation.objectives[objective],
        weights,
        evaluation,
        bounds,
    })
}

/// Work out which constraints make the epsilon problem empty.
///
/// First the region alone, then each bound against the best value its
/// objective can reach inside the region.
fn diagnose_infeasibility(
    table: &CompanyTable,
    region: &FeasibleRegion,
    bounds: &[EpsilonBound],
    settings: &Settings,
) -> PortfolioError {
    let n = table.len();
    let base = LinearProgram::minimize(vec![0.0; n]).subject_to(region.constraints(table));
    let inside = match base.solve_with(settings) {
        Ok(sol) => sol.primal,
        Err(PortfolioError::Infeasible(_)) => {
            let (lo, hi) = region.beta_band();
            return PortfolioError::Infeasible(format!(
                "no portfolio with weights <= {} has beta in [{}, {}]",
                region.weight_cap, lo, hi
            ));
        }
        Err(e) => return e,
    };

    let mut unreachable = Vec::new();
    for b in bounds {
        // Push the bounded objective as far as its bound direction wants.
        let sense = match b.direction {
            BoundDirection::AtLeast => Sense::Maximize,
            BoundDirection::AtMost => Sense::Minimize,
        };
        let extreme = LinearProgram::optimize(sense, objective_coefficients(table, b.objective))
            .subject_to(region.constraints(table))
            .solve_with(settings);
        match extreme {
            Ok(sol) => {
                let best = sol.value.unwrap_or(f64::NAN);
                let slack = REACHABLE_TOLERANCE * (1.0 + b.value.abs());
                let reachable = match b.direction {
                    BoundDirection::AtLeast => best >= b.value - slack,
                    BoundDirection::AtMost => best <= b.value + slack,
                };
                if !reachable {
                    unreachable.push(format!("{} (best achievable {:.6})", b.label(), best));
                }
            }
            Err(e) => return e,
        }
    }

    if unreachable.is_empty() {
        let labels: Vec<String> = bounds.iter().map(EpsilonBound::label).collect();
        let mut message = format!("bounds cannot hold simultaneously: {}", labels.join(", "));
        if let Some(x) = inside {
            let missed = missed_bounds(table, bounds, &x);
            if !missed.is_empty() {
                message.push_str("; a portfolio inside the region misses ");
                message.push_str(&missed.join(", "));
            }
        }
        PortfolioError::Infeasible(message)
    } else {
        PortfolioError::Infeasible(format!(
            "unreachable bounds: {}",
            unreachable.join("; ")
        ))
    }
}

/// Bounds violated at `weights`, each with its shortfall.
fn missed_bounds(table: &CompanyTable, bounds: &[EpsilonBound], weights: &[f64]) -> Vec<String> {
    bounds
        .iter()
        .filter_map(|b| {
            let row = b.to_constraint(table);
            let shortfall = row.violation(weights);
            (shortfall > REACHABLE_TOLERANCE * (1.0 + b.value.abs()))
                .then(|| format!("{} by {:.6}", row.label, shortfall))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::company::tests::company;

    #[test]
    fn test_bounds_follow_table_for_pe() {
        let bounds =
            epsilon_bounds(&ObjectiveTable::default(), Objective::PeRatio, &[0.09, 0.6, 2.0, 1.0])
                .unwrap();
        assert_eq!(bounds[3].objective, Objective::CleanEnergy);
        assert_eq!(bounds[3].direction, BoundDirection::AtLeast);
        assert_eq!(bounds[3].value, 1.0);
        assert!(bounds.iter().all(|b| b.direction == BoundDirection::AtLeast));
    }

    #[test]
    fn test_bounds_follow_table_for_return() {
        let bounds = epsilon_bounds(
            &ObjectiveTable::default(),
            Objective::ExpectedReturn,
            &[0.6, 2.0, 1.0, 15.0],
        )
        .unwrap();
        assert_eq!(bounds[0].objective, Objective::Sustainability);
        assert_eq!(bounds[3].objective, Objective::PeRatio);
        assert_eq!(bounds[3].direction, BoundDirection::AtMost);
    }

    #[test]
    fn test_wrong_bound_count_rejected() {
        let err = epsilon_bounds(&ObjectiveTable::default(), Objective::PeRatio, &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidInput(_)));
    }

    #[test]
    fn test_missed_bounds_names_shortfalls() {
        let table = CompanyTable::new(vec![
            company("A", 1.0, [0.2, 0.0, 1.0, 0.0, 10.0]),
            company("B", 1.0, [0.0, 0.9, 1.0, 0.0, 10.0]),
        ])
        .unwrap();
        let bounds = epsilon_bounds(
            &ObjectiveTable::default(),
            Objective::DividendYield,
            &[0.15, 0.6, 0.0, 100.0],
        )
        .unwrap();

        // all in A: return 0.2 holds, sustainability 0.0 misses by 0.6
        let missed = missed_bounds(&table, &bounds, &[1.0, 0.0]);
        assert_eq!(missed.len(), 1);
        assert!(missed[0].starts_with("Sustainability >= 0.6 by 0.6"), "{}", missed[0]);
        assert_eq!(missed_bounds(&table, &bounds, &[0.8, 0.2]).len(), 1);
    }

    #[test]
    fn test_program_sense_and_rows() {
        let table = CompanyTable::new(vec![
            company("A", 1.0, [0.1, 0.5, 2.0, 1.0, 12.0]),
            company("B", 1.0, [0.2, 0.6, 3.0, 0.0, 20.0]),
        ])
        .unwrap();
        let objectives = ObjectiveTable::default();
        let bounds =
            epsilon_bounds(&objectives, Objective::PeRatio, &[0.0, 0.0, 0.0, 0.0]).unwrap();
        let region = FeasibleRegion::new(1.0, 0.1).unwrap();
        let lp = epsilon_program(&table, &region, &objectives, Objective::PeRatio, &bounds);

        assert_eq!(lp.sense, Sense::Minimize);
        assert_eq!(lp.cost, vec![12.0, 20.0]);
        assert_eq!(lp.constraints.len(), 3 + 2 * 2 + 4);
    }
}
