//! Solve reports.
//!
//! A [`Report`] serializes to JSON and renders as plain text through
//! `Display`. Building one never solves anything.

use std::fmt;

use serde::Serialize;

use crate::constraints::FeasibleRegion;
use crate::data::CompanyTable;
use crate::error::Result;
use crate::method::asf::AchievementSolution;
use crate::method::epsilon::{EpsilonBound, EpsilonSolution};
use crate::method::payoff::{IdealNadir, PayoffTable};
use crate::objective::{Evaluation, Objective, ObjectiveVector, Sense};

/// A company with a weight above the report threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub company: String,
    pub weight: f64,
}

/// Companies whose weight exceeds `threshold`, in table order.
pub fn holdings(table: &CompanyTable, weights: &[f64], threshold: f64) -> Vec<Holding> {
    table
        .names()
        .zip(weights)
        .filter(|(_, w)| **w > threshold)
        .map(|(name, w)| Holding {
            company: name.to_string(),
            weight: *w,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimizedObjective {
    pub objective: Objective,
    pub sense: Sense,
    pub value: f64,
}

/// The starting weight vector of a reference-point run, as evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct StartPoint {
    pub objectives: ObjectiveVector,
    pub normalized: ObjectiveVector,
    /// Region violations; empty when the starting point is feasible.
    pub violations: Vec<String>,
}

/// Reference-point details.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceDetails {
    pub reference: ObjectiveVector,
    pub normalized_reference: ObjectiveVector,
    pub ideal: ObjectiveVector,
    pub nadir: ObjectiveVector,
    pub payoff: PayoffTable,
    pub achievement: f64,
    pub max_term: f64,
    pub normalized_objectives: ObjectiveVector,
    pub start_objectives: ObjectiveVector,
    pub normalized_start: ObjectiveVector,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub start_violations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized: Option<OptimizedObjective>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<EpsilonBound>,
    pub objectives: ObjectiveVector,
    pub beta: f64,
    pub holdings: Vec<Holding>,
    pub sum_weights: f64,
    pub feasible: bool,
    pub violations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceDetails>,
    /// Full weight vector in table order.
    pub weights: Vec<f64>,
}

impl Report {
    fn base(
        method: &'static str,
        table: &CompanyTable,
        region: &FeasibleRegion,
        weights: Vec<f64>,
        evaluation: &Evaluation,
        threshold: f64,
    ) -> Result<Self> {
        let check = region.check(table, &weights)?;
        Ok(Self {
            method,
            optimized: None,
            bounds: Vec::new(),
            objectives: evaluation.objectives,
            beta: evaluation.beta,
            holdings: holdings(table, &weights, threshold),
            sum_weights: check.sum_weights,
            feasible: check.is_feasible(),
            violations: check.violations,
            reference: None,
            weights,
        })
    }

    pub fn epsilon(
        table: &CompanyTable,
        region: &FeasibleRegion,
        solution: EpsilonSolution,
        threshold: f64,
    ) -> Result<Self> {
        let mut report = Self::base(
            "epsilon_constraint",
            table,
            region,
            solution.weights,
            &solution.evaluation,
            threshold,
        )?;
        report.optimized = Some(OptimizedObjective {
            objective: solution.objective,
            sense: solution.sense,
            value: solution.value,
        });
        report.bounds = solution.bounds;
        Ok(report)
    }

    pub fn reference_point(
        table: &CompanyTable,
        region: &FeasibleRegion,
        reference: ObjectiveVector,
        estimate: IdealNadir,
        solution: AchievementSolution,
        start: StartPoint,
        threshold: f64,
    ) -> Result<Self> {
        let mut report = Self::base(
            "reference_point",
            table,
            region,
            solution.weights,
            &solution.evaluation,
            threshold,
        )?;
        report.reference = Some(ReferenceDetails {
            reference,
            normalized_reference: solution.normalized_reference,
            ideal: estimate.ideal,
            nadir: estimate.nadir,
            payoff: estimate.payoff,
            achievement: solution.achievement,
            max_term: solution.max_term,
            normalized_objectives: solution.normalized,
            start_objectives: start.objectives,
            normalized_start: start.normalized,
            start_violations: start.violations,
        });
        Ok(report)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn write_vector(f: &mut fmt::Formatter<'_>, v: &ObjectiveVector) -> fmt::Result {
    for (o, value) in v.iter() {
        writeln!(f, "  {:<18} {:>14.6}", o.name(), value)?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.optimized {
            Some(opt) => {
                writeln!(f, "Method: epsilon-constraint")?;
                let verb = match opt.sense {
                    Sense::Maximize => "maximize",
                    Sense::Minimize => "minimize",
                };
                writeln!(f, "Optimized: {} ({}) = {:.6}", opt.objective, verb, opt.value)?;
                writeln!(f, "Bounds:")?;
                for b in &self.bounds {
                    writeln!(f, "  {} {} {}", b.objective, b.direction.symbol(), b.value)?;
                }
            }
            None => writeln!(f, "Method: reference point")?,
        }

        if let Some(r) = &self.reference {
            writeln!(f, "Reference point: {}", r.reference)?;
            writeln!(f, "Normalized reference point: {}", r.normalized_reference)?;
            writeln!(f, "Normalized objectives at start: {}", r.normalized_start)?;
            if !r.start_violations.is_empty() {
                writeln!(
                    f,
                    "  warning: starting point is outside the region: {}",
                    r.start_violations.join("; ")
                )?;
            }
            writeln!(f, "Payoff table:")?;
            for row in r.payoff.rows() {
                writeln!(f, "  {:<18} {}", row.objective.name(), row.values)?;
                if let Some(w) = &row.warning {
                    writeln!(f, "    warning: {}", w)?;
                }
            }
            writeln!(f, "Ideal: {}", r.ideal)?;
            writeln!(f, "Nadir: {}", r.nadir)?;
            writeln!(f, "Achievement: {:.6} (max term {:.6})", r.achievement, r.max_term)?;
            writeln!(f, "Normalized objectives: {}", r.normalized_objectives)?;
        }

        writeln!(f, "Holdings:")?;
        for h in &self.holdings {
            writeln!(f, "  {:<30} {:>10.6}", h.company, h.weight)?;
        }
        writeln!(f, "Objective values:")?;
        write_vector(f, &self.objectives)?;
        writeln!(f, "Portfolio beta: {:.6}", self.beta)?;
        let verdict = if self.feasible { "feasible" } else { "NOT feasible" };
        writeln!(f, "Sum of weights: {:.6} ({})", self.sum_weights, verdict)?;
        for v in &self.violations {
            writeln!(f, "  violation: {}", v)?;
        }
        Ok(())
    }
}
