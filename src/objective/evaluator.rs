//! Objective evaluation.
//!
//! Every objective is linear in the weights: `f_i(w) = Σ_j w_j · a_ij`, where
//! `a_ij` is attribute `i` of company `j`. Portfolio beta is the same kind of
//! weighted sum over company betas.

use nalgebra::DVector;

use super::{Objective, ObjectiveVector, OBJECTIVE_COUNT};
use crate::data::CompanyTable;
use crate::error::{PortfolioError, Result};

/// Objective values and beta of one weight vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub objectives: ObjectiveVector,
    pub beta: f64,
}

fn check_len(table: &CompanyTable, weights: &[f64]) -> Result<()> {
    if weights.len() != table.len() {
        return Err(PortfolioError::InvalidInput(format!(
            "weight vector has {} entries but the table has {} companies",
            weights.len(),
            table.len()
        )));
    }
    Ok(())
}

/// Evaluate all five objectives and the portfolio beta.
pub fn evaluate(table: &CompanyTable, weights: &[f64]) -> Result<Evaluation> {
    check_len(table, weights)?;
    let w = DVector::from_column_slice(weights);

    let values = table.attributes().tr_mul(&w);
    let mut objectives = [0.0; OBJECTIVE_COUNT];
    objectives.copy_from_slice(values.as_slice());

    Ok(Evaluation {
        objectives: ObjectiveVector(objectives),
        beta: table.betas().dot(&w),
    })
}

/// Weighted-average beta of the portfolio.
pub fn portfolio_beta(table: &CompanyTable, weights: &[f64]) -> Result<f64> {
    check_len(table, weights)?;
    Ok(table.betas().dot(&DVector::from_column_slice(weights)))
}

/// Linear coefficients of one objective, one per company.
///
/// These are the numbers [`evaluate`] sums, so programs built from them agree
/// with the evaluator.
pub fn objective_coefficients(table: &CompanyTable, objective: Objective) -> Vec<f64> {
    table.column(objective)
}
