//! Ideal/nadir normalization.
//!
//! `ẑ_i = (z_i - ideal_i) / (nadir_i - ideal_i)`, so the ideal maps to 0 and
//! the nadir to 1 for every objective. For P/E the ideal is the smaller value,
//! so the denominator is positive there too.

use serde::Serialize;

use crate::data::CompanyTable;
use crate::error::{PortfolioError, Result};
use crate::objective::{objective_coefficients, Objective, ObjectiveVector};

/// Relative tolerance under which `nadir_i == ideal_i`.
const DEGENERATE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normalizer {
    ideal: ObjectiveVector,
    nadir: ObjectiveVector,
}

impl Normalizer {
    pub fn new(ideal: ObjectiveVector, nadir: ObjectiveVector) -> Result<Self> {
        for o in Objective::ALL {
            let (z, n) = (ideal[o], nadir[o]);
            if !(z.is_finite() && n.is_finite()) {
                return Err(PortfolioError::InvalidInput(format!(
                    "{}: ideal {} and nadir {} must be finite",
                    o, z, n
                )));
            }
            let scale = z.abs().max(n.abs()).max(1.0);
            if (n - z).abs() <= DEGENERATE_TOLERANCE * scale {
                return Err(PortfolioError::DegenerateRange {
                    objective: o,
                    value: z,
                });
            }
        }
        Ok(Self { ideal, nadir })
    }

    pub fn ideal(&self) -> &ObjectiveVector {
        &self.ideal
    }

    pub fn nadir(&self) -> &ObjectiveVector {
        &self.nadir
    }

    /// `nadir_i - ideal_i`; negative for maximized objectives.
    pub fn range(&self, objective: Objective) -> f64 {
        self.nadir[objective] - self.ideal[objective]
    }

    pub fn normalize(&self, z: &ObjectiveVector) -> ObjectiveVector {
        ObjectiveVector::from_fn(|o| (z[o] - self.ideal[o]) / self.range(o))
    }

    pub fn denormalize(&self, z: &ObjectiveVector) -> ObjectiveVector {
        ObjectiveVector::from_fn(|o| self.ideal[o] + z[o] * self.range(o))
    }

    /// The normalized objective as `coeffs · w + offset`.
    pub fn affine_row(&self, table: &CompanyTable, objective: Objective) -> (Vec<f64>, f64) {
        let range = self.range(objective);
        let coeffs = objective_coefficients(table, objective)
            .into_iter()
            .map(|c| c / range)
            .collect();
        (coeffs, -self.ideal[objective] / range)
    }
}
