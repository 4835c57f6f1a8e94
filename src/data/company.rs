//! Company records and the read-only company table.

use std::collections::HashSet;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, Result};
use crate::objective::{Objective, OBJECTIVE_COUNT};

/// One candidate company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub beta: f64,
    pub expected_return: f64,
    pub sustainability: f64,
    pub dividend_yield: f64,
    /// Sum of the Clean200 and Science Based Targets flags, so 0, 1 or 2.
    pub clean_energy: f64,
    pub pe_ratio: f64,
}

impl Company {
    /// Combine the two clean-energy source flags.
    ///
    /// The flags are added, not OR'd: a company on both lists scores 2.
    pub fn clean_energy_score(clean200: bool, science_based_targets: bool) -> f64 {
        f64::from(u8::from(clean200) + u8::from(science_based_targets))
    }

    /// Attribute summed by `objective`.
    pub fn attribute(&self, objective: Objective) -> f64 {
        match objective {
            Objective::ExpectedReturn => self.expected_return,
            Objective::Sustainability => self.sustainability,
            Objective::DividendYield => self.dividend_yield,
            Objective::CleanEnergy => self.clean_energy,
            Objective::PeRatio => self.pe_ratio,
        }
    }

    /// First problem with this record, if any.
    pub(crate) fn defect(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("empty company name".into());
        }
        if !self.beta.is_finite() {
            return Some(format!("{}: beta is not finite", self.name));
        }
        for o in Objective::ALL {
            if !self.attribute(o).is_finite() {
                return Some(format!("{}: {} is not finite", self.name, o));
            }
        }
        if self.pe_ratio < 0.0 {
            return Some(format!(
                "{}: negative P/E ratio {} (filter loss-making companies before optimizing)",
                self.name, self.pe_ratio
            ));
        }
        None
    }

    /// Whether the record can enter a table.
    pub fn is_usable(&self) -> bool {
        self.defect().is_none()
    }
}

/// Immutable table of companies in weight-vector order.
#[derive(Debug, Clone)]
pub struct CompanyTable {
    companies: Vec<Company>,
    /// n x 5 matrix, one column per objective.
    attributes: DMatrix<f64>,
    betas: DVector<f64>,
}

impl CompanyTable {
    /// Validate and index the companies.
    pub fn new(companies: Vec<Company>) -> Result<Self> {
        if companies.is_empty() {
            return Err(PortfolioError::InvalidInput(
                "company table is empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for (row, c) in companies.iter().enumerate() {
            if let Some(defect) = c.defect() {
                return Err(PortfolioError::InvalidInput(format!("row {}: {}", row, defect)));
            }
            if !seen.insert(c.name.as_str()) {
                return Err(PortfolioError::InvalidInput(format!(
                    "row {}: duplicate company '{}'",
                    row, c.name
                )));
            }
        }

        let n = companies.len();
        let attributes = DMatrix::from_fn(n, OBJECTIVE_COUNT, |j, i| {
            companies[j].attribute(Objective::ALL[i])
        });
        let betas = DVector::from_iterator(n, companies.iter().map(|c| c.beta));

        Ok(Self {
            companies,
            attributes,
            betas,
        })
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.companies.iter().map(|c| c.name.as_str())
    }

    /// The `n x 5` attribute matrix.
    pub fn attributes(&self) -> &DMatrix<f64> {
        &self.attributes
    }

    /// Per-company attribute column for one objective.
    pub fn column(&self, objective: Objective) -> Vec<f64> {
        self.attributes.column(objective.index()).iter().copied().collect()
    }

    pub fn betas(&self) -> &DVector<f64> {
        &self.betas
    }

    /// Equal weights `1/n`.
    pub fn uniform_weights(&self) -> Vec<f64> {
        vec![1.0 / self.len() as f64; self.len()]
    }
}
