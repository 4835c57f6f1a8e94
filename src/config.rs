//! Run configuration.
//!
//! A [`SolveConfig`] is everything a solve needs besides the company table.
//! It can be built in code or read from JSON:
//!
//! ```json
//! {
//!   "method": { "kind": "reference_point", "reference": [0.1, 0.5, 3, 1, 15] },
//!   "region": { "weight_cap": 0.05, "beta_tolerance": 0.1 },
//!   "parallel": true
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constraints::FeasibleRegion;
use crate::error::{PortfolioError, Result};
use crate::lp::Settings;
use crate::method::asf::DEFAULT_RHO;
use crate::objective::{Objective, ObjectiveTable, ObjectiveVector};

/// Holdings below this weight are left out of reports.
pub const DEFAULT_HOLDING_THRESHOLD: f64 = 1e-6;

/// Which multiobjective method to run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Method {
    /// Optimize one objective with bounds on the other four, ordered as
    /// [`Objective::others`].
    EpsilonConstraint {
        objective: Objective,
        bounds: Vec<f64>,
    },
    /// Minimize the achievement function for a reference point.
    ReferencePoint {
        reference: ObjectiveVector,
        /// Weights evaluated for the report; uniform when absent.
        #[serde(default)]
        start: Option<Vec<f64>>,
    },
}

impl Method {
    pub fn kind(&self) -> &'static str {
        match self {
            Method::EpsilonConstraint { .. } => "epsilon_constraint",
            Method::ReferencePoint { .. } => "reference_point",
        }
    }
}

fn default_rho() -> f64 {
    DEFAULT_RHO
}

fn default_holding_threshold() -> f64 {
    DEFAULT_HOLDING_THRESHOLD
}

/// Complete configuration of one solve.
#[derive(Debug, Clone, Deserialize)]
pub struct SolveConfig {
    pub method: Method,
    #[serde(default)]
    pub region: FeasibleRegion,
    #[serde(default)]
    pub objectives: ObjectiveTable,
    /// Augmentation coefficient of the achievement function.
    #[serde(default = "default_rho")]
    pub rho: f64,
    #[serde(default = "default_holding_threshold")]
    pub holding_threshold: f64,
    /// Solve the payoff table rows on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub settings: Settings,
}

impl SolveConfig {
    /// Defaults for everything but the method.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            region: FeasibleRegion::default(),
            objectives: ObjectiveTable::default(),
            rho: DEFAULT_RHO,
            holding_threshold: DEFAULT_HOLDING_THRESHOLD,
            parallel: false,
            settings: Settings::default(),
        }
    }

    pub fn epsilon(objective: Objective, bounds: Vec<f64>) -> Self {
        Self::new(Method::EpsilonConstraint { objective, bounds })
    }

    pub fn reference(reference: ObjectiveVector) -> Self {
        Self::new(Method::ReferencePoint {
            reference,
            start: None,
        })
    }

    pub fn with_region(mut self, region: FeasibleRegion) -> Self {
        self.region = region;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PortfolioError::InvalidInput(format!("configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;
        if !(self.rho.is_finite() && self.rho >= 0.0) {
            return Err(PortfolioError::InvalidInput(format!(
                "rho must be non-negative, got {}",
                self.rho
            )));
        }
        if !(self.holding_threshold.is_finite() && self.holding_threshold >= 0.0) {
            return Err(PortfolioError::InvalidInput(format!(
                "holding threshold must be non-negative, got {}",
                self.holding_threshold
            )));
        }
        if self.settings.max_iter == 0 {
            return Err(PortfolioError::InvalidInput(
                "max_iter must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_config_from_json() {
        let config = SolveConfig::from_json(
            r#"{
                "method": { "kind": "reference_point", "reference": [0.1, 0.5, 3, 1, 15] },
                "region": { "beta_tolerance": 0.2 },
                "parallel": true
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.method,
            Method::ReferencePoint {
                reference: ObjectiveVector::new([0.1, 0.5, 3.0, 1.0, 15.0]),
                start: None,
            }
        );
        assert_eq!(config.region.weight_cap, 0.05);
        assert_eq!(config.region.beta_tolerance, 0.2);
        assert!(config.parallel);
        assert_eq!(config.rho, DEFAULT_RHO);
        assert_eq!(config.settings.max_iter, 1000);
    }

    #[test]
    fn test_epsilon_config_from_json() {
        let config = SolveConfig::from_json(
            r#"{
                "method": {
                    "kind": "epsilon_constraint",
                    "objective": "pe_ratio",
                    "bounds": [0.09, 0.6, 2, 1]
                },
                "settings": { "max_iter": 200 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.method.kind(), "epsilon_constraint");
        assert_eq!(config.settings.max_iter, 200);
        assert_eq!(config.objectives, ObjectiveTable::default());
    }

    #[test]
    fn test_bad_config_rejected() {
        assert!(SolveConfig::from_json(r#"{ "method": { "kind": "simplex" } }"#).is_err());
        let err = SolveConfig::from_json(
            r#"{
                "method": { "kind": "reference_point", "reference": [0, 0, 0, 0, 0] },
                "rho": -1
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("rho"));
    }
}
