//! The five portfolio objectives and their vectors.
//!
//! Four objectives are larger-is-better; the P/E ratio is smaller-is-better.
//! Which way each one is optimized and bounded is configured through
//! [`ObjectiveTable`].

pub mod evaluator;
pub mod table;

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub use crate::lp::Sense;
pub use evaluator::{evaluate, objective_coefficients, portfolio_beta, Evaluation};
pub use table::{BoundDirection, ObjectiveRule, ObjectiveTable};

/// Number of objectives.
pub const OBJECTIVE_COUNT: usize = 5;

/// One of the five portfolio objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    ExpectedReturn,
    Sustainability,
    DividendYield,
    CleanEnergy,
    PeRatio,
}

impl Objective {
    /// All objectives in vector order.
    pub const ALL: [Objective; OBJECTIVE_COUNT] = [
        Objective::ExpectedReturn,
        Objective::Sustainability,
        Objective::DividendYield,
        Objective::CleanEnergy,
        Objective::PeRatio,
    ];

    /// Position in an [`ObjectiveVector`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Objective at a zero-based position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Objective::ExpectedReturn => "Expected return",
            Objective::Sustainability => "Sustainability",
            Objective::DividendYield => "Dividend yield",
            Objective::CleanEnergy => "Clean energy use",
            Objective::PeRatio => "P/E ratio",
        }
    }

    /// Key used in serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Objective::ExpectedReturn => "expected_return",
            Objective::Sustainability => "sustainability",
            Objective::DividendYield => "dividend_yield",
            Objective::CleanEnergy => "clean_energy",
            Objective::PeRatio => "pe_ratio",
        }
    }

    /// Direction in which the objective improves.
    pub fn natural_sense(self) -> Sense {
        match self {
            Objective::PeRatio => Sense::Minimize,
            _ => Sense::Maximize,
        }
    }

    /// The other four objectives, in vector order.
    ///
    /// This is a view over [`Objective::ALL`]; nothing is removed from it.
    pub fn others(self) -> impl Iterator<Item = Objective> {
        Self::ALL.into_iter().filter(move |o| *o != self)
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value per objective: `[return, sustainability, dividend yield, clean energy, P/E]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ObjectiveVector(pub [f64; OBJECTIVE_COUNT]);

impl ObjectiveVector {
    pub fn new(values: [f64; OBJECTIVE_COUNT]) -> Self {
        Self(values)
    }

    /// Build from a slice of exactly five values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        <[f64; OBJECTIVE_COUNT]>::try_from(values).ok().map(Self)
    }

    /// Build by evaluating `f` on every objective.
    pub fn from_fn(mut f: impl FnMut(Objective) -> f64) -> Self {
        let mut values = [0.0; OBJECTIVE_COUNT];
        for o in Objective::ALL {
            values[o.index()] = f(o);
        }
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// (objective, value) pairs in vector order.
    pub fn iter(&self) -> impl Iterator<Item = (Objective, f64)> + '_ {
        Objective::ALL.into_iter().map(move |o| (o, self.0[o.index()]))
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    pub fn max_component(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Index<Objective> for ObjectiveVector {
    type Output = f64;

    fn index(&self, o: Objective) -> &f64 {
        &self.0[o.index()]
    }
}

impl IndexMut<Objective> for ObjectiveVector {
    fn index_mut(&mut self, o: Objective) -> &mut f64 {
        &mut self.0[o.index()]
    }
}

impl From<[f64; OBJECTIVE_COUNT]> for ObjectiveVector {
    fn from(values: [f64; OBJECTIVE_COUNT]) -> Self {
        Self(values)
    }
}

impl Serialize for ObjectiveVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(OBJECTIVE_COUNT))?;
        for (o, v) in self.iter() {
            map.serialize_entry(o.key(), &v)?;
        }
        map.end()
    }
}

impl fmt::Display for ObjectiveVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| format!("{:.6}", v)).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, o) in Objective::ALL.iter().enumerate() {
            assert_eq!(o.index(), i);
            assert_eq!(Objective::from_index(i), Some(*o));
        }
        assert_eq!(Objective::from_index(5), None);
    }

    #[test]
    fn test_others_excludes_selected_and_keeps_order() {
        let others: Vec<_> = Objective::DividendYield.others().collect();
        assert_eq!(
            others,
            vec![
                Objective::ExpectedReturn,
                Objective::Sustainability,
                Objective::CleanEnergy,
                Objective::PeRatio,
            ]
        );
        // ALL is untouched
        assert_eq!(Objective::ALL.len(), 5);
    }

    #[test]
    fn test_only_pe_is_minimized() {
        for o in Objective::ALL {
            let expected = if o == Objective::PeRatio {
                Sense::Minimize
            } else {
                Sense::Maximize
            };
            assert_eq!(o.natural_sense(), expected);
        }
    }

    #[test]
    fn test_vector_indexing() {
        let mut v = ObjectiveVector::new([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(v[Objective::PeRatio], 5.0);
        v[Objective::Sustainability] = 9.0;
        assert_eq!(v.0[1], 9.0);
        assert_eq!(v.max_component(), 9.0);
        assert!(ObjectiveVector::from_slice(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_vector_serializes_as_named_map() {
        let v = ObjectiveVector::new([0.1, 0.5, 3.0, 1.0, 15.0]);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json["pe_ratio"], 15.0);
        assert_eq!(json["clean_energy"], 1.0);
    }

    #[test]
    fn test_objective_deserializes_snake_case() {
        let o: Objective = serde_json::from_str("\"pe_ratio\"").unwrap();
        assert_eq!(o, Objective::PeRatio);
    }
}
