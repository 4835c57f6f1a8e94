//! Declarative optimization senses and epsilon-constraint bound directions.

use serde::{Deserialize, Serialize};

use self::BoundDirection::{AtLeast, AtMost};
use super::{Objective, OBJECTIVE_COUNT};
use crate::lp::{Relation, Sense};

/// Direction of a bound placed on a non-optimized objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundDirection {
    /// objective >= bound
    AtLeast,
    /// objective <= bound
    AtMost,
}

impl BoundDirection {
    pub fn relation(self) -> Relation {
        match self {
            BoundDirection::AtLeast => Relation::Geq,
            BoundDirection::AtMost => Relation::Leq,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BoundDirection::AtLeast => ">=",
            BoundDirection::AtMost => "<=",
        }
    }
}

/// How one objective is optimized, and how the other four are bounded
/// while it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveRule {
    pub sense: Sense,
    /// One direction per remaining objective, in [`Objective::others`] order.
    pub bound_directions: [BoundDirection; OBJECTIVE_COUNT - 1],
}

/// Per-objective rules, consulted by both solve paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveTable {
    rules: [ObjectiveRule; OBJECTIVE_COUNT],
}

impl Default for ObjectiveTable {
    /// Larger-is-better objectives are maximized and bounded from below; P/E
    /// is minimized and bounded from above. With P/E optimized, all four
    /// remaining bounds are lower bounds.
    fn default() -> Self {
        let max = |bound_directions| ObjectiveRule {
            sense: Sense::Maximize,
            bound_directions,
        };
        Self {
            rules: [
                // others: sustainability, dividend yield, clean energy, P/E
                max([AtLeast, AtLeast, AtLeast, AtMost]),
                // others: return, dividend yield, clean energy, P/E
                max([AtLeast, AtLeast, AtLeast, AtMost]),
                // others: return, sustainability, clean energy, P/E
                max([AtLeast, AtLeast, AtLeast, AtMost]),
                // others: return, sustainability, dividend yield, P/E
                max([AtLeast, AtLeast, AtLeast, AtMost]),
                // others: return, sustainability, dividend yield, clean energy
                ObjectiveRule {
                    sense: Sense::Minimize,
                    bound_directions: [AtLeast, AtLeast, AtLeast, AtLeast],
                },
            ],
        }
    }
}

impl ObjectiveTable {
    pub fn new(rules: [ObjectiveRule; OBJECTIVE_COUNT]) -> Self {
        Self { rules }
    }

    pub fn rule(&self, objective: Objective) -> &ObjectiveRule {
        &self.rules[objective.index()]
    }

    pub fn sense(&self, objective: Objective) -> Sense {
        self.rule(objective).sense
    }

    /// The remaining objectives and their bound directions while `objective`
    /// is optimized.
    pub fn bounded(
        &self,
        objective: Objective,
    ) -> impl Iterator<Item = (Objective, BoundDirection)> + '_ {
        objective
            .others()
            .zip(self.rule(objective).bound_directions)
    }
}
