//! Linear programming backend.
//!
//! This module provides:
//! - A small labelled LP representation
//! - Matrix stuffing into Clarabel's conic form
//! - Clarabel solver integration

pub mod clarabel;
pub mod program;
pub mod stuffing;

pub use self::clarabel::{solve, Settings, Solution, SolveStatus};
pub use program::{LinearConstraint, LinearProgram, Relation, Sense};
pub use stuffing::{stuff_program, ConeDims, StuffedProblem};
