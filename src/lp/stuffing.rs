//! Matrix stuffing: converts a linear program to solver format.
//!
//! Clarabel solves `min (1/2) x'Px + q'x  s.t.  Ax + s = b, s ∈ K`. For an LP
//! `P` is empty, equalities go to the zero cone and inequalities to the
//! nonnegative cone.

use nalgebra_sparse::CscMatrix;

use super::program::{LinearConstraint, LinearProgram, Relation, Sense};
use crate::sparse::TripletBuilder;

/// Cone dimensions for Clarabel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConeDims {
    /// Number of zero cone (equality) rows.
    pub zero: usize,
    /// Number of nonnegative cone rows.
    pub nonneg: usize,
}

impl ConeDims {
    /// Total number of constraint rows.
    pub fn total(&self) -> usize {
        self.zero + self.nonneg
    }
}

/// Stuffed problem ready for Clarabel.
#[derive(Debug)]
pub struct StuffedProblem {
    /// Quadratic cost matrix P, always empty here.
    pub p: CscMatrix<f64>,
    /// Linear cost vector q, negated for maximization.
    pub q: Vec<f64>,
    /// Constraint matrix A (m x n).
    pub a: CscMatrix<f64>,
    /// Constraint vector b (m).
    pub b: Vec<f64>,
    pub cone_dims: ConeDims,
}

/// Build the stuffed problem from a linear program.
pub fn stuff_program(program: &LinearProgram) -> StuffedProblem {
    let n = program.num_vars();

    let q = match program.sense {
        Sense::Minimize => program.cost.clone(),
        Sense::Maximize => program.cost.iter().map(|c| -c).collect(),
    };

    // Zero cone rows must come first.
    let (zeros, nonnegs): (Vec<&LinearConstraint>, Vec<&LinearConstraint>) = program
        .constraints
        .iter()
        .partition(|c| c.relation == Relation::Eq);

    let cone_dims = ConeDims {
        zero: zeros.len(),
        nonneg: nonnegs.len(),
    };

    let mut a = TripletBuilder::new(cone_dims.total(), n);
    let mut b = Vec::with_capacity(cone_dims.total());

    for (row, c) in zeros.iter().chain(nonnegs.iter()).enumerate() {
        b.push(stuff_row(c, row, &mut a));
    }

    StuffedProblem {
        p: CscMatrix::zeros(n, n),
        q,
        a: a.build(),
        b,
        cone_dims,
    }
}

/// Stuff one row into A and return its entry of b.
///
/// - Eq:  `a·x = rhs`          gives A = a,  b = rhs
/// - Leq: `a·x + s = rhs`      gives A = a,  b = rhs
/// - Geq: `-a·x + s = -rhs`    gives A = -a, b = -rhs
fn stuff_row(c: &LinearConstraint, row: usize, a: &mut TripletBuilder) -> f64 {
    let sign = match c.relation {
        Relation::Eq | Relation::Leq => 1.0,
        Relation::Geq => -1.0,
    };
    for (col, val) in &c.terms {
        a.push(row, *col, sign * val);
    }
    sign * c.rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::csc_to_dense;

    #[test]
    fn test_cone_dims() {
        let dims = ConeDims { zero: 2, nonneg: 3 };
        assert_eq!(dims.total(), 5);
    }

    #[test]
    fn test_equalities_are_stuffed_first() {
        let lp = LinearProgram::maximize(vec![1.0, 2.0]).subject_to([
            LinearConstraint::single("x0 >= 0", 0, Relation::Geq, 0.0),
            LinearConstraint::dense("sum", &[1.0, 1.0], Relation::Eq, 1.0),
            LinearConstraint::single("x1 <= 0.7", 1, Relation::Leq, 0.7),
        ]);
        let stuffed = stuff_program(&lp);

        assert_eq!(stuffed.cone_dims, ConeDims { zero: 1, nonneg: 2 });
        assert_eq!(stuffed.q, vec![-1.0, -2.0]);
        assert_eq!(stuffed.b, vec![1.0, -0.0, 0.7]);

        let a = csc_to_dense(&stuffed.a);
        assert_eq!(a[(0, 0)], 1.0);
        assert_eq!(a[(0, 1)], 1.0);
        assert_eq!(a[(1, 0)], -1.0);
        assert_eq!(a[(2, 1)], 1.0);
        assert_eq!(stuffed.p.nnz(), 0);
    }
}
