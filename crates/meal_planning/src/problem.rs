//! Backend-independent mixed-integer linear program description.
//!
//! The plan builder produces a [`ProblemSpec`] as a pure value; a
//! [`MilpSolver`] maps it onto an actual backend. Keeping the two apart
//! makes the model inspectable in tests without ever running a solve.

use std::time::Duration;

/// Handle to a decision variable within one [`ProblemSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    Binary,
    Continuous { lower: f64, upper: f64 },
}

#[derive(Debug, Clone)]
pub struct VarSpec {
    pub kind: VarKind,
    /// Minimization-objective coefficient.
    pub objective: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// A minimization MILP: variables with objective coefficients plus linear
/// constraints.
#[derive(Debug, Clone, Default)]
pub struct ProblemSpec {
    vars: Vec<VarSpec>,
    constraints: Vec<LinearConstraint>,
}

impl ProblemSpec {
    pub fn new() -> Self {
        ProblemSpec::default()
    }

    pub fn add_binary(&mut self, objective: f64) -> VarId {
        self.vars.push(VarSpec {
            kind: VarKind::Binary,
            objective,
        });
        VarId(self.vars.len() - 1)
    }

    pub fn add_continuous(&mut self, lower: f64, upper: f64, objective: f64) -> VarId {
        self.vars.push(VarSpec {
            kind: VarKind::Continuous { lower, upper },
            objective,
        });
        VarId(self.vars.len() - 1)
    }

    pub fn constrain(&mut self, terms: Vec<(VarId, f64)>, sense: Sense, rhs: f64) {
        self.constraints.push(LinearConstraint { terms, sense, rhs });
    }

    pub fn vars(&self) -> &[VarSpec] {
        &self.vars
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

/// Outcome of one backend solve.
#[derive(Debug, Clone)]
pub enum SolveStatus {
    /// Values indexed by [`VarId::index`].
    Optimal(Vec<f64>),
    Infeasible,
}

/// Backend contract. The driver treats anything other than `Optimal` as
/// infeasibility and falls through its tiers.
pub trait MilpSolver {
    fn solve(&self, spec: &ProblemSpec, time_limit: Duration) -> SolveStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_ids_index_in_creation_order() {
        let mut spec = ProblemSpec::new();
        let a = spec.add_binary(1.0);
        let b = spec.add_continuous(0.0, f64::INFINITY, 2.0);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(spec.var_count(), 2);
        assert!(matches!(spec.vars()[0].kind, VarKind::Binary));
    }

    #[test]
    fn constraints_are_recorded_verbatim() {
        let mut spec = ProblemSpec::new();
        let a = spec.add_binary(0.0);
        spec.constrain(vec![(a, 2.0)], Sense::Le, 5.0);
        assert_eq!(spec.constraint_count(), 1);
        let c = &spec.constraints()[0];
        assert_eq!(c.sense, Sense::Le);
        assert_eq!(c.rhs, 5.0);
        assert_eq!(c.terms, vec![(a, 2.0)]);
    }
}
