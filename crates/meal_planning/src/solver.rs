use std::time::{Duration, Instant};

use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};

use crate::problem::{MilpSolver, ProblemSpec, Sense, SolveStatus, VarKind};

/// MILP backend over the pure-Rust microlp solver.
///
/// A single stateless value; the underlying solver carries no state between
/// calls, so one instance serves the whole process. microlp cannot be
/// interrupted mid-solve, so the time limit is enforced best-effort: the
/// elapsed time is measured and an overrun is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpSolver;

impl MilpSolver for MicrolpSolver {
    fn solve(&self, spec: &ProblemSpec, time_limit: Duration) -> SolveStatus {
        let started = Instant::now();

        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let vars: Vec<Variable> = spec
            .vars()
            .iter()
            .map(|v| match v.kind {
                VarKind::Binary => problem.add_integer_var(v.objective, (0, 1)),
                VarKind::Continuous { lower, upper } => problem.add_var(v.objective, (lower, upper)),
            })
            .collect();

        for constraint in spec.constraints() {
            let terms: Vec<(Variable, f64)> = constraint
                .terms
                .iter()
                .map(|(id, coef)| (vars[id.index()], *coef))
                .collect();
            let op = match constraint.sense {
                Sense::Le => ComparisonOp::Le,
                Sense::Ge => ComparisonOp::Ge,
                Sense::Eq => ComparisonOp::Eq,
            };
            problem.add_constraint(&terms, op, constraint.rhs);
        }

        let status = match problem.solve() {
            Ok(solution) => {
                SolveStatus::Optimal(vars.iter().map(|v| *solution.var_value(*v)).collect())
            }
            Err(microlp::Error::Infeasible) => SolveStatus::Infeasible,
            Err(err) => {
                tracing::warn!(error = ?err, "solver backend failed, treating as infeasible");
                SolveStatus::Infeasible
            }
        };

        let elapsed = started.elapsed();
        if elapsed > time_limit {
            tracing::warn!(?elapsed, ?time_limit, "solve exceeded its time budget");
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ProblemSpec;

    fn solve(spec: &ProblemSpec) -> SolveStatus {
        MicrolpSolver.solve(spec, Duration::from_secs(10))
    }

    #[test]
    fn picks_the_cheaper_binary() {
        // min x + 3y subject to x + y = 1
        let mut spec = ProblemSpec::new();
        let x = spec.add_binary(1.0);
        let y = spec.add_binary(3.0);
        spec.constrain(vec![(x, 1.0), (y, 1.0)], Sense::Eq, 1.0);

        match solve(&spec) {
            SolveStatus::Optimal(values) => {
                assert!(values[x.index()] > 0.5);
                assert!(values[y.index()] < 0.5);
            }
            SolveStatus::Infeasible => panic!("model is feasible"),
        }
    }

    #[test]
    fn reports_infeasibility() {
        // x <= 0 and x >= 1 cannot both hold
        let mut spec = ProblemSpec::new();
        let x = spec.add_binary(0.0);
        spec.constrain(vec![(x, 1.0)], Sense::Le, 0.0);
        spec.constrain(vec![(x, 1.0)], Sense::Ge, 1.0);

        assert!(matches!(solve(&spec), SolveStatus::Infeasible));
    }

    #[test]
    fn continuous_slack_absorbs_violation() {
        // min s subject to x + s >= 10 with binary x: s lands at 9 or 10
        let mut spec = ProblemSpec::new();
        let x = spec.add_binary(0.0);
        let s = spec.add_continuous(0.0, f64::INFINITY, 1.0);
        spec.constrain(vec![(x, 1.0), (s, 1.0)], Sense::Ge, 10.0);

        match solve(&spec) {
            SolveStatus::Optimal(values) => {
                let slack = values[s.index()];
                assert!((9.0..=10.0).contains(&slack), "slack was {slack}");
            }
            SolveStatus::Infeasible => panic!("model is feasible"),
        }
    }
}
