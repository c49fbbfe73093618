use super::{LayerProblem, LayerSolver};
use crate::error::{Error, Result};
use good_lp::{
    Expression, IntoAffineExpression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable, variable,
};
use std::sync::mpsc;
use std::time::Duration;

/// Minimum total arc span layering, solved as an integer program with `microlp`.
///
/// The solve runs on a dedicated thread. When `timeout` elapses first the run fails with
/// [`Error::SolverTimeout`]. The worker is abandoned, not cancelled: `microlp` has no interrupt
/// hook, so the thread keeps its CPU until the solve finishes and its answer is then dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct IlpSolver {
    pub timeout: Option<Duration>,
}

impl IlpSolver {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn error(&self, err: ResolutionError) -> Error {
        let solver = self.name().to_string();
        match err {
            ResolutionError::Infeasible => Error::SolverInfeasible {
                solver,
                message: "the integer program has no feasible solution".to_string(),
            },
            ResolutionError::Unbounded => Error::SolverInfeasible {
                solver,
                message: "the integer program is unbounded".to_string(),
            },
            other => Error::SolverUnavailable {
                solver,
                message: other.to_string(),
            },
        }
    }

    fn worker_lost(&self) -> Error {
        Error::SolverUnavailable {
            solver: self.name().to_string(),
            message: "the solver thread terminated without an answer".to_string(),
        }
    }
}

impl LayerSolver for IlpSolver {
    fn name(&self) -> &'static str {
        "ilp"
    }

    fn solve(&self, problem: &LayerProblem) -> Result<Vec<usize>> {
        if problem.node_count == 0 {
            return Ok(Vec::new());
        }
        if let Some(&(upper, lower)) = problem
            .arcs
            .iter()
            .find(|&&(u, l)| u >= problem.node_count || l >= problem.node_count)
        {
            return Err(Error::SolverInfeasible {
                solver: self.name().to_string(),
                message: format!("arc {upper} -> {lower} is out of range"),
            });
        }

        let (tx, rx) = mpsc::channel();
        let owned = problem.clone();
        std::thread::Builder::new()
            .name("ocpn-layout-ilp".to_string())
            .spawn(move || {
                // The receiver is gone once the caller timed out.
                let _ = tx.send(solve_integer_program(&owned));
            })
            .map_err(|err| Error::SolverUnavailable {
                solver: self.name().to_string(),
                message: format!("failed to start the solver thread: {err}"),
            })?;

        let received = match self.timeout {
            Some(timeout) => rx.recv_timeout(timeout).map_err(|err| match err {
                mpsc::RecvTimeoutError::Timeout => Error::SolverTimeout {
                    solver: self.name().to_string(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                },
                mpsc::RecvTimeoutError::Disconnected => self.worker_lost(),
            })?,
            None => rx.recv().map_err(|_| self.worker_lost())?,
        };

        let values = received.map_err(|err| self.error(err))?;
        values
            .into_iter()
            .enumerate()
            .map(|(v, value)| {
                let rounded = value.round();
                if !rounded.is_finite() || rounded < 0.0 {
                    return Err(Error::SolverInfeasible {
                        solver: self.name().to_string(),
                        message: format!("node {v} received layer {value}"),
                    });
                }
                Ok(rounded as usize)
            })
            .collect()
    }
}

fn solve_integer_program(
    problem: &LayerProblem,
) -> std::result::Result<Vec<f64>, ResolutionError> {
    let mut vars = ProblemVariables::new();
    let layers: Vec<Variable> = (0..problem.node_count)
        .map(|_| vars.add(variable().integer().min(0)))
        .collect();

    let mut objective: Expression = 0.into();
    for &(upper, lower) in &problem.arcs {
        objective += layers[lower].into_expression() - layers[upper];
    }

    let mut model = vars
        .minimise(objective)
        .using(good_lp::solvers::microlp::microlp);
    for &(upper, lower) in &problem.arcs {
        model.add_constraint((layers[lower].into_expression() - layers[upper]).geq(1));
    }

    let solution = model.solve()?;
    Ok(layers.iter().map(|&v| solution.value(v)).collect())
}
