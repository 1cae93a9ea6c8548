use std::fmt;

use good_lp::{
    Expression, ResolutionError, Solution, SolverModel,
    solvers::{SolutionStatus, Solver},
};

use crate::{
    error::PartitionError,
    formulation::{ObjectiveSense, PartitionModel},
};

pub const EXPONENTIAL_CONE: &str = "exponential cone";

/// Optional constraint families a solver can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub exponential_cone: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationStatus {
    Optimal,
    TimeLimit,
    GapLimit,
    Infeasible,
    Unbounded,
    Other(String),
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => f.write_str("OPTIMAL"),
            Self::TimeLimit => f.write_str("TIME_LIMIT"),
            Self::GapLimit => f.write_str("GAP_LIMIT"),
            Self::Infeasible => f.write_str("INFEASIBLE"),
            Self::Unbounded => f.write_str("UNBOUNDED"),
            Self::Other(message) => write!(f, "OTHER({message})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimalStatus {
    Feasible,
    NoSolution,
}

impl fmt::Display for PrimalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feasible => f.write_str("FEASIBLE_POINT"),
            Self::NoSolution => f.write_str("NO_SOLUTION"),
        }
    }
}

/// Raw outcome of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub termination: TerminationStatus,
    pub primal: PrimalStatus,
    /// Assignment indicator values, one row per item and one column per group.
    pub assignment_values: Option<Vec<Vec<f64>>>,
}

impl SolveReport {
    pub fn without_solution(termination: TerminationStatus) -> Self {
        Self {
            termination,
            primal: PrimalStatus::NoSolution,
            assignment_values: None,
        }
    }

    pub fn is_proven_optimal(&self) -> bool {
        self.termination == TerminationStatus::Optimal && self.primal == PrimalStatus::Feasible
    }
}

/// External MIP solver. One call to `solve` per model, blocking until the
/// solver returns.
pub trait SolverBackend {
    fn capabilities(&self) -> Capabilities;

    fn solve(&mut self, model: PartitionModel) -> Result<SolveReport, PartitionError>;
}

impl From<ResolutionError> for TerminationStatus {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => Self::Infeasible,
            ResolutionError::Unbounded => Self::Unbounded,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<SolutionStatus> for TerminationStatus {
    fn from(status: SolutionStatus) -> Self {
        match status {
            SolutionStatus::Optimal => Self::Optimal,
            SolutionStatus::TimeLimit => Self::TimeLimit,
            SolutionStatus::GapLimit => Self::GapLimit,
            #[allow(unreachable_patterns)]
            other => Self::Other(format!("{other:?}")),
        }
    }
}

/// Solves through any `good_lp` solver. `good_lp` has no conic constraints,
/// so label balancing with a non-zero weight is unavailable here.
pub struct GoodLpBackend<S> {
    solver: S,
}

impl<S> GoodLpBackend<S> {
    pub fn new(solver: S) -> Self {
        Self { solver }
    }
}

/// Backend over the solver `good_lp` picks from the enabled features.
pub fn default_backend() -> GoodLpBackend<impl Solver<Model: SolverModel<Error = ResolutionError>>>
{
    GoodLpBackend::new(good_lp::default_solver)
}

impl<S> SolverBackend for GoodLpBackend<S>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
{
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn solve(&mut self, model: PartitionModel) -> Result<SolveReport, PartitionError> {
        let parts = model.into_parts();
        if !parts.cones.is_empty() {
            return Err(PartitionError::UnsupportedCapability {
                capability: EXPONENTIAL_CONE,
            });
        }

        let unsolved = match parts.objective {
            Some(objective) => match objective.sense {
                ObjectiveSense::Minimise => parts.variables.minimise(objective.expression),
                ObjectiveSense::Maximise => parts.variables.maximise(objective.expression),
            },
            None => parts.variables.minimise(Expression::default()),
        };

        let mut problem = self.solver.create_model(unsolved);
        for constraint in parts.constraints {
            problem.add_constraint(constraint);
        }

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(err) => {
                tracing::debug!("Solver returned without a solution: {err}");
                return Ok(SolveReport::without_solution(err.into()));
            }
        };

        let values = parts
            .assignment
            .iter()
            .map(|row| row.iter().map(|&var| solution.value(var)).collect())
            .collect();

        Ok(SolveReport {
            termination: solution.status().into(),
            primal: PrimalStatus::Feasible,
            assignment_values: Some(values),
        })
    }
}

#[cfg(feature = "highs")]
pub use self::highs::{HighsSolveOptions, highs_backend};

#[cfg(feature = "highs")]
mod highs {
    use good_lp::{
        solvers::{Solver, WithTimeLimit, highs::HighsProblem},
        variable::UnsolvedProblem,
    };

    use super::GoodLpBackend;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct HighsSolveOptions {
        /// Hitting the limit is reported as `TerminationStatus::TimeLimit`.
        pub time_limit_seconds: Option<f64>,
    }

    pub fn highs_backend(
        options: HighsSolveOptions,
    ) -> GoodLpBackend<impl Solver<Model = HighsProblem>> {
        GoodLpBackend::new(move |problem: UnsolvedProblem| {
            let model = good_lp::highs(problem);
            match options.time_limit_seconds {
                Some(seconds) => model.with_time_limit(seconds),
                None => model,
            }
        })
    }
}
