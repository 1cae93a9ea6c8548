#![warn(clippy::uninlined_format_args)]

mod decode;
mod error;
mod formulation;
mod model;
mod objective;
mod solver;

pub use decode::{ACTIVE_THRESHOLD, decode_assignment};
pub use error::{DecodingError, ModelConstructionError, PartitionError};
pub use formulation::{ExponentialCone, ModelParts, Objective, ObjectiveSense, PartitionModel};
pub use model::{Assignment, LabelMatrix};
pub use objective::{ObjectiveStrategy, UnknownObjective};
#[cfg(feature = "highs")]
pub use solver::{HighsSolveOptions, highs_backend};
pub use solver::{
    Capabilities, EXPONENTIAL_CONE, GoodLpBackend, PrimalStatus, SolveReport, SolverBackend,
    TerminationStatus, default_backend,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionOptions {
    /// Fail unless the solver proves optimality.
    pub strict: bool,
    /// Weight `α` of the label entropy term.
    pub balance_weight: f64,
    pub labels: Option<LabelMatrix>,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            strict: true,
            balance_weight: 0.0,
            labels: None,
        }
    }
}

impl PartitionOptions {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_balance_weight(mut self, balance_weight: f64) -> Self {
        self.balance_weight = balance_weight;
        self
    }

    pub fn with_labels(mut self, labels: LabelMatrix) -> Self {
        self.labels = Some(labels);
        self
    }
}

/// Splits `sizes` into `k` groups with sums as close as possible (smallest
/// range between the largest and smallest group).
pub fn partition<B: SolverBackend + ?Sized>(
    sizes: &[f64],
    k: usize,
    backend: &mut B,
    strict: bool,
) -> Result<Assignment, PartitionError> {
    partition_with(
        ObjectiveStrategy::MinRange,
        sizes,
        k,
        backend,
        &PartitionOptions::default().with_strict(strict),
    )
}

/// Builds the model, applies `strategy`, solves once and decodes.
///
/// With `strict == false` a non-optimal status only emits a warning and the
/// returned point is decoded as is. That point may be far from optimal; a
/// solver that returned no point at all yields [`PartitionError::NoSolution`].
pub fn partition_with<B: SolverBackend + ?Sized>(
    strategy: ObjectiveStrategy,
    sizes: &[f64],
    k: usize,
    backend: &mut B,
    options: &PartitionOptions,
) -> Result<Assignment, PartitionError> {
    let mut model =
        PartitionModel::build(sizes, k, options.labels.as_ref(), backend.capabilities())?;
    strategy.apply(&mut model, options.balance_weight)?;

    tracing::debug!(
        "Solving {strategy} partition of {} items into {k} groups",
        sizes.len()
    );
    let report = backend.solve(model)?;

    if !report.is_proven_optimal() {
        if options.strict {
            return Err(PartitionError::Optimization {
                termination: report.termination,
                primal: report.primal,
            });
        }
        tracing::warn!(
            "Solver did not prove optimality (termination={}, primal={}); decoding the returned point",
            report.termination,
            report.primal
        );
    }

    let Some(values) = report.assignment_values else {
        return Err(PartitionError::NoSolution {
            termination: report.termination,
            primal: report.primal,
        });
    };

    Ok(decode_assignment(&values, sizes.len(), k)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Returns a fixed report and records the shape of the model it was given.
    struct ScriptedBackend {
        capabilities: Capabilities,
        report: SolveReport,
        calls: usize,
        seen_cones: usize,
        seen_entropy_weight: Option<f64>,
    }

    impl ScriptedBackend {
        fn new(report: SolveReport) -> Self {
            Self {
                capabilities: Capabilities::default(),
                report,
                calls: 0,
                seen_cones: 0,
                seen_entropy_weight: None,
            }
        }

        fn conic(mut self) -> Self {
            self.capabilities.exponential_cone = true;
            self
        }
    }

    impl SolverBackend for ScriptedBackend {
        fn capabilities(&self) -> Capabilities {
            self.capabilities
        }

        fn solve(&mut self, model: PartitionModel) -> Result<SolveReport, PartitionError> {
            self.calls += 1;
            self.seen_cones = model.exponential_cones().len();
            self.seen_entropy_weight = model.objective().map(|objective| objective.entropy_weight);
            Ok(self.report.clone())
        }
    }

    fn report(
        termination: TerminationStatus,
        primal: PrimalStatus,
        values: Option<Vec<Vec<f64>>>,
    ) -> SolveReport {
        SolveReport {
            termination,
            primal,
            assignment_values: values,
        }
    }

    fn two_item_values() -> Option<Vec<Vec<f64>>> {
        Some(vec![vec![1.0, 0.0], vec![0.0, 1.0]])
    }

    #[test]
    fn optimal_report_is_decoded() {
        let mut backend = ScriptedBackend::new(report(
            TerminationStatus::Optimal,
            PrimalStatus::Feasible,
            two_item_values(),
        ));

        let assignment = partition(&[1.0, 2.0], 2, &mut backend, true).expect("assignment");
        assert_eq!(assignment.groups(), &[1, 2]);
        assert_eq!(backend.calls, 1);
    }

    #[rstest]
    #[case::time_limit(TerminationStatus::TimeLimit, PrimalStatus::Feasible)]
    #[case::infeasible(TerminationStatus::Infeasible, PrimalStatus::NoSolution)]
    #[case::other(TerminationStatus::Other("interrupted".into()), PrimalStatus::NoSolution)]
    fn strict_mode_rejects_non_optimal_status(
        #[case] termination: TerminationStatus,
        #[case] primal: PrimalStatus,
    ) {
        // Garbage values prove decoding never ran
        let mut backend = ScriptedBackend::new(report(
            termination.clone(),
            primal,
            Some(vec![vec![1.0, 1.0], vec![0.0, 0.0]]),
        ));

        let result = partition(&[1.0, 2.0], 2, &mut backend, true);
        match result {
            Err(PartitionError::Optimization {
                termination: got_termination,
                primal: got_primal,
            }) => {
                assert_eq!(got_termination, termination);
                assert_eq!(got_primal, primal);
            }
            other => panic!("expected optimization error, got {other:?}"),
        }
    }

    #[test]
    fn lenient_mode_decodes_non_optimal_point() {
        let mut backend = ScriptedBackend::new(report(
            TerminationStatus::TimeLimit,
            PrimalStatus::Feasible,
            two_item_values(),
        ));

        let assignment = partition(&[1.0, 2.0], 2, &mut backend, false).expect("assignment");
        assert_eq!(assignment.groups(), &[1, 2]);
    }

    #[test]
    fn lenient_mode_without_point_fails_explicitly() {
        let mut backend = ScriptedBackend::new(SolveReport::without_solution(
            TerminationStatus::Infeasible,
        ));

        let result = partition(&[1.0, 2.0], 2, &mut backend, false);
        assert!(matches!(
            result,
            Err(PartitionError::NoSolution {
                termination: TerminationStatus::Infeasible,
                primal: PrimalStatus::NoSolution,
            })
        ));
    }

    #[test]
    fn inconsistent_values_surface_as_decoding_error() {
        let mut backend = ScriptedBackend::new(report(
            TerminationStatus::Optimal,
            PrimalStatus::Feasible,
            Some(vec![vec![1.0, 0.0], vec![0.9, 0.8]]),
        ));

        let result = partition(&[1.0, 2.0], 2, &mut backend, true);
        assert!(matches!(
            result,
            Err(PartitionError::Decoding(DecodingError::Ambiguous { item: 1, .. }))
        ));
    }

    #[test]
    fn construction_errors_skip_the_solver() {
        let mut backend = ScriptedBackend::new(report(
            TerminationStatus::Optimal,
            PrimalStatus::Feasible,
            None,
        ));

        let result = partition(&[1.0], 0, &mut backend, true);
        assert!(matches!(
            result,
            Err(PartitionError::ModelConstruction(
                ModelConstructionError::NoGroups
            ))
        ));
        assert_eq!(backend.calls, 0);
    }

    #[test]
    fn label_balancing_reaches_a_conic_backend() {
        let mut backend = ScriptedBackend::new(report(
            TerminationStatus::Optimal,
            PrimalStatus::Feasible,
            two_item_values(),
        ))
        .conic();
        let labels = LabelMatrix::new(vec![vec![1.0, 0.0], vec![1.0, 1.0]]).expect("labels");
        let options = PartitionOptions::default()
            .with_labels(labels)
            .with_balance_weight(0.25);

        let assignment = partition_with(
            ObjectiveStrategy::MinLargest,
            &[1.0, 2.0],
            2,
            &mut backend,
            &options,
        )
        .expect("assignment");

        assert_eq!(assignment.len(), 2);
        assert_eq!(backend.seen_cones, 2 * 2);
        assert_eq!(backend.seen_entropy_weight, Some(-0.25));
    }

    #[test]
    fn label_balancing_without_cone_support_fails_before_solving() {
        let mut backend = ScriptedBackend::new(report(
            TerminationStatus::Optimal,
            PrimalStatus::Feasible,
            two_item_values(),
        ));
        let labels = LabelMatrix::new(vec![vec![1.0], vec![1.0]]).expect("labels");
        let options = PartitionOptions::default()
            .with_labels(labels)
            .with_balance_weight(1.0);

        let result = partition_with(
            ObjectiveStrategy::MinRange,
            &[1.0, 2.0],
            2,
            &mut backend,
            &options,
        );
        assert!(matches!(
            result,
            Err(PartitionError::UnsupportedCapability {
                capability: EXPONENTIAL_CONE
            })
        ));
        assert_eq!(backend.calls, 0);
    }

    #[test]
    fn options_default_to_strict_without_balancing() {
        let options = PartitionOptions::default();
        assert!(options.strict);
        assert_eq!(options.balance_weight, 0.0);
        assert!(options.labels.is_none());
    }
}
