use good_lp::{Constraint, Expression, ProblemVariables, Variable, variable, variables};

use crate::{
    error::{ModelConstructionError, PartitionError},
    model::LabelMatrix,
    solver::{Capabilities, EXPONENTIAL_CONE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimise,
    Maximise,
}

pub struct Objective {
    pub sense: ObjectiveSense,
    pub expression: Expression,
    /// Coefficient applied to every entropy variable (zero when balancing is off).
    pub entropy_weight: f64,
}

/// `(entropy, 1, fraction)` in the exponential cone, i.e. `entropy <= ln(fraction)`.
pub struct ExponentialCone {
    pub group: usize,
    pub label: usize,
    pub entropy: Variable,
    pub fraction: Expression,
}

enum LabelBalance {
    Absent,
    Unavailable,
    Terms(Vec<ExponentialCone>),
}

/// Model handle for one partition solve. Owned by a single call and consumed
/// by the solver backend.
pub struct PartitionModel {
    variables: ProblemVariables,
    assignment: Vec<Vec<Variable>>,
    subset_sums: Vec<Expression>,
    constraints: Vec<Constraint>,
    label_balance: LabelBalance,
    objective: Option<Objective>,
}

/// Everything a backend needs to lower the model into a concrete solver.
pub struct ModelParts {
    pub variables: ProblemVariables,
    pub assignment: Vec<Vec<Variable>>,
    pub constraints: Vec<Constraint>,
    pub cones: Vec<ExponentialCone>,
    pub objective: Option<Objective>,
}

impl PartitionModel {
    pub fn build(
        sizes: &[f64],
        k: usize,
        labels: Option<&LabelMatrix>,
        capabilities: Capabilities,
    ) -> Result<Self, PartitionError> {
        if k < 1 {
            return Err(ModelConstructionError::NoGroups.into());
        }
        if sizes.is_empty() {
            return Err(ModelConstructionError::NoItems.into());
        }
        if let Some(item) = sizes.iter().position(|size| !size.is_finite()) {
            return Err(ModelConstructionError::NonFiniteSize { item }.into());
        }
        if let Some(labels) = labels.filter(|labels| labels.row_count() != sizes.len()) {
            return Err(ModelConstructionError::LabelRowMismatch {
                rows: labels.row_count(),
                items: sizes.len(),
            }
            .into());
        }

        let mut vars = variables!();
        let assignment: Vec<Vec<Variable>> = sizes
            .iter()
            .map(|_| (0..k).map(|_| vars.add(variable().binary())).collect())
            .collect();

        let mut constraints = Vec::with_capacity(sizes.len() + k);

        // Each item belongs to exactly one group
        for row in &assignment {
            let mut exactly_one = Expression::with_capacity(k);
            for &var in row {
                exactly_one.add_mul(1.0, var);
            }
            constraints.push(exactly_one.eq(1.0));
        }

        let subset_sums: Vec<Expression> = (0..k)
            .map(|group| {
                let mut sum = Expression::with_capacity(sizes.len());
                for (row, &size) in assignment.iter().zip(sizes) {
                    sum.add_mul(size, row[group]);
                }
                sum
            })
            .collect();

        // Non-decreasing group sums remove the k! relabelings
        for pair in subset_sums.windows(2) {
            constraints.push((pair[0].clone() - pair[1].clone()).leq(0.0));
        }

        let label_balance = match labels {
            None => LabelBalance::Absent,
            Some(_) if !capabilities.exponential_cone => LabelBalance::Unavailable,
            Some(labels) => LabelBalance::Terms(entropy_cones(&mut vars, &assignment, labels)),
        };

        tracing::debug!(
            "Built partition model with {} items, {} groups, {} constraints",
            sizes.len(),
            k,
            constraints.len()
        );

        Ok(Self {
            variables: vars,
            assignment,
            subset_sums,
            constraints,
            label_balance,
            objective: None,
        })
    }

    pub fn item_count(&self) -> usize {
        self.assignment.len()
    }

    pub fn group_count(&self) -> usize {
        self.subset_sums.len()
    }

    pub fn assignment(&self) -> &[Vec<Variable>] {
        &self.assignment
    }

    /// Group sums in canonical (non-decreasing) order.
    pub fn subset_sums(&self) -> &[Expression] {
        &self.subset_sums
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn exponential_cones(&self) -> &[ExponentialCone] {
        match &self.label_balance {
            LabelBalance::Terms(cones) => cones,
            LabelBalance::Absent | LabelBalance::Unavailable => &[],
        }
    }

    /// Variables whose sum is the total label entropy. Empty when no labels
    /// were supplied.
    pub fn entropy_variables(&self) -> Result<Vec<Variable>, PartitionError> {
        match &self.label_balance {
            LabelBalance::Absent => Ok(Vec::new()),
            LabelBalance::Unavailable => Err(PartitionError::UnsupportedCapability {
                capability: EXPONENTIAL_CONE,
            }),
            LabelBalance::Terms(cones) => Ok(cones.iter().map(|cone| cone.entropy).collect()),
        }
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    pub fn into_parts(self) -> ModelParts {
        let cones = match self.label_balance {
            LabelBalance::Terms(cones) => cones,
            LabelBalance::Absent | LabelBalance::Unavailable => Vec::new(),
        };
        ModelParts {
            variables: self.variables,
            assignment: self.assignment,
            constraints: self.constraints,
            cones,
            objective: self.objective,
        }
    }
}

fn entropy_cones(
    vars: &mut ProblemVariables,
    assignment: &[Vec<Variable>],
    labels: &LabelMatrix,
) -> Vec<ExponentialCone> {
    let k = assignment.first().map_or(0, Vec::len);
    let mut cones = Vec::with_capacity(k * labels.label_count());
    for label in 0..labels.label_count() {
        let total = labels.label_total(label);
        if total <= 0.0 {
            continue;
        }
        for group in 0..k {
            let mut fraction = Expression::with_capacity(assignment.len());
            for (item, row) in assignment.iter().enumerate() {
                let weight = labels.weight(item, label);
                if weight > 0.0 {
                    fraction.add_mul(weight / total, row[group]);
                }
            }
            cones.push(ExponentialCone {
                group,
                label,
                entropy: vars.add(variable()),
                fraction,
            });
        }
    }
    cones
}
