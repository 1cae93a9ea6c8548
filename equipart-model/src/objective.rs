use std::{fmt, str::FromStr};

use crate::{
    error::{ModelConstructionError, PartitionError},
    formulation::{Objective, ObjectiveSense, PartitionModel},
};

/// How "as equal as possible" is measured on the ordered group sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveStrategy {
    /// Minimise the last (largest) group sum.
    MinLargest,
    /// Maximise the first (smallest) group sum.
    MaxSmallest,
    /// Minimise the difference between the largest and smallest group sums.
    #[default]
    MinRange,
}

impl ObjectiveStrategy {
    /// Sets the model objective, replacing any previous one. A non-zero
    /// `alpha` rewards spreading each label's weight across groups.
    pub fn apply(self, model: &mut PartitionModel, alpha: f64) -> Result<(), PartitionError> {
        if !alpha.is_finite() {
            return Err(ModelConstructionError::NonFiniteWeight(alpha).into());
        }

        let sums = model.subset_sums();
        let (Some(smallest), Some(largest)) = (sums.first(), sums.last()) else {
            return Err(ModelConstructionError::NoGroups.into());
        };

        let (sense, mut expression) = match self {
            Self::MinLargest => (ObjectiveSense::Minimise, largest.clone()),
            Self::MaxSmallest => (ObjectiveSense::Maximise, smallest.clone()),
            Self::MinRange => (ObjectiveSense::Minimise, largest.clone() - smallest.clone()),
        };

        let mut entropy_weight = 0.0;
        if alpha != 0.0 {
            entropy_weight = match sense {
                ObjectiveSense::Minimise => -alpha,
                ObjectiveSense::Maximise => alpha,
            };
            for var in model.entropy_variables()? {
                expression.add_mul(entropy_weight, var);
            }
        }

        model.set_objective(Objective {
            sense,
            expression,
            entropy_weight,
        });
        Ok(())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MinLargest => "min-largest",
            Self::MaxSmallest => "max-smallest",
            Self::MinRange => "min-range",
        }
    }
}

impl fmt::Display for ObjectiveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown objective '{0}' (expected min-largest, max-smallest or min-range)")]
pub struct UnknownObjective(pub String);

impl FromStr for ObjectiveStrategy {
    type Err = UnknownObjective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "min-largest" => Ok(Self::MinLargest),
            "max-smallest" => Ok(Self::MaxSmallest),
            "min-range" => Ok(Self::MinRange),
            _ => Err(UnknownObjective(s.to_string())),
        }
    }
}
