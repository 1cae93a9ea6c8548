use crate::error::ModelConstructionError;

/// Per-item label weights, one row per item and one column per label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatrix {
    rows: Vec<Vec<f64>>,
    labels: usize,
}

impl LabelMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ModelConstructionError> {
        let labels = rows.first().map_or(0, Vec::len);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != labels {
                return Err(ModelConstructionError::RaggedLabels {
                    row: row_idx,
                    len: row.len(),
                    expected: labels,
                });
            }
            for (label, &weight) in row.iter().enumerate() {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ModelConstructionError::InvalidLabelWeight {
                        item: row_idx,
                        label,
                    });
                }
            }
        }
        Ok(Self { rows, labels })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels
    }

    pub fn weight(&self, item: usize, label: usize) -> f64 {
        self.rows[item][label]
    }

    pub fn label_total(&self, label: usize) -> f64 {
        self.rows.iter().map(|row| row[label]).sum()
    }
}

/// Group index (1-based) of every item, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    groups: Vec<usize>,
    group_count: usize,
}

impl Assignment {
    pub(crate) fn new(groups: Vec<usize>, group_count: usize) -> Self {
        Self {
            groups,
            group_count,
        }
    }

    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<usize> {
        self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().copied()
    }

    /// Item indices (0-based) placed in `group` (1-based).
    pub fn members(&self, group: usize) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|&(_, &g)| g == group)
            .map(|(item, _)| item)
            .collect()
    }

    /// Sum of each group in index order; empty groups sum to zero.
    pub fn group_sums(&self, sizes: &[f64]) -> Vec<f64> {
        let mut sums = vec![0.0; self.group_count];
        for (&group, &size) in self.groups.iter().zip(sizes) {
            sums[group - 1] += size;
        }
        sums
    }

    pub fn range(&self, sizes: &[f64]) -> f64 {
        let sums = self.group_sums(sizes);
        let max = sums.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = sums.iter().copied().fold(f64::INFINITY, f64::min);
        max - min
    }
}
