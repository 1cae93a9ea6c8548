use crate::{error::DecodingError, model::Assignment};

/// Values above this count as a binary `1`.
pub const ACTIVE_THRESHOLD: f64 = 0.5;

/// Turns solved one-hot rows into 1-based group indices. A row with zero or
/// several active columns is an error, never resolved by picking one.
pub fn decode_assignment(
    values: &[Vec<f64>],
    items: usize,
    k: usize,
) -> Result<Assignment, DecodingError> {
    if values.len() != items {
        return Err(DecodingError::RowCount {
            rows: values.len(),
            items,
        });
    }

    let mut groups = Vec::with_capacity(items);
    for (item, row) in values.iter().enumerate() {
        if row.len() != k {
            return Err(DecodingError::RowWidth {
                item,
                width: row.len(),
                expected: k,
            });
        }

        let active: Vec<usize> = row
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value > ACTIVE_THRESHOLD)
            .map(|(col, _)| col + 1)
            .collect();

        match active.len() {
            1 => groups.push(active[0]),
            0 => return Err(DecodingError::Unassigned { item }),
            _ => {
                return Err(DecodingError::Ambiguous {
                    item,
                    groups: active,
                });
            }
        }
    }

    Ok(Assignment::new(groups, k))
}
