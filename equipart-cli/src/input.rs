use std::borrow::Cow;

use equipart_model::LabelMatrix;

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub sizes: Vec<f64>,
    pub labels: Option<LabelMatrix>,
}

/// One item per line: `size[, weight, ...]`. Blank lines and `#` comments are
/// skipped.
pub fn parse_instance(source: &str) -> Result<Instance, Cow<'static, str>> {
    let mut sizes = Vec::new();
    let mut label_rows: Vec<Vec<f64>> = Vec::new();
    let mut label_columns = None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(',').map(str::trim);
        let size_field = fields.next().unwrap_or_default();
        let size: f64 = size_field
            .parse()
            .map_err(|_| format!("Invalid size '{size_field}' at line {line_no}"))?;

        let weights = fields
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid label weight '{field}' at line {line_no}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match label_columns {
            None => label_columns = Some(weights.len()),
            Some(expected) if expected != weights.len() => {
                return Err(format!(
                    "Line {line_no} has {} label weights, expected {expected}",
                    weights.len()
                )
                .into());
            }
            Some(_) => {}
        }

        sizes.push(size);
        label_rows.push(weights);
    }

    if sizes.is_empty() {
        return Err("Input contains no sizes".into());
    }

    let labels = match label_columns {
        Some(columns) if columns > 0 => {
            Some(LabelMatrix::new(label_rows).map_err(|err| err.to_string())?)
        }
        _ => None,
    };

    Ok(Instance { sizes, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_sizes_and_skips_comments() {
        let instance = parse_instance("# sizes\n1\n\n2.5  # inline\n-3\n").expect("instance");
        assert_eq!(instance.sizes, vec![1.0, 2.5, -3.0]);
        assert!(instance.labels.is_none());
    }

    #[test]
    fn parses_label_columns() {
        let instance = parse_instance("3, 1, 0\n1, 0, 2\n").expect("instance");
        assert_eq!(instance.sizes, vec![3.0, 1.0]);
        let labels = instance.labels.expect("labels");
        assert_eq!(labels.label_count(), 2);
        assert_eq!(labels.weight(1, 1), 2.0);
    }

    #[rstest]
    #[case::empty("", "Input contains no sizes")]
    #[case::only_comments("# nothing\n", "Input contains no sizes")]
    #[case::bad_size("1\nabc\n", "Invalid size 'abc' at line 2")]
    #[case::bad_weight("1, x\n", "Invalid label weight 'x' at line 1")]
    #[case::ragged("1, 1\n2\n", "Line 2 has 0 label weights, expected 1")]
    fn rejects_malformed_input(#[case] source: &str, #[case] expected: &str) {
        let err = parse_instance(source).expect_err("should fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn rejects_negative_label_weights() {
        let err = parse_instance("1, -1\n").expect_err("should fail");
        assert!(err.contains("must be finite and non-negative"));
    }
}
