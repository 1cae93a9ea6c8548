use thiserror::Error;

use crate::solver::{PrimalStatus, TerminationStatus};

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error(transparent)]
    ModelConstruction(#[from] ModelConstructionError),
    #[error("Solver does not support {capability} constraints")]
    UnsupportedCapability { capability: &'static str },
    #[error("Solver did not prove optimality (termination={termination}, primal={primal})")]
    Optimization {
        termination: TerminationStatus,
        primal: PrimalStatus,
    },
    #[error("Solver returned no solution to decode (termination={termination}, primal={primal})")]
    NoSolution {
        termination: TerminationStatus,
        primal: PrimalStatus,
    },
    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelConstructionError {
    #[error("Group count must be at least 1")]
    NoGroups,
    #[error("At least one size is required")]
    NoItems,
    #[error("Size of item {item} is not a finite number")]
    NonFiniteSize { item: usize },
    #[error("Label matrix has {rows} rows but there are {items} items")]
    LabelRowMismatch { rows: usize, items: usize },
    #[error("Label row {row} has {len} columns, expected {expected}")]
    RaggedLabels {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("Label weight at item {item}, label {label} must be finite and non-negative")]
    InvalidLabelWeight { item: usize, label: usize },
    #[error("Balance weight must be a finite number (found {0})")]
    NonFiniteWeight(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    #[error("Item {item} has {width} assignment values, expected {expected}")]
    RowWidth {
        item: usize,
        width: usize,
        expected: usize,
    },
    #[error("Item {item} is not assigned to any group")]
    Unassigned { item: usize },
    #[error("Item {item} is assigned to several groups {groups:?}")]
    Ambiguous { item: usize, groups: Vec<usize> },
    #[error("Solver returned {rows} assignment rows for {items} items")]
    RowCount { rows: usize, items: usize },
}
