// =============================================================================
// Error Types
// =============================================================================
//
// A single error enum for the whole core crate. Every fallible function
// returns `Result<T>`, which is `std::result::Result<T, FairStatsError>`.
//
// WHERE ERRORS COME FROM:
// -----------------------
//   - Dataset lookups:   ColumnNotFound, TypeMismatch
//   - Dataset building:  DimensionMismatch, DuplicateColumn, Csv, Io
//   - Test backends:     InsufficientData, ModelFit, InvalidValue
//
// Errors are never translated on the way up: a missing column surfaces as
// ColumnNotFound whether it was hit by the accessor or by a measure.
//
// =============================================================================

use thiserror::Error;

use crate::dataset::DataType;

/// Everything that can go wrong in fairstats-core.
#[derive(Error, Debug)]
pub enum FairStatsError {
    /// A query named a column that does not exist in the dataset.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A numeric operation was asked of a column holding another type.
    #[error("Column type mismatch: column {column}, expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    /// A group is empty or too small for the statistic to be defined.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The regression design cannot be fitted (e.g. rank deficient).
    #[error("Model fit failed: {0}")]
    ModelFit(String),

    /// Lengths of columns or vectors do not agree.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The same column name was supplied twice.
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A configuration or input value is out of its valid range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FairStatsError>;
