// =============================================================================
// Dataset Accessor
// =============================================================================
//
// A read-only table of named, typed columns plus the group queries every
// statistical test is built on.
//
// THE TWO ROLES A COLUMN CAN PLAY
// -------------------------------
//   - TARGET column:    the outcome under test (a score, or 1/0 for
//                       accepted/rejected)
//   - PROTECTED column: group membership (0 = non-protected, 1 = protected)
//
// Queries take a (target, protected) pair of column names and return owned
// vectors or counts. Nothing hands out references into the table.
//
// SCHEMA
// ------
// Column names are resolved to positions once, when the dataset is built.
// A lookup for an unknown name fails with `ColumnNotFound`; a numeric query
// on a text column fails with `TypeMismatch`.
//
// GROUP SEMANTICS (READ THIS BEFORE ADDING A TEST)
// ------------------------------------------------
// Two conventions for "protected" exist, and both are in use:
//
//   BinaryExact:    protected ⇔ value == 1, non-protected ⇔ value == 0.
//                   Rows with any other value (2, 3, ...) are in NEITHER group.
//   ZeroVsNonzero:  non-protected ⇔ value == 0, protected ⇔ value != 0.
//
// The t-test and Fisher's exact test use BinaryExact; the two-proportion
// z-test uses ZeroVsNonzero. On a multi-valued protected column they see
// different groups. Pick the strategy explicitly.
//
// =============================================================================

mod loader;

use std::collections::HashMap;
use std::fmt;

use log::trace;
use ndarray::Array1;

use crate::error::{FairStatsError, Result};

/// Protected-column value of the non-protected group.
pub const NON_PROTECTED_GROUP: f64 = 0.0;

/// Protected-column value of the protected group under `BinaryExact`.
pub const PROTECTED_GROUP: f64 = 1.0;

// =============================================================================
// Column Types
// =============================================================================

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit float; NaN marks a missing value
    Float,
    /// 64-bit signed integer
    Int,
    /// Free text / categorical labels
    Text,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Float => "float",
            DataType::Int => "int",
            DataType::Text => "text",
        };
        f.write_str(name)
    }
}

/// The values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Array1<f64>),
    Int(Array1<i64>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(values) => values.len(),
            ColumnData::Int(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            ColumnData::Float(_) => DataType::Float,
            ColumnData::Int(_) => DataType::Int,
            ColumnData::Text(_) => DataType::Text,
        }
    }

    /// Numeric view of the column as f64, or None for text.
    pub fn to_f64(&self) -> Option<Array1<f64>> {
        match self {
            ColumnData::Float(values) => Some(values.clone()),
            ColumnData::Int(values) => Some(values.mapv(|v| v as f64)),
            ColumnData::Text(_) => None,
        }
    }
}

/// A named column, the unit datasets are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnData::Float(Array1::from(values)))
    }

    pub fn int(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(name, ColumnData::Int(Array1::from(values)))
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Name and type of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub dtype: DataType,
}

/// Column names and types, with name → position resolved up front.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    positions: HashMap<String, usize>,
}

impl Schema {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Position of a column, or `ColumnNotFound`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| FairStatsError::ColumnNotFound(name.to_string()))
    }

    pub fn field(&self, name: &str) -> Result<&Field> {
        let idx = self.index_of(name)?;
        Ok(&self.fields[idx])
    }
}

// =============================================================================
// Group Partitioning
// =============================================================================

/// How protected-column values map onto the two groups.
///
/// See the module header for why both exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionStrategy {
    /// protected ⇔ value == 1, non-protected ⇔ value == 0
    #[default]
    BinaryExact,
    /// protected ⇔ value != 0, non-protected ⇔ value == 0
    ZeroVsNonzero,
}

impl PartitionStrategy {
    pub fn is_protected(self, value: f64) -> bool {
        match self {
            PartitionStrategy::BinaryExact => value == PROTECTED_GROUP,
            PartitionStrategy::ZeroVsNonzero => value != NON_PROTECTED_GROUP,
        }
    }

    /// Both strategies share the zero rule: non-protected ⇔ value == 0.
    /// A NaN protected value is never non-protected.
    pub fn is_non_protected(self, value: f64) -> bool {
        value == NON_PROTECTED_GROUP
    }
}

/// Target values split into the two groups, in table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupSplit {
    pub protected: Vec<f64>,
    pub non_protected: Vec<f64>,
}

impl GroupSplit {
    /// Accepted (nonzero) outcomes in the protected group.
    pub fn protected_accepted(&self) -> usize {
        self.protected.iter().filter(|&&v| is_accepted(v)).count()
    }

    /// Accepted (nonzero) outcomes in the non-protected group.
    pub fn non_protected_accepted(&self) -> usize {
        self.non_protected.iter().filter(|&&v| is_accepted(v)).count()
    }
}

/// A target value counts as accepted when it is nonzero.
///
/// NaN is nonzero, so a missing outcome counts as accepted.
#[inline]
pub fn is_accepted(value: f64) -> bool {
    value != 0.0
}

// =============================================================================
// Dataset
// =============================================================================

/// Immutable table of equally long, uniquely named columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    columns: Vec<ColumnData>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from columns.
    ///
    /// # Errors
    /// * `DimensionMismatch` - columns have different lengths
    /// * `DuplicateColumn` - a name appears twice
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, Column::len);
        let mut schema = Schema::default();
        let mut data = Vec::with_capacity(columns.len());

        for column in columns {
            if column.len() != n_rows {
                return Err(FairStatsError::DimensionMismatch(format!(
                    "column '{}' has {} rows but the dataset has {}",
                    column.name,
                    column.len(),
                    n_rows
                )));
            }
            if schema.contains(&column.name) {
                return Err(FairStatsError::DuplicateColumn(column.name));
            }

            schema.positions.insert(column.name.clone(), schema.fields.len());
            schema.fields.push(Field {
                name: column.name,
                dtype: column.data.dtype(),
            });
            data.push(column.data);
        }

        Ok(Self {
            schema,
            columns: data,
            n_rows,
        })
    }

    /// Start a fluent builder.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.schema.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Raw values of a column.
    pub fn column(&self, name: &str) -> Result<&ColumnData> {
        let idx = self.schema.index_of(name)?;
        Ok(&self.columns[idx])
    }

    /// A column as f64 values.
    ///
    /// # Errors
    /// * `ColumnNotFound` - no such column
    /// * `TypeMismatch` - the column holds text
    pub fn numeric(&self, name: &str) -> Result<Array1<f64>> {
        let data = self.column(name)?;
        data.to_f64().ok_or_else(|| FairStatsError::TypeMismatch {
            column: name.to_string(),
            expected: DataType::Float,
            found: data.dtype(),
        })
    }

    /// Resolve both names before reading either, so a missing column is
    /// reported ahead of a type problem.
    pub(crate) fn target_and_protected(
        &self,
        target_col: &str,
        protected_col: &str,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        self.schema.index_of(target_col)?;
        self.schema.index_of(protected_col)?;
        Ok((self.numeric(target_col)?, self.numeric(protected_col)?))
    }

    // -------------------------------------------------------------------------
    // Group queries
    // -------------------------------------------------------------------------

    /// All target values of rows whose protected value equals `group_value`.
    ///
    /// Matching is exact equality: asking for group 1 does not pick up rows
    /// labelled 2 or 3. An empty result is not an error.
    pub fn get_all_targets_of_group(
        &self,
        target_col: &str,
        protected_col: &str,
        group_value: f64,
    ) -> Result<Vec<f64>> {
        let (target, protected) = self.target_and_protected(target_col, protected_col)?;

        let values: Vec<f64> = target
            .iter()
            .zip(protected.iter())
            .filter(|&(_, &p)| p == group_value)
            .map(|(&t, _)| t)
            .collect();

        trace!(
            "{} rows of '{}' with {} == {}",
            values.len(),
            target_col,
            protected_col,
            group_value
        );
        Ok(values)
    }

    /// Count rows with `protected_col == group` whose outcome is accepted
    /// (`accepted = true`, target nonzero) or rejected (`accepted = false`,
    /// target zero).
    pub fn count_classification_and_category(
        &self,
        target_col: &str,
        protected_col: &str,
        group: f64,
        accepted: bool,
    ) -> Result<usize> {
        let (target, protected) = self.target_and_protected(target_col, protected_col)?;

        Ok(target
            .iter()
            .zip(protected.iter())
            .filter(|&(&t, &p)| p == group && is_accepted(t) == accepted)
            .count())
    }

    /// Split target values into protected and non-protected groups.
    pub fn partition(
        &self,
        target_col: &str,
        protected_col: &str,
        strategy: PartitionStrategy,
    ) -> Result<GroupSplit> {
        let (target, protected) = self.target_and_protected(target_col, protected_col)?;

        let mut split = GroupSplit::default();
        for (&t, &p) in target.iter().zip(protected.iter()) {
            if strategy.is_non_protected(p) {
                split.non_protected.push(t);
            } else if strategy.is_protected(p) {
                split.protected.push(t);
            }
        }

        trace!(
            "{:?} split of '{}' by '{}': {} protected, {} non-protected",
            strategy,
            target_col,
            protected_col,
            split.protected.len(),
            split.non_protected.len()
        );
        Ok(split)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects columns, validated together on `build()`.
///
/// ```
/// use fairstats_core::Dataset;
///
/// let dataset = Dataset::builder()
///     .float("score", vec![0.2, 0.9, 0.4])
///     .int("protected", vec![1, 0, 1])
///     .build()
///     .unwrap();
/// assert_eq!(dataset.n_rows(), 3);
/// ```
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<Column>,
}

impl DatasetBuilder {
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn float(self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.column(Column::float(name, values))
    }

    pub fn int(self, name: impl Into<String>, values: Vec<i64>) -> Self {
        self.column(Column::int(name, values))
    }

    pub fn text(self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.column(Column::text(name, values))
    }

    pub fn build(self) -> Result<Dataset> {
        Dataset::new(self.columns)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// target = 1..=8, protected cycles through 0, 1, 2, 3
    fn four_group_dataset() -> Dataset {
        Dataset::builder()
            .int("target", vec![1, 2, 3, 4, 5, 6, 7, 8])
            .int("protected", vec![0, 1, 2, 3, 0, 1, 2, 3])
            .build()
            .unwrap()
    }

    fn admissions_dataset() -> Dataset {
        Dataset::builder()
            .int("admitted", vec![1, 0, 1, 1, 0, 0, 1, 0, 0, 1])
            .int("protected", vec![1, 1, 1, 0, 0, 0, 0, 1, 1, 0])
            .float("score", vec![0.9, 0.1, 0.8, 0.7, 0.3, 0.2, 0.6, 0.4, 0.5, 0.95])
            .build()
            .unwrap()
    }

    #[test]
    fn test_targets_of_group_exact_match() {
        let dataset = four_group_dataset();
        assert_eq!(
            dataset.get_all_targets_of_group("target", "protected", 0.0).unwrap(),
            vec![1.0, 5.0]
        );
        assert_eq!(
            dataset.get_all_targets_of_group("target", "protected", 1.0).unwrap(),
            vec![2.0, 6.0]
        );
    }

    #[test]
    fn test_targets_of_absent_group_is_empty() {
        let dataset = four_group_dataset();
        let values = dataset.get_all_targets_of_group("target", "protected", 7.0).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_group_extraction_matches_row_count() {
        let dataset = four_group_dataset();
        let target = dataset.numeric("target").unwrap();
        let protected = dataset.numeric("protected").unwrap();

        for group in [0.0, 1.0, 2.0, 3.0] {
            let values = dataset.get_all_targets_of_group("target", "protected", group).unwrap();
            let expected: Vec<f64> = (0..dataset.n_rows())
                .filter(|&i| protected[i] == group)
                .map(|i| target[i])
                .collect();
            assert_eq!(values, expected);
        }
    }

    #[test]
    fn test_count_accepted_in_group_zero() {
        let dataset = four_group_dataset();
        let accepted = dataset
            .count_classification_and_category("target", "protected", 0.0, true)
            .unwrap();
        assert_eq!(accepted, 2);
        let rejected = dataset
            .count_classification_and_category("target", "protected", 0.0, false)
            .unwrap();
        assert_eq!(rejected, 0);
    }

    #[test]
    fn test_accepted_plus_rejected_is_group_size() {
        let dataset = admissions_dataset();
        for group in [0.0, 1.0] {
            let accepted = dataset
                .count_classification_and_category("admitted", "protected", group, true)
                .unwrap();
            let rejected = dataset
                .count_classification_and_category("admitted", "protected", group, false)
                .unwrap();
            let size = dataset
                .get_all_targets_of_group("admitted", "protected", group)
                .unwrap()
                .len();
            assert_eq!(accepted + rejected, size);
        }
    }

    #[test]
    fn test_partition_strategies_differ_on_multi_valued_column() {
        let dataset = four_group_dataset();

        let binary = dataset
            .partition("target", "protected", PartitionStrategy::BinaryExact)
            .unwrap();
        assert_eq!(binary.protected, vec![2.0, 6.0]);
        assert_eq!(binary.non_protected, vec![1.0, 5.0]);

        let nonzero = dataset
            .partition("target", "protected", PartitionStrategy::ZeroVsNonzero)
            .unwrap();
        assert_eq!(nonzero.protected, vec![2.0, 3.0, 4.0, 6.0, 7.0, 8.0]);
        assert_eq!(nonzero.non_protected, vec![1.0, 5.0]);
        assert_eq!(nonzero.protected_accepted(), 6);
        assert_eq!(nonzero.non_protected_accepted(), 2);
    }

    #[test]
    fn test_partition_strategies_agree_on_binary_column() {
        let dataset = admissions_dataset();
        let a = dataset
            .partition("score", "protected", PartitionStrategy::BinaryExact)
            .unwrap();
        let b = dataset
            .partition("score", "protected", PartitionStrategy::ZeroVsNonzero)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.protected.len() + a.non_protected.len(), dataset.n_rows());
    }

    #[test]
    fn test_missing_group_value() {
        use PartitionStrategy::*;
        for strategy in [BinaryExact, ZeroVsNonzero] {
            assert!(strategy.is_non_protected(0.0));
            assert!(!strategy.is_non_protected(f64::NAN));
        }
        assert!(!BinaryExact.is_protected(f64::NAN));
        assert!(ZeroVsNonzero.is_protected(f64::NAN));

        let dataset = Dataset::builder()
            .float("target", vec![1.0, 2.0, 3.0])
            .float("protected", vec![0.0, f64::NAN, 1.0])
            .build()
            .unwrap();
        let exact = dataset
            .partition("target", "protected", BinaryExact)
            .unwrap();
        assert_eq!(exact.protected, vec![3.0]);
        assert_eq!(exact.non_protected, vec![1.0]);
        let nonzero = dataset
            .partition("target", "protected", ZeroVsNonzero)
            .unwrap();
        assert_eq!(nonzero.protected, vec![2.0, 3.0]);
    }

    #[test]
    fn test_missing_column() {
        let dataset = four_group_dataset();
        let err = dataset
            .get_all_targets_of_group("outcome", "protected", 0.0)
            .unwrap_err();
        assert!(matches!(err, FairStatsError::ColumnNotFound(name) if name == "outcome"));

        let err = dataset
            .count_classification_and_category("target", "gender", 1.0, true)
            .unwrap_err();
        assert!(matches!(err, FairStatsError::ColumnNotFound(name) if name == "gender"));
    }

    #[test]
    fn test_text_column_is_not_numeric() {
        let dataset = Dataset::builder()
            .text("label", vec!["a".into(), "b".into()])
            .int("protected", vec![0, 1])
            .build()
            .unwrap();
        let err = dataset.get_all_targets_of_group("label", "protected", 0.0).unwrap_err();
        assert!(matches!(
            err,
            FairStatsError::TypeMismatch { found: DataType::Text, .. }
        ));
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let err = Dataset::builder()
            .int("a", vec![1, 2, 3])
            .int("b", vec![1, 2])
            .build()
            .unwrap_err();
        assert!(matches!(err, FairStatsError::DimensionMismatch(_)));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Dataset::builder()
            .int("a", vec![1])
            .float("a", vec![1.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, FairStatsError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_schema_resolved_at_construction() {
        let dataset = admissions_dataset();
        assert_eq!(dataset.n_cols(), 3);
        assert_eq!(dataset.column_names(), vec!["admitted", "protected", "score"]);
        assert_eq!(dataset.schema().index_of("score").unwrap(), 2);
        assert_eq!(dataset.schema().field("admitted").unwrap().dtype, DataType::Int);
        assert!(!dataset.schema().contains("missing"));
    }

    #[test]
    fn test_nan_target_counts_as_accepted() {
        let dataset = Dataset::builder()
            .float("y", vec![f64::NAN, 0.0])
            .int("g", vec![1, 1])
            .build()
            .unwrap();
        assert_eq!(
            dataset.count_classification_and_category("y", "g", 1.0, true).unwrap(),
            1
        );
    }
}
