// =============================================================================
// fairstats Core Library
// =============================================================================
//
// Significance tests for group fairness: given a table with an outcome
// ("target") column and a group-membership ("protected") column, is the
// outcome distributed differently across the groups?
//
// STRUCTURE:
// ----------
//   - dataset:    typed table, schema, group extraction and counting
//   - backend:    capability traits for the numeric routines + StatrsBackend
//   - measures:   t-test, Fisher exact, regression slope, two-proportion z
//   - inference:  p-values, confidence intervals, significance stars
//   - convert:    ndarray ↔ nalgebra helpers
//   - error:      error type used throughout the library
//
// FOR MAINTAINERS:
// ----------------
// When adding a new test:
//   1. Put the numeric routine behind a trait in `backend` and implement it
//      for `StatrsBackend`
//   2. Put the input preparation in `measures`, using the dataset queries
//   3. Decide which `PartitionStrategy` defines the groups, and say so
//   4. Re-export it here and add a binding in the `fairstats` crate
//
// =============================================================================

pub mod backend;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod measures;

pub use backend::{
    FisherExactProvider, OlsProvider, StatrsBackend, TTestProvider, ZTestProvider,
};
pub use dataset::{Column, ColumnData, DataType, Dataset, GroupSplit, PartitionStrategy};
pub use error::{FairStatsError, Result};
pub use inference::Alternative;
pub use measures::{
    fisher_exact_two_groups, regression_slope_test, t_test_ind, two_proportion_z_test,
};
