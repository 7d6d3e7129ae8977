// =============================================================================
// Group Fairness Measures
// =============================================================================
//
// Significance tests for "does the outcome depend on group membership?".
// Each takes a dataset, the name of the TARGET column (outcome) and the name
// of the PROTECTED column (group membership):
//
//   t_test_ind               - difference of mean outcome (Student / Welch)
//   fisher_exact_two_groups  - acceptance odds, exact test on a 2×2 table
//   regression_slope_test    - t-value of the protected coefficient in OLS
//   two_proportion_z_test    - difference of acceptance rates
//
// HOW EACH FUNCTION IS BUILT
// --------------------------
// 1. Pull the inputs out of the dataset with the accessor queries
//    (group vectors, counts, columns).
// 2. Hand them to a backend (see `crate::backend`).
//
// Every measure comes in two forms:
//   - `name(dataset, target, protected, ...)`  → default backend, default
//     options, plain tuple result
//   - `name_with(provider, dataset, target, protected, config)`  → any
//     backend, full options, full outcome struct
//
// GROUP DEFINITIONS DIFFER
// ------------------------
// t_test_ind and fisher_exact_two_groups use BinaryExact (protected == 1 vs
// protected == 0); two_proportion_z_test uses ZeroVsNonzero (protected != 0
// vs protected == 0). On a protected column with values other than 0 and 1
// these compare different groups. See `crate::dataset`.
//
// =============================================================================

use log::debug;

use crate::backend::{
    add_constant, ContingencyTable, FisherConfig, FisherExactProvider, FisherOutcome, OlsConfig,
    OlsFit, OlsProvider, StatrsBackend, TTestConfig, TTestOutcome, TTestProvider, ZTestConfig,
    ZTestOutcome, ZTestProvider,
};
use crate::dataset::{Dataset, PartitionStrategy, NON_PROTECTED_GROUP, PROTECTED_GROUP};
use crate::error::{FairStatsError, Result};
use crate::inference::normal_cdf;

// =============================================================================
// Difference of Means: t-Test
// =============================================================================

/// Independent two-sample t-test of the target between the protected
/// (`== 1`) and non-protected (`== 0`) groups.
///
/// # Arguments
/// * `target_col` - column with the classifier results or scores
/// * `protected_col` - column with the protection status
/// * `equal_var` - true: Student's test with pooled variance;
///   false: Welch's test
///
/// # Returns
/// (t-statistic, two-tailed p-value). The statistic is positive when the
/// protected group has the higher mean.
///
/// # Errors
/// * `ColumnNotFound` - either column is missing
/// * `InsufficientData` - a group is empty or has no variance
pub fn t_test_ind(
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
    equal_var: bool,
) -> Result<(f64, f64)> {
    let config = TTestConfig {
        equal_var,
        ..TTestConfig::default()
    };
    let outcome = t_test_ind_with(&StatrsBackend, dataset, target_col, protected_col, &config)?;
    Ok((outcome.statistic, outcome.pvalue))
}

/// [`t_test_ind`] with an explicit backend and options.
pub fn t_test_ind_with<P: TTestProvider + ?Sized>(
    provider: &P,
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
    config: &TTestConfig,
) -> Result<TTestOutcome> {
    let groups = dataset.partition(target_col, protected_col, PartitionStrategy::BinaryExact)?;
    provider.ttest_ind(&groups.protected, &groups.non_protected, config)
}

// =============================================================================
// Acceptance Odds: Fisher's Exact Test
// =============================================================================

/// The 2×2 acceptance table, from four accessor counts.
///
/// ```text
///                 accepted   rejected
///   protected   |  row 0, col 0  |  row 0, col 1  |
///   non-prot.   |  row 1, col 0  |  row 1, col 1  |
/// ```
///
/// Groups are `protected == 1` and `protected == 0`; rows with other
/// protected values are not counted.
pub fn contingency_table(
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
) -> Result<ContingencyTable> {
    let count = |group: f64, accepted: bool| -> Result<u64> {
        dataset
            .count_classification_and_category(target_col, protected_col, group, accepted)
            .map(|c| c as u64)
    };

    Ok([
        [count(PROTECTED_GROUP, true)?, count(PROTECTED_GROUP, false)?],
        [count(NON_PROTECTED_GROUP, true)?, count(NON_PROTECTED_GROUP, false)?],
    ])
}

/// Fisher's exact test on the acceptance table of the protected and
/// non-protected groups.
///
/// # Returns
/// (odds ratio, p-value). The odds ratio is the acceptance odds of the
/// protected group over those of the non-protected group.
pub fn fisher_exact_two_groups(
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
) -> Result<(f64, f64)> {
    let outcome = fisher_exact_two_groups_with(
        &StatrsBackend,
        dataset,
        target_col,
        protected_col,
        &FisherConfig::default(),
    )?;
    Ok((outcome.odds_ratio, outcome.pvalue))
}

/// [`fisher_exact_two_groups`] with an explicit backend and options.
pub fn fisher_exact_two_groups_with<P: FisherExactProvider + ?Sized>(
    provider: &P,
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
    config: &FisherConfig,
) -> Result<FisherOutcome> {
    let table = contingency_table(dataset, target_col, protected_col)?;
    debug!("fisher exact contingency table: {:?}", table);
    provider.fisher_exact(&table, config)
}

// =============================================================================
// Regression Slope Test
// =============================================================================

/// t-statistic of the protected column's coefficient in the OLS model
/// `target ~ 1 + protected`.
///
/// # Errors
/// * `ModelFit` - the protected column is constant (rank-deficient design)
/// * `InsufficientData` - fewer than 3 rows
/// * `InvalidValue` - the protected column has a missing (NaN) value
///
/// A missing target value gives a NaN t-statistic.
pub fn regression_slope_test(
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
) -> Result<f64> {
    let fit = regression_fit_with(
        &StatrsBackend,
        dataset,
        target_col,
        protected_col,
        &OlsConfig::default(),
    )?;
    fit.t_values.get(1).copied().ok_or_else(|| {
        FairStatsError::ModelFit("fit has no coefficient for the protected column".to_string())
    })
}

/// Full OLS fit of `target ~ 1 + protected`.
///
/// Coefficient 0 is the intercept, coefficient 1 the protected column.
pub fn regression_fit_with<P: OlsProvider + ?Sized>(
    provider: &P,
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
    config: &OlsConfig,
) -> Result<OlsFit> {
    let (y, protected) = dataset.target_and_protected(target_col, protected_col)?;
    let x = add_constant(&protected);
    provider.ols(&y, &x, config)
}

// =============================================================================
// Difference of Proportions: z-Test
// =============================================================================

/// Success counts and group sizes for the z-test, as
/// `([successes A, successes B], [rows A, rows B])` where group A is
/// `protected == 0` and group B is `protected != 0`.
pub fn proportion_counts(
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
) -> Result<([u64; 2], [u64; 2])> {
    let groups = dataset.partition(target_col, protected_col, PartitionStrategy::ZeroVsNonzero)?;
    let count = [
        groups.non_protected_accepted() as u64,
        groups.protected_accepted() as u64,
    ];
    let nobs = [
        groups.non_protected.len() as u64,
        groups.protected.len() as u64,
    ];
    Ok((count, nobs))
}

/// Two-proportion z-test of the acceptance rate (share of nonzero targets)
/// between `protected == 0` and `protected != 0`.
///
/// # Returns
/// (z-score, p-value). The z-score is positive when the non-protected group
/// has the higher acceptance rate.
///
/// A NaN protected value is nonzero, so that row joins group B; a NaN
/// target counts as accepted.
///
/// # Errors
/// * `InsufficientData` - one of the groups has no rows
pub fn two_proportion_z_test(
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
) -> Result<(f64, f64)> {
    let outcome = two_proportion_z_test_with(
        &StatrsBackend,
        dataset,
        target_col,
        protected_col,
        &ZTestConfig::default(),
    )?;
    Ok((outcome.statistic, outcome.pvalue))
}

/// [`two_proportion_z_test`] with an explicit backend and options.
pub fn two_proportion_z_test_with<P: ZTestProvider + ?Sized>(
    provider: &P,
    dataset: &Dataset,
    target_col: &str,
    protected_col: &str,
    config: &ZTestConfig,
) -> Result<ZTestOutcome> {
    let (count, nobs) = proportion_counts(dataset, target_col, protected_col)?;
    debug!("two-proportion z-test: count = {:?}, nobs = {:?}", count, nobs);

    let outcome = provider.proportions_ztest(count, nobs, config)?;
    debug!(
        "two-proportion z-test: z = {}, Φ(z) = {}, p = {}",
        outcome.statistic,
        normal_cdf(outcome.statistic),
        outcome.pvalue
    );
    Ok(outcome)
}

// =============================================================================
// Tests
// =============================================================================
