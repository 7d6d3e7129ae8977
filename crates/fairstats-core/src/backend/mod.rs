// =============================================================================
// Statistical Backends
// =============================================================================
//
// The measures in `crate::measures` only PREPARE inputs: group vectors,
// success counts, a 2×2 table, a design matrix. The numbers themselves come
// from a backend implementing the capability traits below.
//
//   TTestProvider        - independent two-sample t-test (Student / Welch)
//   ZTestProvider        - two-proportion z-test
//   OlsProvider          - ordinary least squares fit
//   FisherExactProvider  - Fisher's exact test on a 2×2 table
//
// `StatrsBackend` implements all four on top of `statrs` (distributions,
// log-factorials) and `nalgebra` (decompositions). Tests of the measures
// substitute recording providers to check input preparation alone.
//
// =============================================================================

mod fisher;
mod ols;
mod ttest;
mod ztest;

pub use fisher::{ContingencyTable, FisherConfig, FisherOutcome};
pub use ols::{add_constant, OlsConfig, OlsFit};
pub use ttest::{TTestConfig, TTestOutcome};
pub use ztest::{ZTestConfig, ZTestOutcome};

use ndarray::{Array1, Array2};

use crate::error::Result;

// =============================================================================
// Capability Traits
// =============================================================================

/// Independent two-sample t-test.
pub trait TTestProvider {
    /// Test `first` against `second`; the statistic is mean(first) − mean(second).
    fn ttest_ind(&self, first: &[f64], second: &[f64], config: &TTestConfig)
        -> Result<TTestOutcome>;
}

/// Two-proportion z-test.
pub trait ZTestProvider {
    /// `count[i]` successes out of `nobs[i]` trials; the statistic compares
    /// proportion 0 against proportion 1.
    fn proportions_ztest(
        &self,
        count: [u64; 2],
        nobs: [u64; 2],
        config: &ZTestConfig,
    ) -> Result<ZTestOutcome>;
}

/// Ordinary least squares.
pub trait OlsProvider {
    /// Regress `y` on the columns of `x` (include an intercept column if wanted).
    fn ols(&self, y: &Array1<f64>, x: &Array2<f64>, config: &OlsConfig) -> Result<OlsFit>;
}

/// Fisher's exact test on a 2×2 contingency table.
pub trait FisherExactProvider {
    fn fisher_exact(&self, table: &ContingencyTable, config: &FisherConfig)
        -> Result<FisherOutcome>;
}

// =============================================================================
// Default Backend
// =============================================================================

/// Backend built on `statrs` and `nalgebra`. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsBackend;

impl TTestProvider for StatrsBackend {
    fn ttest_ind(
        &self,
        first: &[f64],
        second: &[f64],
        config: &TTestConfig,
    ) -> Result<TTestOutcome> {
        ttest::ttest_ind(first, second, config)
    }
}

impl ZTestProvider for StatrsBackend {
    fn proportions_ztest(
        &self,
        count: [u64; 2],
        nobs: [u64; 2],
        config: &ZTestConfig,
    ) -> Result<ZTestOutcome> {
        ztest::proportions_ztest(count, nobs, config)
    }
}

impl OlsProvider for StatrsBackend {
    fn ols(&self, y: &Array1<f64>, x: &Array2<f64>, config: &OlsConfig) -> Result<OlsFit> {
        ols::fit_ols(y, x, config)
    }
}

impl FisherExactProvider for StatrsBackend {
    fn fisher_exact(
        &self,
        table: &ContingencyTable,
        config: &FisherConfig,
    ) -> Result<FisherOutcome> {
        fisher::fisher_exact(table, config)
    }
}
