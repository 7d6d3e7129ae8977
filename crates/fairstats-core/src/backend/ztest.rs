// =============================================================================
// Two-Proportion z-Test
// =============================================================================
//
// Compares success rates p̂ᵢ = countᵢ / nobsᵢ of two groups:
//
//     z = (p̂₀ − p̂₁ − value) / sqrt(p̄ (1 − p̄) (1/n₀ + 1/n₁))
//
// where p̄ is the pooled proportion (count₀ + count₁) / (n₀ + n₁), or the
// fixed `prop_var` when one is configured.
//
// A pooled proportion of exactly 0 or 1 (every row a success, or none) has
// zero variance. The difference is then zero as well and the test reports
// z = 0, p = 1: there is no evidence of a difference.
//
// =============================================================================

use crate::error::{FairStatsError, Result};
use crate::inference::{pvalue_z, Alternative};

/// Options for the two-proportion z-test.
#[derive(Debug, Clone)]
pub struct ZTestConfig {
    /// Difference p̂₀ − p̂₁ under the null hypothesis.
    /// Default: 0.0
    pub value: f64,

    /// Alternative hypothesis.
    /// Default: two-sided
    pub alternative: Alternative,

    /// Use this proportion in the variance instead of the pooled estimate.
    /// Default: None
    pub prop_var: Option<f64>,
}

impl Default for ZTestConfig {
    fn default() -> Self {
        Self {
            value: 0.0,
            alternative: Alternative::TwoSided,
            prop_var: None,
        }
    }
}

/// Result of a two-proportion z-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZTestOutcome {
    pub statistic: f64,
    pub pvalue: f64,
}

pub(crate) fn proportions_ztest(
    count: [u64; 2],
    nobs: [u64; 2],
    config: &ZTestConfig,
) -> Result<ZTestOutcome> {
    if nobs[0] == 0 || nobs[1] == 0 {
        return Err(FairStatsError::InsufficientData(format!(
            "z-test needs observations in both groups, got {} and {}",
            nobs[0], nobs[1]
        )));
    }
    if count[0] > nobs[0] || count[1] > nobs[1] {
        return Err(FairStatsError::InvalidValue(format!(
            "success counts {:?} exceed observation counts {:?}",
            count, nobs
        )));
    }
    if let Some(p) = config.prop_var {
        if !(0.0..=1.0).contains(&p) {
            return Err(FairStatsError::InvalidValue(format!(
                "prop_var must lie in [0, 1], got {}",
                p
            )));
        }
    }

    let (c0, c1) = (count[0] as f64, count[1] as f64);
    let (n0, n1) = (nobs[0] as f64, nobs[1] as f64);

    let diff = c0 / n0 - c1 / n1 - config.value;
    let pooled = config.prop_var.unwrap_or((c0 + c1) / (n0 + n1));
    let std_diff = (pooled * (1.0 - pooled) * (1.0 / n0 + 1.0 / n1)).sqrt();

    let statistic = if std_diff > 0.0 {
        diff / std_diff
    } else if diff == 0.0 {
        0.0
    } else {
        diff.signum() * f64::INFINITY
    };

    Ok(ZTestOutcome {
        statistic,
        pvalue: pvalue_z(statistic, config.alternative),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_known_values() {
        let r = proportions_ztest([30, 45], [100, 100], &ZTestConfig::default()).unwrap();
        assert_abs_diff_eq!(r.statistic, -2.190890230020664, epsilon = 1e-10);
        assert_abs_diff_eq!(r.pvalue, 0.028459736916311, epsilon = 1e-9);
    }

    #[test]
    fn test_one_sided() {
        let config = ZTestConfig {
            alternative: Alternative::Greater,
            ..ZTestConfig::default()
        };
        let r = proportions_ztest([30, 45], [100, 100], &config).unwrap();
        assert_abs_diff_eq!(r.pvalue, 0.985770131541845, epsilon = 1e-9);
    }

    #[test]
    fn test_all_successes_is_no_difference() {
        let r = proportions_ztest([2, 6], [2, 6], &ZTestConfig::default()).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert_eq!(r.pvalue, 1.0);
    }

    #[test]
    fn test_nonzero_null_with_degenerate_variance() {
        let config = ZTestConfig {
            value: 0.1,
            ..ZTestConfig::default()
        };
        let r = proportions_ztest([0, 0], [5, 5], &config).unwrap();
        assert_eq!(r.statistic, f64::NEG_INFINITY);
        assert_eq!(r.pvalue, 0.0);
    }

    #[test]
    fn test_fixed_variance_proportion() {
        let config = ZTestConfig {
            prop_var: Some(0.5),
            ..ZTestConfig::default()
        };
        let r = proportions_ztest([30, 45], [100, 100], &config).unwrap();
        // sqrt(0.25 * 0.02) = 0.0707...
        assert_abs_diff_eq!(r.statistic, -0.15 / (0.005f64).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_group() {
        let err = proportions_ztest([0, 3], [0, 5], &ZTestConfig::default()).unwrap_err();
        assert!(matches!(err, FairStatsError::InsufficientData(_)));
    }

    #[test]
    fn test_invalid_inputs() {
        let err = proportions_ztest([6, 3], [5, 5], &ZTestConfig::default()).unwrap_err();
        assert!(matches!(err, FairStatsError::InvalidValue(_)));

        let config = ZTestConfig {
            prop_var: Some(1.5),
            ..ZTestConfig::default()
        };
        let err = proportions_ztest([1, 3], [5, 5], &config).unwrap_err();
        assert!(matches!(err, FairStatsError::InvalidValue(_)));
    }
}
