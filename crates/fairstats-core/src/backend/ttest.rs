// =============================================================================
// Independent Two-Sample t-Test
// =============================================================================
//
// Compares the means of two independent groups:
//
//     t = (x̄₁ − x̄₂) / SE
//
// Two flavours, chosen by `TTestConfig::equal_var`:
//
//   Student (equal_var = true):
//       s²ₚ = (SS₁ + SS₂) / (n₁ + n₂ − 2)
//       SE  = sqrt(s²ₚ (1/n₁ + 1/n₂)),        df = n₁ + n₂ − 2
//
//   Welch (equal_var = false, the default):
//       qᵢ  = s²ᵢ / nᵢ
//       SE  = sqrt(q₁ + q₂)
//       df  = (q₁ + q₂)² / (q₁²/(n₁−1) + q₂²/(n₂−1))   (Welch–Satterthwaite)
//
// Missing values (NaN) propagate: any NaN in either group gives a NaN
// statistic and p-value, as scipy's default `nan_policy="propagate"` does.
//
// =============================================================================

use crate::error::{FairStatsError, Result};
use crate::inference::{pvalue_t, Alternative};

/// Options for the t-test.
#[derive(Debug, Clone)]
pub struct TTestConfig {
    /// Assume equal population variances (Student's test).
    /// Default: false (Welch's test)
    pub equal_var: bool,

    /// Alternative hypothesis.
    /// Default: two-sided
    pub alternative: Alternative,
}

impl Default for TTestConfig {
    fn default() -> Self {
        Self {
            equal_var: false,
            alternative: Alternative::TwoSided,
        }
    }
}

/// Result of a t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestOutcome {
    pub statistic: f64,
    pub pvalue: f64,
    /// Degrees of freedom (fractional for Welch)
    pub df: f64,
}

/// Mean and sum of squared deviations.
fn mean_and_ss(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss = values.iter().map(|&v| (v - mean).powi(2)).sum();
    (mean, ss)
}

pub(crate) fn ttest_ind(first: &[f64], second: &[f64], config: &TTestConfig) -> Result<TTestOutcome> {
    let (n1, n2) = (first.len(), second.len());
    if n1 == 0 || n2 == 0 {
        return Err(FairStatsError::InsufficientData(format!(
            "t-test needs two non-empty groups, got {} and {} observations",
            n1, n2
        )));
    }

    let (mean1, ss1) = mean_and_ss(first);
    let (mean2, ss2) = mean_and_ss(second);
    let (n1f, n2f) = (n1 as f64, n2 as f64);

    let (std_error, df) = if config.equal_var {
        if n1 + n2 < 3 {
            return Err(FairStatsError::InsufficientData(
                "pooled t-test needs at least 3 observations in total".to_string(),
            ));
        }
        let df = n1f + n2f - 2.0;
        let pooled_var = (ss1 + ss2) / df;
        ((pooled_var * (1.0 / n1f + 1.0 / n2f)).sqrt(), df)
    } else {
        if n1 < 2 || n2 < 2 {
            return Err(FairStatsError::InsufficientData(format!(
                "Welch's t-test needs at least 2 observations per group, got {} and {}",
                n1, n2
            )));
        }
        let q1 = ss1 / (n1f - 1.0) / n1f;
        let q2 = ss2 / (n2f - 1.0) / n2f;
        let df = (q1 + q2).powi(2) / (q1.powi(2) / (n1f - 1.0) + q2.powi(2) / (n2f - 1.0));
        ((q1 + q2).sqrt(), df)
    };

    if first.iter().chain(second).any(|v| v.is_nan()) {
        return Ok(TTestOutcome {
            statistic: f64::NAN,
            pvalue: f64::NAN,
            df,
        });
    }

    if !(std_error > 0.0) {
        return Err(FairStatsError::InsufficientData(
            "standard error is zero or undefined (no variation within groups)".to_string(),
        ));
    }

    let statistic = (mean1 - mean2) / std_error;
    Ok(TTestOutcome {
        statistic,
        pvalue: pvalue_t(statistic, df, config.alternative),
        df,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const FIRST: [f64; 5] = [3.1, 2.4, 4.8, 5.0, 3.9];
    const SECOND: [f64; 5] = [1.2, 2.2, 2.9, 1.8, 2.5];

    #[test]
    fn test_welch() {
        let r = ttest_ind(&FIRST, &SECOND, &TTestConfig::default()).unwrap();
        assert_abs_diff_eq!(r.statistic, 2.994135682438003, epsilon = 1e-10);
        assert_abs_diff_eq!(r.df, 6.489644577243456, epsilon = 1e-10);
        assert_abs_diff_eq!(r.pvalue, 0.022002456805449, epsilon = 1e-7);
    }

    #[test]
    fn test_student() {
        let config = TTestConfig {
            equal_var: true,
            ..TTestConfig::default()
        };
        let r = ttest_ind(&FIRST, &SECOND, &config).unwrap();
        // Equal group sizes: same statistic as Welch, different df
        assert_abs_diff_eq!(r.statistic, 2.994135682438003, epsilon = 1e-10);
        assert_eq!(r.df, 8.0);
        assert_abs_diff_eq!(r.pvalue, 0.017224976760334, epsilon = 1e-7);
    }

    #[test]
    fn test_statistic_sign_follows_group_order() {
        let forward = ttest_ind(&FIRST, &SECOND, &TTestConfig::default()).unwrap();
        let reverse = ttest_ind(&SECOND, &FIRST, &TTestConfig::default()).unwrap();
        assert_abs_diff_eq!(forward.statistic, -reverse.statistic, epsilon = 1e-12);
        assert_abs_diff_eq!(forward.pvalue, reverse.pvalue, epsilon = 1e-12);
    }

    #[test]
    fn test_one_sided() {
        let config = TTestConfig {
            alternative: Alternative::Greater,
            ..TTestConfig::default()
        };
        let r = ttest_ind(&FIRST, &SECOND, &config).unwrap();
        assert_abs_diff_eq!(r.pvalue, 0.022002456805449 / 2.0, epsilon = 1e-7);
    }

    #[test]
    fn test_empty_group() {
        let err = ttest_ind(&FIRST, &[], &TTestConfig::default()).unwrap_err();
        assert!(matches!(err, FairStatsError::InsufficientData(_)));
    }

    #[test]
    fn test_welch_needs_two_per_group() {
        let err = ttest_ind(&FIRST, &[1.0], &TTestConfig::default()).unwrap_err();
        assert!(matches!(err, FairStatsError::InsufficientData(_)));

        // Pooled variance still works with a single observation in one group
        let config = TTestConfig {
            equal_var: true,
            ..TTestConfig::default()
        };
        assert!(ttest_ind(&FIRST, &[1.0], &config).is_ok());
    }

    #[test]
    fn test_missing_value_propagates() {
        let r = ttest_ind(&[1.5, 3.0, 5.0], &[f64::NAN, 4.0, 2.0], &TTestConfig::default())
            .unwrap();
        assert!(r.statistic.is_nan());
        assert!(r.pvalue.is_nan());

        let config = TTestConfig {
            equal_var: true,
            ..TTestConfig::default()
        };
        let r = ttest_ind(&[1.5, 3.0, 5.0], &[f64::NAN, 4.0, 2.0], &config).unwrap();
        assert!(r.statistic.is_nan());
        assert!(r.pvalue.is_nan());
        assert_eq!(r.df, 4.0);
    }

    #[test]
    fn test_zero_variance() {
        let err = ttest_ind(&[1.0, 1.0], &[2.0, 2.0], &TTestConfig::default()).unwrap_err();
        assert!(matches!(err, FairStatsError::InsufficientData(_)));
    }
}
