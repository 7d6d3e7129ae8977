// =============================================================================
// Statistical Inference
// =============================================================================
//
// Helpers shared by every backend test:
//   - P-values: turn a z or t statistic into a tail probability
//   - Confidence intervals: range estimates for regression coefficients
//   - Significance stars for printed summaries
//
// FOR FAIRNESS ANALYSTS:
// ----------------------
// Every test in this crate asks the same question: "is the difference between
// the protected and the non-protected group larger than chance would explain?"
//
// The p-value answers it under the null hypothesis of no difference:
//   - p < 0.05 → the groups differ more than chance would usually produce
//   - p ≥ 0.05 → the data are compatible with equal treatment
//
// A non-significant result is NOT proof of fairness: small groups give
// tests with little power.
//
// =============================================================================

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

// =============================================================================
// Alternative Hypothesis
// =============================================================================

/// Direction of the alternative hypothesis.
///
/// The statistic is always oriented as "first group minus second group", so
/// `Greater` means the first group's mean/proportion/odds is larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    /// H₁: the groups differ in either direction.
    #[default]
    TwoSided,
    /// H₁: the first group is smaller.
    Less,
    /// H₁: the first group is larger.
    Greater,
}

// =============================================================================
// P-Value Calculation
// =============================================================================

fn standard_normal() -> Normal {
    // Parameters are constants, construction cannot fail.
    Normal::new(0.0, 1.0).unwrap()
}

/// Standard normal CDF Φ(z).
pub fn normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    standard_normal().cdf(z)
}

/// Calculate the p-value of a z-statistic.
///
/// # Arguments
/// * `z` - The z-statistic
/// * `alternative` - Which tail(s) count as "more extreme"
///
/// # Returns
/// P-value from the standard normal distribution. An infinite statistic
/// gives 0 or 1; NaN gives NaN.
pub fn pvalue_z(z: f64, alternative: Alternative) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }

    let normal = standard_normal();
    match alternative {
        // P(|Z| > |z|) = 2 * P(Z > |z|)
        Alternative::TwoSided => (2.0 * normal.sf(z.abs())).min(1.0),
        Alternative::Greater => normal.sf(z),
        Alternative::Less => normal.cdf(z),
    }
}

/// Calculate the p-value of a t-statistic.
///
/// Uses Student's t-distribution with `df` degrees of freedom. Welch's test
/// produces fractional degrees of freedom, which are handled exactly.
///
/// # Returns
/// P-value, or NaN when `t` is NaN or `df` is not positive.
pub fn pvalue_t(t: f64, df: f64, alternative: Alternative) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }

    if df.is_infinite() {
        return pvalue_z(t, alternative);
    }

    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return f64::NAN,
    };

    match alternative {
        Alternative::TwoSided => (2.0 * t_dist.sf(t.abs())).min(1.0),
        Alternative::Greater => t_dist.sf(t),
        Alternative::Less => t_dist.cdf(t),
    }
}

// =============================================================================
// Confidence Intervals
// =============================================================================

/// Calculate a confidence interval using the t-distribution.
///
/// # Arguments
/// * `estimate` - Point estimate (e.g. a regression coefficient)
/// * `std_error` - Standard error of the estimate
/// * `df` - Degrees of freedom
/// * `confidence` - Confidence level (e.g., 0.95 for 95% CI)
///
/// # Returns
/// (lower_bound, upper_bound), or a pair of NaN for invalid input
pub fn confidence_interval_t(
    estimate: f64,
    std_error: f64,
    df: f64,
    confidence: f64,
) -> (f64, f64) {
    if !estimate.is_finite()
        || !std_error.is_finite()
        || std_error <= 0.0
        || df <= 0.0
        || !(0.0..1.0).contains(&confidence)
    {
        return (f64::NAN, f64::NAN);
    }

    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return (f64::NAN, f64::NAN),
    };

    let alpha = 1.0 - confidence;
    let margin = t_dist.inverse_cdf(1.0 - alpha / 2.0) * std_error;
    (estimate - margin, estimate + margin)
}

// =============================================================================
// Significance Stars (for summary tables)
// =============================================================================

/// Get significance stars for a p-value.
///
/// - "***" : p < 0.001
/// - "**"  : p < 0.01
/// - "*"   : p < 0.05
/// - "."   : p < 0.1
/// - ""    : p >= 0.1 (or NaN)
pub fn significance_stars(pvalue: f64) -> &'static str {
    if pvalue < 0.001 {
        "***"
    } else if pvalue < 0.01 {
        "**"
    } else if pvalue < 0.05 {
        "*"
    } else if pvalue < 0.1 {
        "."
    } else {
        ""
    }
}

// =============================================================================
// Tests
// =============================================================================
