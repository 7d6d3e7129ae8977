// =============================================================================
// Fisher's Exact Test (2×2)
// =============================================================================
//
//                 accepted   rejected
//   protected   |    a     |    b     |
//   non-prot.   |    c     |    d     |
//
// With all margins fixed, cell `a` follows a hypergeometric distribution:
//
//     P(a) = C(a+b, a) · C(c+d, c) / C(n, a+c)
//
// The two-sided p-value sums P(k) over every admissible k whose probability
// does not exceed P(observed), with a relative tolerance of 1e-7 so that
// tables tied with the observed one are not lost to rounding.
//
// The sample odds ratio is a·d / (b·c), infinite when b·c = 0.
//
// =============================================================================

use statrs::function::factorial::ln_factorial;

use crate::error::Result;
use crate::inference::Alternative;

/// Rows = (protected, non-protected), columns = (accepted, rejected).
pub type ContingencyTable = [[u64; 2]; 2];

/// Probabilities within this relative distance of P(observed) count as ties.
const RELATIVE_TIE_TOLERANCE: f64 = 1e-7;

/// Options for Fisher's exact test.
#[derive(Debug, Clone, Default)]
pub struct FisherConfig {
    /// Alternative hypothesis on the odds ratio.
    /// `Greater`: odds of acceptance higher in the first row.
    /// Default: two-sided
    pub alternative: Alternative,
}

/// Result of Fisher's exact test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisherOutcome {
    pub odds_ratio: f64,
    pub pvalue: f64,
}

fn ln_choose(n: u64, k: u64) -> f64 {
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}

pub(crate) fn fisher_exact(table: &ContingencyTable, config: &FisherConfig) -> Result<FisherOutcome> {
    let [[a, b], [c, d]] = *table;
    let row1 = a + b;
    let row2 = c + d;
    let col1 = a + c;
    let col2 = b + d;
    let n = row1 + row2;

    // An empty row or column leaves nothing to test.
    if row1 == 0 || row2 == 0 || col1 == 0 || col2 == 0 {
        return Ok(FisherOutcome {
            odds_ratio: f64::NAN,
            pvalue: 1.0,
        });
    }

    let odds_ratio = if b > 0 && c > 0 {
        (a as f64 * d as f64) / (b as f64 * c as f64)
    } else {
        f64::INFINITY
    };

    let ln_denominator = ln_choose(n, col1);
    let pmf = |k: u64| (ln_choose(row1, k) + ln_choose(row2, col1 - k) - ln_denominator).exp();

    // Admissible values of the top-left cell
    let lower = col1.saturating_sub(row2);
    let upper = row1.min(col1);

    let pvalue = match config.alternative {
        Alternative::Less => (lower..=a).map(pmf).sum::<f64>(),
        Alternative::Greater => (a..=upper).map(pmf).sum::<f64>(),
        Alternative::TwoSided => {
            let threshold = pmf(a) * (1.0 + RELATIVE_TIE_TOLERANCE);
            (lower..=upper).map(pmf).filter(|&p| p <= threshold).sum::<f64>()
        }
    };

    Ok(FisherOutcome {
        odds_ratio,
        pvalue: pvalue.min(1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_sided(table: ContingencyTable) -> FisherOutcome {
        fisher_exact(&table, &FisherConfig::default()).unwrap()
    }

    #[test]
    fn test_tea_tasting() {
        let r = two_sided([[3, 1], [1, 3]]);
        assert_abs_diff_eq!(r.odds_ratio, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.pvalue, 0.485714285714286, epsilon = 1e-10);
    }

    #[test]
    fn test_skewed_table() {
        let r = two_sided([[8, 2], [1, 5]]);
        assert_abs_diff_eq!(r.odds_ratio, 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.pvalue, 0.034965034965035, epsilon = 1e-10);
    }

    #[test]
    fn test_one_sided() {
        let greater = fisher_exact(
            &[[8, 2], [1, 5]],
            &FisherConfig {
                alternative: Alternative::Greater,
            },
        )
        .unwrap();
        assert_abs_diff_eq!(greater.pvalue, 0.024475524475524, epsilon = 1e-10);

        let less = fisher_exact(
            &[[8, 2], [1, 5]],
            &FisherConfig {
                alternative: Alternative::Less,
            },
        )
        .unwrap();
        assert_abs_diff_eq!(less.pvalue, 0.999125874125874, epsilon = 1e-10);
    }

    #[test]
    fn test_infinite_and_zero_odds() {
        assert_eq!(two_sided([[4, 0], [2, 3]]).odds_ratio, f64::INFINITY);
        assert_eq!(two_sided([[0, 4], [2, 3]]).odds_ratio, 0.0);
    }

    #[test]
    fn test_empty_margin() {
        let r = two_sided([[0, 0], [2, 3]]);
        assert!(r.odds_ratio.is_nan());
        assert_eq!(r.pvalue, 1.0);

        let r = two_sided([[5, 0], [2, 0]]);
        assert!(r.odds_ratio.is_nan());
        assert_eq!(r.pvalue, 1.0);
    }

    #[test]
    fn test_independent_table_is_not_significant() {
        let r = two_sided([[5, 5], [5, 5]]);
        assert_abs_diff_eq!(r.odds_ratio, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.pvalue, 1.0, epsilon = 1e-9);
    }
}
