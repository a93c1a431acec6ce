// One-way ANOVA across k independent groups
//
// F = (SS_between / (k - 1)) / (SS_within / (N - k))
// p = P(F(k - 1, N - k) >= F)

use super::{validate_groups, Result, StatsError};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::fmt;

/// Result of a one-way ANOVA
#[derive(Debug, Clone, PartialEq)]
pub struct AnovaResult {
    /// F statistic (infinite when within-group variance is zero)
    pub statistic: f64,
    /// Probability of an F at least this large under equal means
    pub pvalue: f64,
    /// Between-groups degrees of freedom (k - 1)
    pub df_between: f64,
    /// Within-groups degrees of freedom (N - k)
    pub df_within: f64,
    pub ss_between: f64,
    pub ss_within: f64,
}

impl fmt::Display for AnovaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "F_onewayResult(statistic={}, pvalue={})",
            self.statistic, self.pvalue
        )
    }
}

/// Test whether all group means are equal
///
/// # Example
/// ```
/// use arff_anova::stats::one_way_anova;
///
/// let x = [80.0, 82.0, 78.0];
/// let y = [90.0, 91.0, 89.0];
/// let result = one_way_anova(&[&x, &y]).unwrap();
/// assert!((result.statistic - 60.0).abs() < 1e-9);
/// assert!(result.pvalue < 0.05);
/// ```
pub fn one_way_anova(groups: &[&[f64]]) -> Result<AnovaResult> {
    let (sizes, n_total) = validate_groups(groups)?;
    let k = groups.len();

    if n_total <= k {
        return Err(StatsError::NoWithinDegreesOfFreedom {
            observations: n_total,
            groups: k,
        });
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for (group, &n) in groups.iter().zip(&sizes) {
        let mean = group.iter().sum::<f64>() / n as f64;
        ss_between += n as f64 * (mean - grand_mean).powi(2);
        ss_within += group.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;

    let (statistic, pvalue) = if ss_within == 0.0 {
        if ss_between == 0.0 {
            return Err(StatsError::AllIdentical);
        }
        tracing::warn!("Zero within-group variance; F statistic is infinite");
        (f64::INFINITY, 0.0)
    } else {
        let statistic = (ss_between / df_between) / (ss_within / df_within);
        let f_dist = FisherSnedecor::new(df_between, df_within)
            .map_err(|e| StatsError::Distribution(e.to_string()))?;
        (statistic, f_dist.sf(statistic))
    };

    Ok(AnovaResult {
        statistic,
        pvalue,
        df_between,
        df_within,
        ss_between,
        ss_within,
    })
}
