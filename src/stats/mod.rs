// Hypothesis tests for comparing classifier accuracy groups
//
// Two stages, run on the same groups:
// - one-way ANOVA (F-test) on the raw accuracies
// - Kruskal-Wallis omnibus on pooled ranks followed by Nemenyi pairwise
//   comparisons with a family-wise p-value correction
//
// Distributions come from statrs. The studentized range CDF is not in statrs
// and is integrated numerically for the infinite-df case Nemenyi needs.
//
// Reference:
// Demšar, J. (2006). Statistical comparisons of classifiers over multiple
//     data sets. JMLR 7, 1-30.

mod anova;
mod nemenyi;
mod ranks;
mod studentized_range;

pub use anova::{one_way_anova, AnovaResult};
pub use nemenyi::{kruskal_wallis, nemenyi, pair_indices, KruskalResult, PosthocResult};
pub use ranks::{rank, tie_correction};
pub use studentized_range::studentized_range_sf;

use thiserror::Error;

/// Numerical degeneracies detected before any statistic is computed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("need at least 2 classifiers to compare, found {0}")]
    TooFewGroups(usize),

    #[error("classifier group {0} has no observations")]
    EmptyGroup(usize),

    #[error("not enough observations: {observations} values across {groups} groups leave no within-group degrees of freedom")]
    NoWithinDegreesOfFreedom { observations: usize, groups: usize },

    #[error("all observations are identical; the test statistic is undefined")]
    AllIdentical,

    #[error("observation {0} is not a finite number")]
    NonFinite(usize),

    #[error("distribution error: {0}")]
    Distribution(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;

/// Shared input checks: k >= 2, no empty group, finite values
///
/// Returns the group sizes and the total number of observations.
pub(crate) fn validate_groups(groups: &[&[f64]]) -> Result<(Vec<usize>, usize)> {
    if groups.len() < 2 {
        return Err(StatsError::TooFewGroups(groups.len()));
    }

    let mut sizes = Vec::with_capacity(groups.len());
    let mut position = 0;
    for (i, group) in groups.iter().enumerate() {
        if group.is_empty() {
            return Err(StatsError::EmptyGroup(i + 1));
        }
        for value in group.iter() {
            position += 1;
            if !value.is_finite() {
                return Err(StatsError::NonFinite(position));
            }
        }
        sizes.push(group.len());
    }

    Ok((sizes, position))
}
