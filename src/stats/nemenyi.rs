// Kruskal-Wallis omnibus test with Nemenyi pairwise comparisons
//
// All observations are ranked together (average ranks for ties). For each
// pair of groups the absolute difference of mean ranks is standardized:
//   Q = |R̄i - R̄j| / sqrt(C · N(N+1)/12 · (1/ni + 1/nj))
// with C the tie correction. The family-wise corrected p-value is then
// either the studentized range tail at Q·√2 (k groups, df = ∞) or the
// chi-squared tail at Q² with k - 1 degrees of freedom.

use super::ranks::{rank_with_ties, tie_correction};
use super::studentized_range::studentized_range_sf;
use super::{validate_groups, Result, StatsError};
use crate::config::PosthocMethod;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt;

/// Groups smaller than this make the chi-squared approximation unreliable
const MIN_RECOMMENDED_GROUP_SIZE: usize = 5;

/// Result of Kruskal-Wallis test
#[derive(Debug, Clone, PartialEq)]
pub struct KruskalResult {
    /// The H statistic (chi-squared approximation), tie-corrected
    pub statistic: f64,
    /// Degrees of freedom (k-1)
    pub df: f64,
    /// The p-value
    pub pvalue: f64,
}

/// Pairwise post-hoc comparisons, parallel vectors indexed like `pairs`
#[derive(Debug, Clone, PartialEq)]
pub struct PosthocResult {
    /// Omnibus test the comparisons are built on
    pub kruskal: KruskalResult,
    /// Group index pairs in lexicographic order
    pub pairs: Vec<(usize, usize)>,
    /// Standardized mean-rank differences
    pub statistics: Vec<f64>,
    /// Family-wise corrected p-values
    pub pvalues: Vec<f64>,
    /// `pvalue <= alpha`
    pub reject: Vec<bool>,
    pub alpha: f64,
    pub method: PosthocMethod,
}

impl PosthocResult {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for PosthocResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pvalues: Vec<String> = self.pvalues.iter().map(|p| format!("{:.6}", p)).collect();
        let reject: Vec<&str> = self
            .reject
            .iter()
            .map(|&r| if r { "True" } else { "False" })
            .collect();
        write!(
            f,
            "Kruskal-Wallis H={:.6} (df={}), p={:.6}; corrected p-values [{}]; reject [{}]",
            self.kruskal.statistic,
            self.kruskal.df,
            self.kruskal.pvalue,
            pvalues.join(", "),
            reject.join(", ")
        )
    }
}

/// All unordered index pairs of `0..k` in lexicographic order
pub fn pair_indices(k: usize) -> Vec<(usize, usize)> {
    (0..k)
        .flat_map(|i| (i + 1..k).map(move |j| (i, j)))
        .collect()
}

/// Pooled ranks split back into per-group mean ranks
struct RankSummary {
    sizes: Vec<usize>,
    n_total: usize,
    mean_ranks: Vec<f64>,
    rank_sums: Vec<f64>,
    correction: f64,
}

fn summarize_ranks(groups: &[&[f64]]) -> Result<RankSummary> {
    let (sizes, n_total) = validate_groups(groups)?;

    let combined: Vec<f64> = groups.iter().flat_map(|g| g.iter().cloned()).collect();
    let (ranks, tie_sizes) = rank_with_ties(&combined)?;

    let correction = tie_correction(&tie_sizes, n_total);
    if correction <= 0.0 {
        return Err(StatsError::AllIdentical);
    }

    let mut rank_sums = Vec::with_capacity(sizes.len());
    let mut idx = 0;
    for &size in &sizes {
        rank_sums.push(ranks[idx..idx + size].iter().sum::<f64>());
        idx += size;
    }
    let mean_ranks = rank_sums
        .iter()
        .zip(&sizes)
        .map(|(&sum, &n)| sum / n as f64)
        .collect();

    Ok(RankSummary {
        sizes,
        n_total,
        mean_ranks,
        rank_sums,
        correction,
    })
}

fn chi_squared(df: f64) -> Result<ChiSquared> {
    ChiSquared::new(df).map_err(|e| StatsError::Distribution(e.to_string()))
}

fn kruskal_from_ranks(summary: &RankSummary) -> Result<KruskalResult> {
    let n = summary.n_total as f64;
    let sum_term: f64 = summary
        .rank_sums
        .iter()
        .zip(&summary.sizes)
        .map(|(&r_sum, &n_i)| r_sum * r_sum / n_i as f64)
        .sum();
    let h_uncorrected = (12.0 / (n * (n + 1.0))) * sum_term - 3.0 * (n + 1.0);
    let statistic = h_uncorrected / summary.correction;

    let df = (summary.sizes.len() - 1) as f64;
    let pvalue = chi_squared(df)?.sf(statistic);

    Ok(KruskalResult {
        statistic,
        df,
        pvalue,
    })
}

/// Perform Kruskal-Wallis H test for comparing multiple independent groups.
///
/// This is the nonparametric equivalent of one-way ANOVA.
pub fn kruskal_wallis(groups: &[&[f64]]) -> Result<KruskalResult> {
    kruskal_from_ranks(&summarize_ranks(groups)?)
}

/// Nemenyi post-hoc comparison of every pair of groups
///
/// # Example
/// ```
/// use arff_anova::config::PosthocMethod;
/// use arff_anova::stats::nemenyi;
///
/// let x = [80.0, 82.0, 78.0];
/// let y = [90.0, 91.0, 89.0];
/// let result = nemenyi(&[&x, &y], 0.05, PosthocMethod::Tukey).unwrap();
/// assert_eq!(result.pairs, vec![(0, 1)]);
/// assert!(result.reject[0]);
/// ```
pub fn nemenyi(groups: &[&[f64]], alpha: f64, method: PosthocMethod) -> Result<PosthocResult> {
    let summary = summarize_ranks(groups)?;
    let kruskal = kruskal_from_ranks(&summary)?;
    let k = summary.sizes.len();
    let n = summary.n_total as f64;

    if summary
        .sizes
        .iter()
        .any(|&size| size < MIN_RECOMMENDED_GROUP_SIZE)
    {
        tracing::warn!(
            "Sample sizes < {} are not recommended (K-W test assumes a chi square distribution)",
            MIN_RECOMMENDED_GROUP_SIZE
        );
    }

    let chi = match method {
        PosthocMethod::Chisq => Some(chi_squared((k - 1) as f64)?),
        PosthocMethod::Tukey => None,
    };

    let pairs = pair_indices(k);
    let mut statistics = Vec::with_capacity(pairs.len());
    let mut pvalues = Vec::with_capacity(pairs.len());
    let mut reject = Vec::with_capacity(pairs.len());

    for &(i, j) in &pairs {
        let (ni, nj) = (summary.sizes[i] as f64, summary.sizes[j] as f64);
        let se = (summary.correction * n * (n + 1.0) / 12.0 * (1.0 / ni + 1.0 / nj)).sqrt();
        let q = (summary.mean_ranks[i] - summary.mean_ranks[j]).abs() / se;

        let p = match &chi {
            Some(dist) => dist.sf(q * q),
            None => studentized_range_sf(q * std::f64::consts::SQRT_2, k),
        };

        tracing::debug!(i, j, q, p, "nemenyi pair");
        statistics.push(q);
        pvalues.push(p);
        reject.push(p <= alpha);
    }

    Ok(PosthocResult {
        kruskal,
        pairs,
        statistics,
        pvalues,
        reject,
        alpha,
        method,
    })
}
