use super::{Result, StatsError};

/// Sort data by value and return index-value pairs.
fn sort_indexed(data: &[f64]) -> Vec<(usize, f64)> {
    let mut indexed: Vec<(usize, f64)> = data.iter().cloned().enumerate().collect();
    indexed.sort_by(|a, b| a.1.total_cmp(&b.1));
    indexed
}

/// Find the end index of a tie group starting at `start`.
fn find_tie_group_end(indexed: &[(usize, f64)], start: usize) -> usize {
    let value = indexed[start].1;
    indexed[start..]
        .iter()
        .take_while(|(_, v)| *v == value)
        .count()
        + start
}

/// Ranks with average tie handling, plus the size of every tie group (> 1).
pub(crate) fn rank_with_ties(data: &[f64]) -> Result<(Vec<f64>, Vec<usize>)> {
    if data.is_empty() {
        return Err(StatsError::EmptyGroup(1));
    }

    let indexed = sort_indexed(data);
    let mut ranks = vec![0.0; data.len()];
    let mut tie_sizes = Vec::new();

    let mut i = 0;
    while i < indexed.len() {
        let j = find_tie_group_end(&indexed, i);
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for item in &indexed[i..j] {
            ranks[item.0] = avg_rank;
        }
        if j - i > 1 {
            tie_sizes.push(j - i);
        }
        i = j;
    }

    Ok((ranks, tie_sizes))
}

/// Compute 1-based ranks with ties receiving their average rank
pub fn rank(data: &[f64]) -> Result<Vec<f64>> {
    rank_with_ties(data).map(|(ranks, _)| ranks)
}

/// Tie correction factor: C = 1 - sum(t^3 - t) / (N^3 - N).
pub fn tie_correction(tie_sizes: &[usize], n: usize) -> f64 {
    let n = n as f64;
    if n < 2.0 {
        return 1.0;
    }
    let tie_sum: f64 = tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    1.0 - tie_sum / (n * n * n - n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_no_ties() {
        assert_eq!(rank(&[30.0, 10.0, 20.0]).unwrap(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_rank_with_ties() {
        let (ranks, ties) = rank_with_ties(&[1.0, 2.0, 2.0, 3.0]).unwrap();
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(ties, vec![2]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&[]).is_err());
    }

    #[test]
    fn test_tie_correction() {
        assert_eq!(tie_correction(&[], 6), 1.0);
        // one pair of ties in 4 values: 1 - 6/60
        assert!((tie_correction(&[2], 4) - 0.9).abs() < 1e-12);
        // everything tied
        assert_eq!(tie_correction(&[5], 5), 0.0);
    }
}
