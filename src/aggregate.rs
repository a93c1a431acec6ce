//! Grouping of accuracy scores by classifier
//!
//! Groups keep the order in which a classifier first appears in the file.
//! That order only affects display; the statistics are order-independent.

use crate::arff::Dataset;
use crate::selection::RequiredColumns;
use statrs::statistics::Statistics;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("row {row}: classifier name is not a text value ('{value}')")]
    NonTextScheme { row: usize, value: String },

    #[error("row {row}: accuracy is not numeric ('{value}')")]
    NonNumericScore { row: usize, value: String },
}

/// All scores recorded for one classifier
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierGroup {
    /// Full classifier key, e.g. `weka.classifiers.trees.J48`
    pub key: String,
    pub scores: Vec<f64>,
}

impl ClassifierGroup {
    /// Last dot-separated component of the key
    pub fn display_name(&self) -> &str {
        display_name(&self.key)
    }

    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            name: self.display_name().to_string(),
            count: self.scores.len(),
            mean: self.scores.iter().mean(),
            std_dev: self.scores.iter().population_std_dev(),
        }
    }
}

/// Descriptive statistics for one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divide by n)
    pub std_dev: f64,
}

/// Classifier → scores, in first-appearance order
#[derive(Debug, Clone, Default)]
pub struct ResultMap {
    groups: Vec<ClassifierGroup>,
    index: HashMap<String, usize>,
    skipped: usize,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one score under `key`
    pub fn record(&mut self, key: &str, score: f64) {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.groups.push(ClassifierGroup {
                    key: key.to_string(),
                    scores: Vec::new(),
                });
                self.index.insert(key.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[slot].scores.push(score);
    }

    /// Group every row's accuracy under its classifier key
    ///
    /// Rows with a missing key or score are skipped and counted.
    pub fn from_dataset(dataset: &Dataset, columns: RequiredColumns) -> Result<Self, AggregateError> {
        let mut results = Self::new();

        for (i, row) in dataset.rows.iter().enumerate() {
            let scheme = &row[columns.scheme];
            let score = &row[columns.accuracy];

            if scheme.is_missing() || score.is_missing() {
                tracing::warn!("Skipping row {}: missing classifier or accuracy", i + 1);
                results.skipped += 1;
                continue;
            }

            let key = scheme.as_str().ok_or_else(|| AggregateError::NonTextScheme {
                row: i + 1,
                value: scheme.to_string(),
            })?;
            let value = score.as_f64().ok_or_else(|| AggregateError::NonNumericScore {
                row: i + 1,
                value: score.to_string(),
            })?;

            results.record(key, value);
        }

        tracing::debug!(
            groups = results.len(),
            observations = results.total_observations(),
            skipped = results.skipped,
            "aggregated scores"
        );

        Ok(results)
    }

    pub fn groups(&self) -> &[ClassifierGroup] {
        &self.groups
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.index
            .get(key)
            .map(|&slot| self.groups[slot].scores.as_slice())
    }

    /// Number of classifiers
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_observations(&self) -> usize {
        self.groups.iter().map(|g| g.scores.len()).sum()
    }

    /// Rows dropped for a missing key or score
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Scores as borrowed slices, in group order
    pub fn score_slices(&self) -> Vec<&[f64]> {
        self.groups.iter().map(|g| g.scores.as_slice()).collect()
    }

    pub fn display_names(&self) -> Vec<&str> {
        self.groups.iter().map(ClassifierGroup::display_name).collect()
    }

    pub fn summaries(&self) -> Vec<GroupSummary> {
        self.groups.iter().map(ClassifierGroup::summary).collect()
    }

    /// `name : mean (std)` lines, names padded to the longest one
    pub fn summary_lines(&self) -> Vec<String> {
        let summaries = self.summaries();
        let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
        summaries
            .iter()
            .map(|s| {
                format!(
                    "{:<width$} : {:>6.2} ({:>6.3})",
                    s.name,
                    s.mean,
                    s.std_dev,
                    width = width
                )
            })
            .collect()
    }
}

/// Last dot-separated component of a classifier key
pub fn display_name(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}
