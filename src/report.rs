//! Pairwise comparison report
//!
//! The console table and the exported file carry the same cells: p-values
//! are formatted once, with the configured precision, and reused by both.

use crate::stats::PosthocResult;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Header shared by the console table and the export
pub const HEADER: [&str; 4] = ["A", "B", "p-value", "reject"];

/// One pair of classifiers and the post-hoc decision for it
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseComparison {
    pub a: String,
    pub b: String,
    pub pvalue: f64,
    pub reject: bool,
}

/// A formatted row, as printed and as exported
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct ReportRow {
    #[tabled(rename = "A")]
    pub a: String,
    #[tabled(rename = "B")]
    pub b: String,
    #[tabled(rename = "p-value")]
    pub pvalue: String,
    #[tabled(rename = "reject")]
    pub reject: String,
}

/// A row read back from an exported file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportedRow {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "p-value")]
    pub pvalue: f64,
    #[serde(rename = "reject", deserialize_with = "deserialize_flag")]
    pub reject: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_flag(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid flag '{}'", text)))
}

fn format_flag(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim() {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

/// Comparison records in pair order plus the formatting policy
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    comparisons: Vec<PairwiseComparison>,
    precision: usize,
}

impl ComparisonReport {
    pub fn new(comparisons: Vec<PairwiseComparison>, precision: usize) -> Self {
        Self {
            comparisons,
            precision,
        }
    }

    /// Attach display names to post-hoc results
    ///
    /// `names[i]` labels group `i` of the post-hoc input.
    pub fn from_posthoc(names: &[&str], posthoc: &PosthocResult, precision: usize) -> Self {
        let comparisons = posthoc
            .pairs
            .iter()
            .zip(posthoc.pvalues.iter().zip(&posthoc.reject))
            .map(|(&(i, j), (&pvalue, &reject))| PairwiseComparison {
                a: names[i].to_string(),
                b: names[j].to_string(),
                pvalue,
                reject,
            })
            .collect();
        Self::new(comparisons, precision)
    }

    pub fn comparisons(&self) -> &[PairwiseComparison] {
        &self.comparisons
    }

    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    /// Rows with p-values formatted to the report precision
    pub fn rows(&self) -> Vec<ReportRow> {
        self.comparisons
            .iter()
            .map(|c| ReportRow {
                a: c.a.clone(),
                b: c.b.clone(),
                pvalue: format!("{:.*}", self.precision, c.pvalue),
                reject: format_flag(c.reject).to_string(),
            })
            .collect()
    }

    /// Grid table with a header row
    pub fn render_grid(&self) -> String {
        Table::new(self.rows()).with(Style::ascii()).to_string()
    }

    /// Write the table as comma-separated text
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;

        writer.write_record(HEADER)?;
        for row in self.rows() {
            writer.write_record([&row.a, &row.b, &row.pvalue, &row.reject])?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;

        tracing::info!("Wrote {} comparisons to {}", self.len(), path.display());
        Ok(())
    }
}

/// Read an exported table back
pub fn read_export<P: AsRef<Path>>(path: P) -> Result<Vec<ExportedRow>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open export: {}", path.display()))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<ExportedRow>, _>>()
        .with_context(|| format!("Failed to parse export: {}", path.display()))
}
