//! Attribute listing, operator selection and required-column lookup
//!
//! The selection is echoed back but does not narrow the analysis: the
//! classifier and accuracy columns are always located by name.

use crate::arff::Dataset;
use crate::config::AnalysisConfig;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not an attribute number")]
    InvalidIndex(String),

    #[error("attribute number {index} is out of range (1-{count})")]
    OutOfRange { index: usize, count: usize },

    #[error("required attribute '{0}' not found in input file")]
    MissingAttribute(String),
}

/// Where the operator's selection line comes from
pub trait SelectionSource {
    /// Return one line of comma-separated 1-based attribute numbers
    fn read_selection(&mut self) -> io::Result<String>;
}

/// Reads the selection from any buffered reader (stdin in the binary)
pub struct LineSource<R> {
    reader: R,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> SelectionSource for LineSource<R> {
    fn read_selection(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line)
    }
}

/// Selection supplied up front (`--select`), no prompt needed
#[derive(Debug, Clone)]
pub struct FixedSelection(pub String);

impl SelectionSource for FixedSelection {
    fn read_selection(&mut self) -> io::Result<String> {
        Ok(self.0.clone())
    }
}

/// Column indices the analysis depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumns {
    pub scheme: usize,
    pub accuracy: usize,
}

/// Parse "1, 2, 8" into zero-based attribute indices
///
/// An empty line selects nothing.
pub fn parse_selection(line: &str, attribute_count: usize) -> Result<Vec<usize>, SelectionError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }

    line.split(',')
        .map(|part| {
            let part = part.trim();
            let index: usize = part
                .parse()
                .map_err(|_| SelectionError::InvalidIndex(part.to_string()))?;
            if index == 0 || index > attribute_count {
                return Err(SelectionError::OutOfRange {
                    index,
                    count: attribute_count,
                });
            }
            Ok(index - 1)
        })
        .collect()
}

/// List attributes, read the operator's choice and echo it
///
/// Returns the zero-based indices of the selected attributes.
pub fn select_attributes<S, W>(
    dataset: &Dataset,
    source: &mut S,
    out: &mut W,
) -> anyhow::Result<Vec<usize>>
where
    S: SelectionSource + ?Sized,
    W: Write,
{
    writeln!(out, "{}", "-".repeat(10))?;
    writeln!(out, "Attributes:")?;
    writeln!(out, "Select one or more (i.e. 1, 2, 8)")?;
    for (i, name) in dataset.attribute_names().enumerate() {
        writeln!(out, "{}. {}", i + 1, name)?;
    }
    write!(out, "> ")?;
    out.flush()?;

    let line = source.read_selection()?;
    let selected = parse_selection(&line, dataset.attributes.len())?;

    writeln!(out, "selected: ")?;
    for &index in &selected {
        writeln!(out, "\t- {}", dataset.attributes[index].name)?;
    }
    writeln!(out, "{}", "-".repeat(10))?;

    tracing::debug!(?selected, "attribute selection");
    Ok(selected)
}

/// Locate the classifier and accuracy columns by exact name
pub fn locate_columns(
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> Result<RequiredColumns, SelectionError> {
    let find = |name: &str| {
        dataset
            .attribute_index(name)
            .ok_or_else(|| SelectionError::MissingAttribute(name.to_string()))
    };

    Ok(RequiredColumns {
        scheme: find(&config.scheme_attribute)?,
        accuracy: find(&config.accuracy_attribute)?,
    })
}
