//! End-to-end analysis: load → select → aggregate → test → report
//!
//! The parse step is the only guarded boundary: a malformed file prints a
//! diagnostic with a remediation hint and ends the run without a report.
//! Every other failure is returned to the caller.

use crate::aggregate::{GroupSummary, ResultMap};
use crate::arff::{self, Dataset};
use crate::config::AnalysisConfig;
use crate::report::ComparisonReport;
use crate::selection::{self, SelectionSource};
use crate::stats::{self, AnovaResult, PosthocResult};
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// What to analyze and where to put the export
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Strip commas from the dataset literal before parsing
    pub repair: bool,
}

/// Everything computed by a completed run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub selected: Vec<usize>,
    pub summaries: Vec<GroupSummary>,
    pub anova: AnovaResult,
    pub posthoc: PosthocResult,
    pub comparisons: ComparisonReport,
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum Outcome {
    Completed(Box<AnalysisReport>),
    /// The input could not be parsed; a diagnostic was printed
    ParseFailed,
}

/// Read the input file, decoding lossily if it is not valid UTF-8
fn read_input(request: &AnalysisRequest) -> Result<String> {
    let bytes = fs::read(&request.input)
        .with_context(|| format!("Failed to read input file: {}", request.input.display()))?;
    Ok(match String::from_utf8_lossy(&bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            tracing::warn!(
                "{} is not valid UTF-8; invalid bytes were replaced",
                request.input.display()
            );
            text
        }
    })
}

fn print_parse_failure<W: Write>(out: &mut W, error: &arff::ArffError) -> Result<()> {
    let rule = "*".repeat(20);
    writeln!(out, "{}", rule)?;
    writeln!(out, "Failed to parse input: {}", error)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "POSSIBLE SOLUTION: try running with -f")?;
    writeln!(out, "arff-anova input_file -f")?;
    writeln!(out, "{}", rule)?;
    Ok(())
}

/// Load and parse, applying the comma repair when requested
fn load(
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<std::result::Result<Dataset, arff::ArffError>> {
    let mut text = read_input(request)?;
    if request.repair {
        let repair = arff::repair_dataset_commas(&text, &config.dataset_attribute);
        if repair.replaced > 0 {
            text = repair.text;
        }
    }
    Ok(arff::parse(&text))
}

/// Run one analysis, writing the console report to `out`
pub fn run<S, W>(
    config: &AnalysisConfig,
    request: &AnalysisRequest,
    source: &mut S,
    out: &mut W,
) -> Result<Outcome>
where
    S: SelectionSource + ?Sized,
    W: Write,
{
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let dataset = match load(request, config)? {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::error!("Parsing {} failed: {}", request.input.display(), e);
            print_parse_failure(out, &e)?;
            return Ok(Outcome::ParseFailed);
        }
    };

    let selected = selection::select_attributes(&dataset, source, out)?;
    let columns = selection::locate_columns(&dataset, config)?;

    let results = ResultMap::from_dataset(&dataset, columns)?;
    for line in results.summary_lines() {
        writeln!(out, "{}", line)?;
    }

    let groups = results.score_slices();
    let anova = stats::one_way_anova(&groups).context("ANOVA failed")?;
    writeln!(out, "anova {}", anova)?;

    let posthoc =
        stats::nemenyi(&groups, config.alpha, config.method).context("Post-hoc test failed")?;
    writeln!(out, "{}", posthoc)?;

    let comparisons =
        ComparisonReport::from_posthoc(&results.display_names(), &posthoc, config.precision);
    writeln!(out, "results")?;
    writeln!(out, "{}", comparisons.render_grid())?;

    if let Some(path) = &request.output {
        comparisons.write_csv(path)?;
    }

    Ok(Outcome::Completed(Box::new(AnalysisReport {
        selected,
        summaries: results.summaries(),
        anova,
        posthoc,
        comparisons,
    })))
}
