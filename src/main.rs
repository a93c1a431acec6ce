use anyhow::Result;
use arff_anova::cli::Cli;
use arff_anova::config::AnalysisConfig;
use arff_anova::pipeline::{self, AnalysisRequest, Outcome};
use arff_anova::selection::{FixedSelection, LineSource, SelectionSource};
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise warnings only. `-v` adds a global
/// debug directive either way.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::WARN.as_str()));
    let filter = if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Merge the optional config file with command-line overrides
fn build_config(args: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_toml(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if let Some(method) = args.method {
        config.method = method;
    }

    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.verbose);

    let config = build_config(&args)?;
    let request = AnalysisRequest {
        input: args.input_file.clone(),
        output: args.output_file.clone(),
        repair: args.fix_commas,
    };

    let mut source: Box<dyn SelectionSource> = match &args.select {
        Some(list) => Box::new(FixedSelection(list.clone())),
        None => Box::new(LineSource::new(io::stdin().lock())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match pipeline::run(&config, &request, source.as_mut(), &mut out)? {
        Outcome::Completed(report) => {
            tracing::debug!(comparisons = report.comparisons.len(), "analysis complete");
        }
        Outcome::ParseFailed => {
            tracing::debug!("no report produced");
        }
    }

    Ok(())
}
