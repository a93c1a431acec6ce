//! CLI argument parsing for arff-anova

use crate::config::PosthocMethod;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arff-anova")]
#[command(version)]
#[command(
    about = "Performs ANOVA and a Nemenyi post-hoc test on Weka experimenter results",
    long_about = None
)]
pub struct Cli {
    /// ARFF file containing accuracy data
    #[arg(value_name = "INPUT_FILE")]
    pub input_file: PathBuf,

    /// Write the pairwise comparison table to this file (comma-separated)
    #[arg(short = 'o', long = "output_file", alias = "output-file", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Remove commas from the Key_Dataset attribute, otherwise parsing may fail
    #[arg(short = 'f')]
    pub fix_commas: bool,

    /// Verbose (debug-level logging on stderr)
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Attribute numbers to select without prompting (e.g. "1,2,8")
    #[arg(long = "select", value_name = "LIST")]
    pub select: Option<String>,

    /// Significance level for the post-hoc reject decision
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Post-hoc p-value correction
    #[arg(long = "method", value_enum)]
    pub method: Option<PosthocMethod>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_input_file() {
        let cli = Cli::parse_from(["arff-anova", "results.arff"]);
        assert_eq!(cli.input_file, PathBuf::from("results.arff"));
        assert!(cli.output_file.is_none());
        assert!(!cli.fix_commas);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_requires_input_file() {
        assert!(Cli::try_parse_from(["arff-anova"]).is_err());
    }

    #[test]
    fn test_cli_output_file_short_and_long() {
        let cli = Cli::parse_from(["arff-anova", "in.arff", "-o", "out.csv"]);
        assert_eq!(cli.output_file, Some(PathBuf::from("out.csv")));

        let cli = Cli::parse_from(["arff-anova", "in.arff", "--output_file", "out.csv"]);
        assert_eq!(cli.output_file, Some(PathBuf::from("out.csv")));

        let cli = Cli::parse_from(["arff-anova", "in.arff", "--output-file", "out.csv"]);
        assert_eq!(cli.output_file, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["arff-anova", "-f", "-v", "in.arff"]);
        assert!(cli.fix_commas);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_analysis_overrides() {
        let cli = Cli::parse_from([
            "arff-anova",
            "in.arff",
            "--select",
            "1,2",
            "--alpha",
            "0.01",
            "--method",
            "chisq",
        ]);
        assert_eq!(cli.select.as_deref(), Some("1,2"));
        assert_eq!(cli.alpha, Some(0.01));
        assert_eq!(cli.method, Some(PosthocMethod::Chisq));
    }

    #[test]
    fn test_cli_rejects_unknown_method() {
        assert!(Cli::try_parse_from(["arff-anova", "in.arff", "--method", "bonferroni"]).is_err());
    }
}
