//! arff-anova - significance testing for classifier benchmark results
//!
//! Loads Weka experimenter results (ARFF), groups accuracy by classifier,
//! runs a one-way ANOVA and a Nemenyi post-hoc test, and reports which
//! pairs of classifiers differ significantly.

pub mod aggregate;
pub mod arff;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod selection;
pub mod stats;
