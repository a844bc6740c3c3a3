//! Command-line argument definitions for the Corral CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments choose the entity source (a TOML dataset or a
//! generated population), the output path, configuration file selection, and
//! logging verbosity.

use clap::{ArgGroup, Parser};

/// Command-line arguments for the Corral bubble chart tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "generate"])))]
pub struct Args {
    /// Path to the input dataset (TOML with an `[[entities]]` array)
    #[arg(help = "Path to the input dataset")]
    pub input: Option<String>,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Generate a population of N entities instead of reading a dataset
    #[arg(long, value_name = "N")]
    pub generate: Option<usize>,

    /// Seed for population generation and flag mutation
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Set the flag attribute on each entity with probability P
    #[arg(long, value_name = "P")]
    pub mutate_flags: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_args() {
        let args = Args::try_parse_from(["corral", "data.toml", "-o", "chart.svg"]).unwrap();
        assert_eq!(args.input.as_deref(), Some("data.toml"));
        assert_eq!(args.output, "chart.svg");
        assert_eq!(args.log_level, "info");
        assert_eq!(args.seed, 0);
        assert!(args.generate.is_none());
    }

    #[test]
    fn test_parse_generate_args() {
        let args = Args::try_parse_from([
            "corral",
            "--generate",
            "40",
            "--seed",
            "7",
            "--mutate-flags",
            "0.25",
        ])
        .unwrap();
        assert!(args.input.is_none());
        assert_eq!(args.generate, Some(40));
        assert_eq!(args.seed, 7);
        assert_eq!(args.mutate_flags, Some(0.25));
    }

    #[test]
    fn test_source_is_required() {
        assert!(Args::try_parse_from(["corral"]).is_err());
    }
}
