use crate::io::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sigdrift")]
#[command(
    about = "Detects drift between Sorbet sig declarations and YARD documentation tags",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a codebase for declared/documented signature drift
    Check {
        /// Path to scan
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail methods that carry no declared signature instead of
        /// exempting them
        #[arg(long = "strict-missing-sig")]
        strict_missing_sig: bool,

        /// Compare union members as a set instead of in declaration order
        #[arg(long = "unordered-unions")]
        unordered_unions: bool,

        /// Glob patterns of paths to skip
        #[arg(long = "ignore", value_delimiter = ',')]
        ignore: Option<Vec<String>>,

        /// Disable colored output
        #[arg(long)]
        plain: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },
}
