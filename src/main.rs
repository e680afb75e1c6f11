use anyhow::Result;
use clap::Parser;
use sigdrift::cli::{Cli, Commands};
use sigdrift::io::output::{create_writer, OutputFormat};
use sigdrift::{CheckPolicy, RubyWalker, Scanner, SorbetSigSource, YardExtractor};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            path,
            format,
            output,
            strict_missing_sig,
            unordered_unions,
            ignore,
            plain,
            verbosity,
        } => {
            init_logging(verbosity);
            if plain {
                colored::control::set_override(false);
            }

            let policy = CheckPolicy {
                pass_without_declared: !strict_missing_sig,
                ordered_unions: !unordered_unions,
            };
            let walker = RubyWalker::new().with_ignore_patterns(ignore.unwrap_or_default());
            let scanner = Scanner::new(walker, YardExtractor::new(), SorbetSigSource::new(), policy);

            let report = scanner.scan(&path)?;
            write_report(&report, format, output)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn write_report(
    report: &sigdrift::Report,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    create_writer(format, writer).write_report(report)
}
