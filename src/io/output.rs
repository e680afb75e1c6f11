//! Report writers: the terminal diagnostic stream and a JSON dump.

use crate::scan::{Finding, Report};
use clap::ValueEnum;
use colored::*;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub fn create_writer<W: Write + 'static>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// One diff block per failing method: the documented tags as
    /// written, then the declared signature rendered in the same tag
    /// grammar when one exists
    fn write_finding(&mut self, finding: &Finding) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "++++++++++++++".dimmed())?;
        writeln!(self.writer, "{}", finding.identity.title().bold())?;
        writeln!(
            self.writer,
            "{} {}:{}",
            "at".dimmed(),
            finding.identity.file.display(),
            finding.identity.line
        )?;
        for mismatch in &finding.mismatches {
            writeln!(self.writer, "  {}", mismatch.to_string().red())?;
        }
        writeln!(self.writer, "{}", "Documented meta".cyan())?;
        for tag in &finding.documented_tags {
            writeln!(self.writer, "{tag}")?;
        }
        if let Some(declared) = &finding.declared {
            writeln!(self.writer, "{}", "--------------".dimmed())?;
            writeln!(self.writer, "{}", "Declared meta".cyan())?;
            for (name, type_text) in &declared.params {
                writeln!(self.writer, "{name}: {type_text}")?;
            }
            if let Some(returns) = &declared.returns {
                writeln!(self.writer, "return {returns}")?;
            }
        }
        writeln!(self.writer, "{}", "++++++++++++++".dimmed())?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        for finding in &report.findings {
            self.write_finding(finding)?;
        }

        let totals = format!("Total: {}; Failed: {}", report.total, report.failed);
        if report.failed == 0 {
            writeln!(self.writer, "{}", totals.green().bold())?;
        } else {
            writeln!(self.writer, "{}", totals.red().bold())?;
        }
        for tally in &report.failures_by_file {
            writeln!(self.writer, "{}: {}", tally.file.display(), tally.count)?;
        }
        Ok(())
    }
}
