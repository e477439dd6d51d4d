use std::io::{self, Write};

use colored::Colorize;

use super::{GroupOutcome, GroupReport, ReportError, Reporter};
use crate::group::GroupSummary;
use crate::stats::Estimate;

/// A reporter that prints confidence limits and worst-case fractions to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// Format a confidence level as a percentage ("95%", "99.9%").
    fn format_level(level: f64) -> String {
        let pct = level * 100.0;
        if (pct - pct.round()).abs() < 1e-6 {
            format!("{:.0}%", pct)
        } else {
            format!("{:.1}%", pct)
        }
    }

    /// Format an estimate as `point  (95% CI: lower, upper)`.
    fn format_estimate(estimate: &Estimate) -> String {
        format!(
            "{:.6}  ({} CI: {:.6}, {:.6})",
            estimate.point,
            Self::format_level(estimate.interval.level),
            estimate.interval.lower,
            estimate.interval.upper
        )
    }

    /// Print the report title.
    fn print_header(&self, writer: &mut impl Write, results: &[GroupReport]) -> io::Result<()> {
        let level = results
            .iter()
            .find_map(|r| r.summary())
            .map(|s| Self::format_level(s.mean.interval.level));

        let title = match level {
            Some(level) => format!(
                "=== Confidence limits (bootstrap, {}) & worst-case fractions ===",
                level
            ),
            None => "=== Confidence limits (bootstrap) & worst-case fractions ===".to_string(),
        };

        writeln!(writer)?;
        if self.use_colors {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{}", title)?;
        }
        Ok(())
    }

    fn print_summary_block(&self, writer: &mut impl Write, summary: &GroupSummary) -> io::Result<()> {
        writeln!(
            writer,
            "  Mean cycles: {}",
            Self::format_estimate(&summary.mean)
        )?;
        writeln!(
            writer,
            "  Fraction cycles < worst-case ({}): {}",
            summary.worst_case,
            Self::format_estimate(&summary.fraction_below)
        )?;
        Ok(())
    }

    /// Print one group's block.
    fn print_group(&self, writer: &mut impl Write, report: &GroupReport) -> io::Result<()> {
        writeln!(writer)?;
        if self.use_colors {
            writeln!(writer, "{}", report.label.bold())?;
        } else {
            writeln!(writer, "{}", report.label)?;
        }

        match &report.outcome {
            GroupOutcome::Completed(summary) => self.print_summary_block(writer, summary)?,
            GroupOutcome::Failed { error } => {
                let text = format!("  failed: {}", error);
                if self.use_colors {
                    writeln!(writer, "{}", text.red())?;
                } else {
                    writeln!(writer, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Print the summary footer.
    fn print_footer(&self, writer: &mut impl Write, results: &[GroupReport]) -> io::Result<()> {
        let failed = results.iter().filter(|r| r.is_failed()).count();
        let analyzed = results.len() - failed;

        writeln!(writer)?;
        let summary_label = "Summary:";
        let analyzed_text = format!("{} analyzed", analyzed);
        let failed_text = format!("{} failed", failed);

        if self.use_colors {
            let failed_text = if failed > 0 {
                failed_text.red().to_string()
            } else {
                failed_text
            };
            writeln!(
                writer,
                "{} {}, {}",
                summary_label.bold(),
                analyzed_text.green(),
                failed_text
            )?;
        } else {
            writeln!(writer, "{} {}, {}", summary_label, analyzed_text, failed_text)?;
        }
        Ok(())
    }

    /// Write the full report to `writer`.
    pub fn write_to(&self, writer: &mut impl Write, results: &[GroupReport]) -> io::Result<()> {
        self.print_header(writer, results)?;
        for report in results {
            self.print_group(writer, report)?;
        }
        self.print_footer(writer, results)
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, results: &[GroupReport]) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();

        self.write_to(&mut writer, results)?;

        Ok(())
    }
}
