use std::io::{self, Write};

use super::{GroupOutcome, GroupReport, ReportError, Reporter};

/// A reporter that writes the group summaries as a JSON array.
#[derive(Debug, Clone, Default)]
pub struct JsonReporter {
    /// Include the full empirical CDF of every group.
    include_ecdf: bool,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include each group's empirical CDF in the output.
    pub fn with_ecdf(mut self) -> Self {
        self.include_ecdf = true;
        self
    }

    /// Write the report to `writer` as pretty-printed JSON.
    pub fn write_to(
        &self,
        writer: &mut impl Write,
        results: &[GroupReport],
    ) -> Result<(), ReportError> {
        if self.include_ecdf {
            serde_json::to_writer_pretty(&mut *writer, results)?;
        } else {
            let stripped: Vec<GroupReport> = results
                .iter()
                .cloned()
                .map(|mut report| {
                    if let GroupOutcome::Completed(summary) = &mut report.outcome {
                        summary.ecdf = None;
                    }
                    report
                })
                .collect();
            serde_json::to_writer_pretty(&mut *writer, &stripped)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn report(&self, results: &[GroupReport]) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_to(&mut writer, results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupSummary;
    use crate::stats::{build_ecdf, ConfidenceInterval, Estimate};

    fn make_report() -> GroupReport {
        let estimate = Estimate {
            point: 0.5,
            interval: ConfidenceInterval {
                lower: 0.4,
                upper: 0.6,
                level: 0.95,
            },
        };
        GroupReport::completed(GroupSummary {
            label: "(a) Random,  Cache ON".to_string(),
            worst_case: 19,
            sample_count: 2,
            mean: estimate,
            fraction_below: estimate,
            ecdf: Some(build_ecdf(&[1.0, 19.0]).unwrap()),
        })
    }

    #[test]
    fn test_json_omits_ecdf_by_default() {
        let results = vec![make_report(), GroupReport::failed("broken", "no samples")];

        let mut buffer = Vec::new();
        JsonReporter::new().write_to(&mut buffer, &results).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        let completed = &value[0]["outcome"];
        assert_eq!(value[0]["label"], "(a) Random,  Cache ON");
        assert_eq!(completed["status"], "completed");
        assert_eq!(completed["worst_case"], 19);
        assert_eq!(completed["mean"]["interval"]["upper"], 0.6);
        assert!(completed.get("ecdf").is_none());

        assert_eq!(value[1]["label"], "broken");
        assert_eq!(value[1]["outcome"]["status"], "failed");
        assert_eq!(value[1]["outcome"]["error"], "no samples");
    }

    #[test]
    fn test_json_with_ecdf() {
        let mut buffer = Vec::new();
        JsonReporter::new()
            .with_ecdf()
            .write_to(&mut buffer, &[make_report()])
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        let ecdf = &value[0]["outcome"]["ecdf"];
        assert_eq!(ecdf["values"], serde_json::json!([1.0, 19.0]));
        assert_eq!(ecdf["probabilities"], serde_json::json!([0.5, 1.0]));
    }
}
