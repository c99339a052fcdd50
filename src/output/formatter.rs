//! Output formatters for run results
//!
//! Human-readable banners and colored per-case lines, plus JSON renderings of
//! the finished run.

use crate::models::{Outcome, ResultRecord, TestType};
use crate::results::{Report, RunReport, Summary};
use crate::utils::timer::PhaseDurations;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }

    /// Whether progress is printed while the run is in flight
    pub fn is_streaming(&self) -> bool {
        matches!(self, OutputFormat::Table)
    }
}

/// Result formatter
#[derive(Clone, Debug)]
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colorize {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn main_title(&self, title: &str) -> String {
        format!("\n=======================\n{title}\n=======================\n")
    }

    pub fn small_title(&self, title: &str) -> String {
        format!("\n=== {title} ===\n")
    }

    pub fn phase_title(&self, test_type: TestType) -> String {
        match test_type {
            TestType::Unit => self.main_title("Starting unit tests"),
            TestType::Http => self.main_title("Starting HTTP tests"),
        }
    }

    pub fn suite_title(&self, test_type: TestType, suite_name: &str) -> String {
        match test_type {
            TestType::Unit => self.small_title(&format!("Testing \"{suite_name}\" Unit")),
            TestType::Http => self.small_title(&format!("Testing \"{suite_name}\" HTTP requests")),
        }
    }

    /// Single progress line for a settled case. HTTP titles already name their app.
    pub fn format_record(&self, record: &ResultRecord) -> String {
        let line = match record.test_type {
            TestType::Unit => format!("Testing: {} - {}", record.suite_name, record.title),
            TestType::Http => format!("Testing: {}", record.title),
        };
        match &record.outcome {
            Outcome::Passed => self.paint(GREEN, &format!("{line} - OK")),
            Outcome::Failed { .. } => self.paint(RED, &format!("{line} - Failed")),
            Outcome::TimedOut { after_ms } => {
                self.paint(YELLOW, &format!("{line} - Timed out ({after_ms}ms)"))
            }
        }
    }

    /// Totals, per-suite breakdown, verdict and error details
    pub fn format_summary(
        &self,
        report: &Report,
        summary: &Summary,
        phases: &PhaseDurations,
    ) -> String {
        let mut output = self.main_title("Summary");

        output.push_str(&format!("Total errors:  {}\n", summary.total_failed));
        output.push_str(&format!("Total success: {}\n", summary.total_passed));
        output.push_str(&format!("Pass rate:     {:.1}%\n", summary.pass_rate()));
        output.push_str(&format!("Duration:      {phases}\n"));
        output.push('\n');

        for suite in report.by_suite() {
            let failed = if suite.failed > 0 {
                self.paint(RED, &suite.failed.to_string())
            } else {
                suite.failed.to_string()
            };
            output.push_str(&format!(
                "  [{:4}] {:20} pass: {:3} | fail: {}\n",
                suite.test_type.name(),
                suite.suite_name,
                suite.passed,
                failed
            ));
        }

        let verdict = if summary.passed { "passed" } else { "failed" };
        let color = if summary.passed { GREEN } else { RED };
        output.push('\n');
        output.push_str(&self.paint(color, &format!("Final result: Test has {verdict}")));
        output.push('\n');

        let failures = report.failures();
        if !failures.is_empty() {
            output.push_str(&self.main_title("Error report"));
            for record in failures {
                output.push_str(&format!(
                    "  [{}] {} - {}\n      {}\n",
                    record.test_type,
                    record.suite_name,
                    record.title,
                    record.error().unwrap_or_default()
                ));
            }
        }

        output
    }

    /// Render a finished run in the configured format
    pub fn format_run(&self, run: &RunReport, report: &Report) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary(report, &run.summary, &run.phases),
            OutputFormat::Json => serde_json::to_string(run).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(run).unwrap_or_default(),
        }
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CaseError;
    use chrono::Utc;

    fn failing_report() -> Report {
        let mut report = Report::new();
        report.append(ResultRecord::new(
            TestType::Unit,
            "lib",
            "returns 1",
            Outcome::Passed,
            1,
        ));
        report.append(ResultRecord::new(
            TestType::Http,
            "web_app",
            "GET /",
            Outcome::failed(CaseError::Raised("expected 200, got 500".to_string())),
            3,
        ));
        report
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("csv"), None);
        assert!(!OutputFormat::Json.is_streaming());
    }

    #[test]
    fn test_format_record_plain() {
        let formatter = ResultFormatter::new(OutputFormat::Table).no_color();
        let record = ResultRecord::new(TestType::Unit, "lib", "returns 1", Outcome::Passed, 1);
        assert_eq!(
            formatter.format_record(&record),
            "Testing: lib - returns 1 - OK"
        );
    }

    #[test]
    fn test_format_http_record_uses_title_only() {
        let formatter = ResultFormatter::new(OutputFormat::Table).no_color();
        let record = ResultRecord::new(
            TestType::Http,
            "web_app",
            "Web App - GET to unknown URI leads to 404",
            Outcome::Passed,
            2,
        );
        assert_eq!(
            formatter.format_record(&record),
            "Testing: Web App - GET to unknown URI leads to 404 - OK"
        );
    }

    #[test]
    fn test_format_record_colored_failure() {
        let formatter = ResultFormatter::new(OutputFormat::Table);
        let record = ResultRecord::new(
            TestType::Unit,
            "lib",
            "returns 1",
            Outcome::failed(CaseError::NotSignaled),
            1,
        );
        let line = formatter.format_record(&record);
        assert!(line.starts_with(RED));
        assert!(line.contains("Failed"));
    }

    #[test]
    fn test_format_summary_includes_error_report() {
        let formatter = ResultFormatter::new(OutputFormat::Table).no_color();
        let report = failing_report();
        let phases = PhaseDurations {
            unit_ms: 1,
            http_ms: 3,
        };
        let output = formatter.format_summary(&report, &report.summarize(), &phases);

        assert!(output.contains("Total errors:  1"));
        assert!(output.contains("Total success: 1"));
        assert!(output.contains("Pass rate:     50.0%"));
        assert!(output.contains("Duration:      unit 1ms | http 3ms | total 4ms"));
        assert!(output.contains("Final result: Test has failed"));
        assert!(output.contains("Error report"));
        assert!(output.contains("expected 200, got 500"));
    }

    #[test]
    fn test_format_run_json() {
        let report = failing_report();
        let now = Utc::now();
        let run = RunReport::new(&report, PhaseDurations::default(), now, now);
        let output = ResultFormatter::new(OutputFormat::Json).format_run(&run, &report);

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["summary"]["total_failed"], 1);
        assert_eq!(value["records"][0]["title"], "returns 1");
    }
}
