use super::{ExecutionReport, ExecutionResult};

/// Formats execution reports into human-readable strings
pub struct ReportFormatter;

impl ReportFormatter {
    /// One line per node in commit order, followed by a summary line.
    pub fn format_report(report: &ExecutionReport) -> String {
        let mut out = String::new();
        for (id, result) in report.iter() {
            out.push_str(&Self::format_entry(id, result));
            out.push('\n');
        }
        out.push_str(&format!(
            "{} node(s): {} ok, {} failed",
            report.len(),
            report.ok_count(),
            report.failed_count()
        ));
        out
    }

    /// `"<id>: <value> (<type>)"` or `"<id>: error[<kind>]: <message>"`.
    pub fn format_entry(id: &str, result: &ExecutionResult) -> String {
        match result {
            ExecutionResult::Ok {
                value,
                resolved_type,
            } => format!("{}: {} ({})", id, Self::format_value(value), resolved_type),
            ExecutionResult::Err(failure) => {
                format!("{}: error[{}]: {}", id, failure.kind, failure.message)
            }
        }
    }

    // Text is quoted so an empty string stays visible.
    fn format_value(value: &crate::value::Value) -> String {
        match value {
            crate::value::Value::Text(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}
