//! Console output formatter for resolution results

use colored::Colorize;
use serde::Serialize;
use witness_domain::{GateDecision, OutputFormat, Request, RequestId, ResolutionResult};

/// JSON document printed by `--output json`.
#[derive(Serialize)]
struct ResolutionDocument<'a> {
    request_id: String,
    content_hash: String,
    request: &'a Request,
    result: &'a ResolutionResult,
}

/// Formats resolution results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format `result` in the requested format.
    pub fn render(
        format: OutputFormat,
        id: RequestId,
        request: &Request,
        result: &ResolutionResult,
    ) -> String {
        match format {
            OutputFormat::Full => Self::format(id, request, result),
            OutputFormat::Summary => Self::format_summary(id, result),
            OutputFormat::Json => Self::format_json(id, request, result),
        }
    }

    /// Format the complete round: request, barrier, tally and decision
    pub fn format(id: RequestId, request: &Request, result: &ResolutionResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Resolution {}", id)));
        output.push('\n');

        output.push_str(&Self::section_header("Request"));
        output.push_str(&format!(
            "{} {}\n",
            "Content hash:".cyan().bold(),
            request.content_hash()
        ));
        for (index, source) in request.sources().iter().enumerate() {
            output.push_str(&format!("  {} #{} {}\n", "Source".dimmed(), index, source));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Aggregation:".cyan().bold(),
            request.aggregation().stage()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Tally:".cyan().bold(),
            request.tally().stage()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Quorum:".cyan().bold(),
            request.quorum()
        ));

        output.push_str(&Self::section_header("Collection"));
        output.push_str(&format!(
            "{} {}\n",
            "Barrier:".cyan().bold(),
            result.closed_by
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Reports:".cyan().bold(),
            result.participating_report_count
        ));
        if !result.tallied_nodes.is_empty() {
            let nodes: Vec<String> = result.tallied_nodes.iter().map(ToString::to_string).collect();
            output.push_str(&format!(
                "{}\n{}\n",
                "Tallied witnesses:".cyan().bold(),
                Self::indent(&nodes.join("\n"), "  * ")
            ));
        }

        output.push_str(&Self::section_header("Decision"));
        output.push_str(&Self::decision(result));
        output.push('\n');

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(id: RequestId, request: &Request, result: &ResolutionResult) -> String {
        let document = ResolutionDocument {
            request_id: id.to_string(),
            content_hash: request.content_hash(),
            request,
            result,
        };
        serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the decision only (concise output)
    pub fn format_summary(id: RequestId, result: &ResolutionResult) -> String {
        format!("{} {}\n", format!("[{}]", id).dimmed(), Self::decision(result))
    }

    fn decision(result: &ResolutionResult) -> String {
        match &result.outcome {
            GateDecision::Accept { value, agreement } => format!(
                "{} {}\n  {} {}",
                "ACCEPTED".green().bold(),
                value,
                "agreement".dimmed(),
                agreement
            ),
            GateDecision::Reject { reason } => {
                format!("{} {}", "REJECTED".red().bold(), reason)
            }
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
