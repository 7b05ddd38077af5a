//! Progress reporting for resolution rounds

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use witness_application::ProgressNotifier;
use witness_domain::{BarrierClose, NodeId, Report, RequestId, ResolutionResult};

/// Reports round progress with a progress bar over the witness set
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn report_status(report: &Report) -> String {
        if report.is_success() {
            format!("{} {}", "v".green(), report.node_id)
        } else {
            format!("{} {}", "x".red(), report.node_id)
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bar) = guard.as_ref() {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_round_start(&self, request: RequestId, witnesses: usize) {
        let bar = ProgressBar::new(witnesses as u64);
        bar.set_style(Self::round_style());
        bar.set_prefix(format!("Collecting {}", request));
        bar.set_message("Retrieving...");

        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(bar);
    }

    fn on_report(&self, report: &Report) {
        self.with_bar(|bar| {
            bar.set_message(Self::report_status(report));
            bar.inc(1);
        });
    }

    fn on_barrier_closed(&self, closed_by: BarrierClose, reports: usize) {
        let bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(bar) = bar {
            bar.finish_with_message(format!(
                "{} ({} reports)",
                closed_by.description().green(),
                reports
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_round_start(&self, request: RequestId, witnesses: usize) {
        println!(
            "{} {} ({} witnesses)",
            "->".cyan(),
            format!("Resolving {}", request).bold(),
            witnesses
        );
    }

    fn on_node_retrieved(&self, node: &NodeId, failed_sources: usize) {
        if failed_sources > 0 {
            println!("  {} {} ({} sources failed)", "~".yellow(), node, failed_sources);
        }
    }

    fn on_report(&self, report: &Report) {
        match report.error() {
            None => println!("  {}", ProgressReporter::report_status(report)),
            Some(e) => println!("  {} ({})", ProgressReporter::report_status(report), e),
        }
    }

    fn on_barrier_closed(&self, closed_by: BarrierClose, reports: usize) {
        println!("{} {} with {} reports", "->".cyan(), closed_by, reports);
    }

    fn on_round_complete(&self, result: &ResolutionResult) {
        let verdict = if result.is_accepted() {
            "accepted".green()
        } else {
            "rejected".red()
        };
        println!("{} round {}", "->".cyan(), verdict);
        println!();
    }
}
