//! Progress reporting for forecast rounds

use colored::Colorize;
use foresight_application::ports::progress::RoundProgressNotifier;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard};

/// Reports round progress with indicatif bars
pub struct ProgressReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the active bar with a fresh one of `len` steps.
    fn start_bar(&self, prefix: &str, len: usize) {
        let pb = self.multi.add(ProgressBar::new(len as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(prefix.to_string());
        pb.set_message("Starting...");

        if let Some(previous) = self.slot().replace(pb) {
            previous.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundProgressNotifier for ProgressReporter {
    fn on_round_start(&self, _question: &str, total_agents: usize) {
        self.start_bar("Dispatch", total_agents);
    }

    fn on_agent_complete(&self, agent: &str, success: bool) {
        if let Some(pb) = self.slot().as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), agent)
            } else {
                format!("{} {}", "x".red(), agent)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_requery_start(&self, pass: u32, agents: usize) {
        self.start_bar(&format!("Requery {}", pass), agents);
    }

    fn on_aggregate(&self) {
        if let Some(pb) = self.slot().as_ref() {
            pb.set_message("Aggregating...");
        }
    }

    fn on_round_complete(&self, success: bool) {
        if let Some(pb) = self.slot().take() {
            if success {
                pb.finish_with_message(format!("{}", "Round complete!".green()));
            } else {
                pb.abandon_with_message(format!("{}", "Round failed".red()));
            }
        }
    }
}

/// Plain line-based progress for non-interactive output
pub struct SimpleProgress;

impl RoundProgressNotifier for SimpleProgress {
    fn on_round_start(&self, _question: &str, total_agents: usize) {
        eprintln!("{} {} ({} agents)", "->".cyan(), "Dispatch".bold(), total_agents);
    }

    fn on_agent_complete(&self, agent: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), agent);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_requery_start(&self, pass: u32, agents: usize) {
        eprintln!("{} {} {} ({} agents)", "->".cyan(), "Requery".bold(), pass, agents);
    }

    fn on_round_complete(&self, _success: bool) {
        eprintln!();
    }
}
