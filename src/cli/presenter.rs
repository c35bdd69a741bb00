//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Presenter for CLI output formatting.
///
/// Status goes to stderr; results meant for scripts (paths, values) go to
/// stdout.
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish.
    /// Falls back to a plain line when stderr is not a terminal.
    pub fn spinner_success(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✓".green(), message))
            }
            _ => self.success(message),
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✗".red(), message))
            }
            _ => self.error(message),
        }
    }

    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Format recording progress bar
    pub fn format_progress(&self, elapsed_ms: u64, total_ms: u64) -> String {
        let elapsed_secs = elapsed_ms / 1000;
        let total_secs = total_ms / 1000;
        let percent = if total_ms > 0 {
            (elapsed_ms as f64 / total_ms as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        let bar_width = 20;
        let filled = ((percent / 100.0) * bar_width as f64) as usize;
        let empty = bar_width - filled;

        format!(
            "[{}{}] {:>3}s / {}s",
            "█".repeat(filled).cyan(),
            "░".repeat(empty),
            elapsed_secs,
            total_secs
        )
    }

    /// Update recording progress
    pub fn update_recording_progress(&self, elapsed_ms: u64, total_ms: u64) {
        let progress = self.format_progress(elapsed_ms, total_ms);
        self.update_spinner(&format!("Recording... {}", progress));
    }

    /// Print a key-value pair
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_progress_at_start() {
        let progress = Presenter::new().format_progress(0, 10000);
        assert!(progress.contains("0s / 10s"));
    }

    #[test]
    fn format_progress_at_half() {
        let progress = Presenter::new().format_progress(5000, 10000);
        assert!(progress.contains("5s / 10s"));
    }

    #[test]
    fn format_progress_clamps_past_end() {
        let progress = Presenter::new().format_progress(12000, 10000);
        assert!(progress.contains("12s / 10s"));
        assert!(!progress.contains('░'));
    }

    #[test]
    fn format_progress_zero_total() {
        let progress = Presenter::new().format_progress(0, 0);
        assert!(progress.contains("0s / 0s"));
    }
}
