//! Progress reporting for repository mining using indicatif.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// Style templates for the mining progress bar.
pub mod styles {
    use super::*;

    /// Bar over repositories, message shows the current repository and commit count.
    pub fn repository_progress() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("#>-")
    }
}

/// Progress over the repositories of one collection run.
pub struct RepositoryProgress {
    bar: ProgressBar,
}

impl RepositoryProgress {
    /// Create a visible progress bar when stderr is a terminal, hidden otherwise.
    pub fn new(total: usize) -> Self {
        if is_tty() {
            Self::visible(total)
        } else {
            Self::hidden(total)
        }
    }

    /// Create a progress bar that always renders.
    pub fn visible(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(styles::repository_progress());
        Self { bar }
    }

    /// Create a hidden progress bar (still tracks position).
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self { bar }
    }

    /// Announce the repository currently being mined.
    pub fn start_repository(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    /// Update the per-repository commit counter.
    pub fn commits_seen(&self, name: &str, commits: usize) {
        if commits % 100 == 0 {
            self.bar.set_message(format!("{name} ({commits} commits)"));
        }
    }

    /// Mark one repository as done.
    pub fn finish_repository(&self) {
        self.bar.inc(1);
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Number of repositories completed.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

/// Check if stderr is a TTY (for deciding whether to show progress bars).
pub fn is_tty() -> bool {
    std::io::stderr().is_terminal()
}
