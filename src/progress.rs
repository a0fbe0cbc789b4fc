//! Progress display for resolution and installation

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while dependencies are fetched
pub fn resolution_spinner() -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner} Resolving resources and dependencies...")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]);

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Progress display for file installation
pub struct ProgressDisplay {
    file_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total file count
    pub fn new(total_files: u64) -> Self {
        let file_style = ProgressStyle::with_template("  [{bar:40.green/yellow}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");

        let file_pb = ProgressBar::new(total_files);
        file_pb.set_style(file_style);
        Self { file_pb }
    }

    /// Update file progress
    pub fn update_file(&self, file_path: &str) {
        self.file_pb.set_message(truncate_path(file_path, 50));
        self.file_pb.inc(1);
    }

    pub fn finish(&self) {
        self.file_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.file_pb.abandon();
    }
}

/// Shorten long paths from the left, keeping the file name visible
fn truncate_path(path: &str, max: usize) -> String {
    let count = path.chars().count();
    if count <= max {
        return path.to_string();
    }
    let tail: String = path.chars().skip(count - (max - 3)).collect();
    format!("...{tail}")
}
