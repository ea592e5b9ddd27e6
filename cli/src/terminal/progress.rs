use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a module's parameter chain is being walked.
pub struct WalkSpinner {
    spinner: ProgressBar,
}

impl WalkSpinner {
    pub fn start(module: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
            .expect("static template is valid")
            .tick_strings(&["▁▁▁", "▁▂▁", "▂▄▂", "▄▆▄", "▆█▆", "▄▆▄", "▂▄▂", "▁▂▁"]);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Backing up {}...", module.bold()));
        Self { spinner: pb }
    }

    pub fn finish(self) {
        self.spinner.finish_and_clear();
    }
}
