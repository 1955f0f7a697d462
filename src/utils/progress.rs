/// Progress bars for benchmark runs
use indicatif::{ProgressBar, ProgressStyle};

/// A bar over `total` benchmark steps. Hidden when `total` is 0 or `quiet` is set.
pub fn create_progress_bar(total: u64, message: &str, quiet: bool) -> ProgressBar {
    if total == 0 || quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg:30} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed_precise})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━─");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
