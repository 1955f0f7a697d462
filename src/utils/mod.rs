pub mod format;
pub mod parallel;
pub mod progress;
pub mod stats;
