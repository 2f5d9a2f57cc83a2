//! CLI progress display utilities
//!
//! Step indicators, emojis and progress bars for long-running archive
//! operations.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::batch::BatchProgress;
use crate::narc::NarcProgress;

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Package - for unpacking/packing operations
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Picture - for sprite/PNG conversions
pub static PICTURE: Emoji<'_, '_> = Emoji("🖼️  ", "");

// =============================================================================
// Step-Based Progress
// =============================================================================

/// Print a step indicator: `[1/3] 📦 Message...`
///
/// # Example
/// ```ignore
/// print_step(1, 2, LOOKING_GLASS, "Reading archive...");
/// print_step(2, 2, PICTURE, "Exporting sprites...");
/// ```
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

// =============================================================================
// Progress Bars
// =============================================================================

/// Progress bar style for determinate progress
///
/// Format: `Unpacking [████████░░░░░░░░] 50/100`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
}

/// Create a progress bar, hidden when `quiet` is set
#[must_use]
pub fn simple_bar(total: u64, msg: &str, quiet: bool) -> ProgressBar {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total)
    };
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}

/// Mirror a container progress event onto a bar
pub fn update_narc_bar(pb: &ProgressBar, progress: &NarcProgress) {
    pb.set_length(progress.total as u64);
    pb.set_position(progress.current as u64);
    pb.set_message(progress.phase.as_str());
}

/// Mirror a batch progress event onto a bar
pub fn update_batch_bar(pb: &ProgressBar, progress: &BatchProgress) {
    pb.set_length(progress.total as u64);
    pb.set_position(progress.current as u64);
    match &progress.current_item {
        Some(item) => pb.set_message(format!("{} {item}", progress.phase.as_str())),
        None => pb.set_message(progress.phase.as_str()),
    }
}
