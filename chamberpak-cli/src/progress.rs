//! CLI progress display
//!
//! One indicatif bar per load stage, created lazily when the loader
//! announces the stage's length.

use std::collections::HashMap;
use std::time::Duration;

use chamberpak::progress::{LoadProgress, LoadStage};
use console::Emoji;
use indicatif::{HumanDuration, MultiProgress, ProgressBar, ProgressStyle};

/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Progress bar style for determinate progress
fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg:>20} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
}

/// Multi-bar progress display for the load pipeline.
pub struct BarProgress {
    multi: MultiProgress,
    bars: HashMap<LoadStage, ProgressBar>,
}

impl BarProgress {
    #[must_use]
    pub fn new() -> Self {
        BarProgress {
            multi: MultiProgress::new(),
            bars: HashMap::new(),
        }
    }

    /// Finish every bar that is still running.
    pub fn finish(&self) {
        for bar in self.bars.values() {
            bar.finish();
        }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadProgress for BarProgress {
    fn set_length(&mut self, stage: LoadStage, total: usize) {
        let bar = self.multi.add(ProgressBar::new(total as u64));
        bar.set_style(bar_style());
        bar.set_message(stage.as_str());
        self.bars.insert(stage, bar);
    }

    fn step(&mut self, stage: LoadStage) {
        if let Some(bar) = self.bars.get(&stage) {
            bar.inc(1);
        }
    }
}
