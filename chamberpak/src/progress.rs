//! Load progress reporting
//!
//! The loader announces how many units each stage has before stepping
//! through them, so a front end can size its bars up front.

/// The load pipeline stages that report progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadStage {
    /// Packages registered.
    Packages,
    /// Objects parsed and merged.
    Objects,
    /// Resource entries copied to the staging cache.
    Resources,
    /// Image entries copied (a subset of [`LoadStage::Resources`]).
    ImageExtract,
    /// Images the UI will load afterwards; the loader only announces the
    /// total, stepping is the consumer's job.
    ImageLoad,
}

impl LoadStage {
    /// Human-readable stage name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStage::Packages => "Packages",
            LoadStage::Objects => "Objects",
            LoadStage::Resources => "Resources",
            LoadStage::ImageExtract => "Extracting images",
            LoadStage::ImageLoad => "Loading images",
        }
    }
}

/// Receiver for load progress updates.
///
/// `set_length` is called once per stage before any `step` for it; `step`
/// fires exactly once per completed unit, in pipeline order.
pub trait LoadProgress {
    /// Announce how many units a stage has.
    fn set_length(&mut self, stage: LoadStage, total: usize);
    /// Record one completed unit of a stage.
    fn step(&mut self, stage: LoadStage);
}

/// A progress sink that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl LoadProgress for NoProgress {
    fn set_length(&mut self, _stage: LoadStage, _total: usize) {}
    fn step(&mut self, _stage: LoadStage) {}
}
