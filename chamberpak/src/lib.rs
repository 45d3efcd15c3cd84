//! # ChamberPak
//!
//! A library for loading Portal 2 puzzle-maker content packages: zip
//! archives or plain directories, each declaring styles, items, voice
//! packs, skyboxes, music, style variables, elevator videos, pack lists
//! and editor sounds in an `info.txt` manifest.
//!
//! Loading is a strict pipeline: discover packages, register every object
//! and override record, parse each unique object exactly once and fold its
//! overrides in, resolve style inheritance so every item has a definition
//! for every style, then extract resources for the UI.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chamberpak::prelude::*;
//! use std::path::PathBuf;
//!
//! let config = LoadConfig {
//!     packages_dir: PathBuf::from("packages"),
//!     cache_dir: PathBuf::from("cache"),
//!     image_dir: PathBuf::from("images/cache"),
//!     log_item_fallbacks: false,
//!     log_missing_styles: false,
//!     log_missing_ent_count: false,
//! };
//! let data = load_packages(&config, &mut NoProgress)?;
//! println!("{} styles, {} items", data.styles.len(), data.items.len());
//! # Ok::<(), chamberpak::Error>(())
//! ```

pub mod error;
pub mod formats;
pub mod loader;
pub mod objects;
pub mod package;
pub mod progress;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};
pub use loader::{load_packages, LoadConfig, LoadedData, PackageInfo};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::keyvalues::{Node, Tree};
    pub use crate::loader::{load_packages, LoadConfig, LoadedData, PackageInfo};
    pub use crate::objects::{
        EditorSound, ElevatorVid, Item, Music, Object, ObjectKind, PackList, QuotePack,
        SelitemData, Skybox, Style, StyleDef, StyleVar, Version,
    };
    pub use crate::package::{find_packages, Package, PackageArchive};
    pub use crate::progress::{LoadProgress, LoadStage, NoProgress};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
