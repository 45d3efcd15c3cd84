//! Resource extraction
//!
//! Copies every `resources/` entry out of every package archive into a
//! staging cache, moves the image subtree to the directory the UI reads
//! from, then removes the staging cache. The staging cache is cleared
//! first, so re-running extraction with the same input produces the same
//! output.

use std::path::Path;

use crate::error::Result;
use crate::package::Package;
use crate::progress::{LoadProgress, LoadStage};

/// Prefix (normalized) of all extractable resource entries.
pub(crate) const RESOURCE_PREFIX: &str = "resources/";
/// Prefix (normalized) of the image subtree relocated for the UI.
pub(crate) const IMAGE_PREFIX: &str = "resources/chamberpak/";

pub(crate) fn extract_resources<'a>(
    packages: impl Iterator<Item = &'a Package>,
    cache_dir: &Path,
    image_dir: &Path,
    progress: &mut dyn LoadProgress,
) -> Result<()> {
    // Idempotency: prior staging contents are removed unconditionally.
    let _ = std::fs::remove_dir_all(cache_dir);
    std::fs::create_dir_all(cache_dir)?;

    for package in packages {
        let entries: Vec<String> = package
            .archive
            .names()
            .filter(|name| name.starts_with(RESOURCE_PREFIX))
            .map(str::to_string)
            .collect();
        for entry in entries {
            if let Err(err) = package.archive.extract(&entry, cache_dir) {
                // A single bad entry never aborts the load.
                tracing::warn!("failed to extract \"{}:{entry}\": {err}", package.id);
                continue;
            }
            progress.step(LoadStage::Resources);
            if entry.starts_with(IMAGE_PREFIX) {
                progress.step(LoadStage::ImageExtract);
            }
        }
    }

    // Replace the UI image directory with the freshly staged subtree.
    let _ = std::fs::remove_dir_all(image_dir);
    let staged_images = find_staged_subtree(cache_dir, IMAGE_PREFIX);
    if let Some(staged) = staged_images {
        move_dir(&staged, image_dir)?;
    }
    let _ = std::fs::remove_dir_all(cache_dir);
    Ok(())
}

/// Locate the staged image subtree. Extraction preserves the archives'
/// original capitalization, so match the path case-insensitively.
fn find_staged_subtree(cache_dir: &Path, prefix: &str) -> Option<std::path::PathBuf> {
    let mut current = cache_dir.to_path_buf();
    for part in prefix.trim_end_matches('/').split('/') {
        let next = std::fs::read_dir(&current)
            .ok()?
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_name()
                    .to_string_lossy()
                    .eq_ignore_ascii_case(part)
            })?;
        current = next.path();
    }
    current.is_dir().then_some(current)
}

/// Move a directory, falling back to copy-and-delete when a plain rename
/// fails (different filesystems).
fn move_dir(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if std::fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    for entry in walkdir::WalkDir::new(src) {
        let entry = entry.map_err(|e| crate::error::Error::Io(e.into()))?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(rel);
        if entry.path().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    std::fs::remove_dir_all(src)?;
    Ok(())
}
