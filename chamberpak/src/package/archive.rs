//! Uniform read-only access to zip and directory packages
//!
//! A package is either a `.zip` archive or a plain directory with the same
//! layout. [`PackageArchive`] hides the difference: entry names are listed
//! with forward slashes and ASCII-lowercased so prefix checks and lookups
//! are case-insensitive, while the original spelling is kept for reading.

use std::cell::RefCell;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::utils::{normalize_entry, normalize_path};

/// A read-only view over one package archive.
pub struct PackageArchive {
    path: PathBuf,
    backing: Backing,
    /// `(normalized, original)` entry names, files only.
    entries: Vec<(String, String)>,
}

enum Backing {
    // Zip reads require &mut; the load pipeline is single-threaded.
    Zip(RefCell<ZipArchive<File>>),
    Dir(PathBuf),
}

impl PackageArchive {
    /// Open a package archive: a `.zip` file or a directory.
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_file() {
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
            {
                let zip = ZipArchive::new(File::open(path)?)?;
                let entries = zip
                    .file_names()
                    .filter(|name| !name.ends_with('/'))
                    .map(|name| (normalize_entry(name), name.to_string()))
                    .collect();
                return Ok(PackageArchive {
                    path: path.to_path_buf(),
                    backing: Backing::Zip(RefCell::new(zip)),
                    entries,
                });
            }
            return Err(Error::NotAnArchive {
                path: path.to_path_buf(),
            });
        }
        if path.is_dir() {
            let mut entries = Vec::new();
            for entry in WalkDir::new(path).follow_links(true) {
                let entry = entry.map_err(|e| Error::Io(e.into()))?;
                if !entry.path().is_file() {
                    continue;
                }
                if let Ok(rel) = entry.path().strip_prefix(path) {
                    let original = normalize_path(rel);
                    entries.push((normalize_entry(&original), original));
                }
            }
            return Ok(PackageArchive {
                path: path.to_path_buf(),
                backing: Backing::Dir(path.to_path_buf()),
                entries,
            });
        }
        Err(Error::NotAnArchive {
            path: path.to_path_buf(),
        })
    }

    /// Where the archive lives on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every file entry, normalized for case-insensitive comparison.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(norm, _)| norm.as_str())
    }

    /// Whether the archive contains the entry (case-insensitive).
    #[must_use]
    pub fn has_entry(&self, entry: &str) -> bool {
        self.find_original(entry).is_some()
    }

    fn find_original(&self, entry: &str) -> Option<&str> {
        let wanted = normalize_entry(entry);
        self.entries
            .iter()
            .find(|(norm, _)| *norm == wanted)
            .map(|(_, original)| original.as_str())
    }

    fn archive_label(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Read an entry fully into memory.
    pub fn read(&self, entry: &str) -> Result<Vec<u8>> {
        let Some(original) = self.find_original(entry) else {
            return Err(Error::EntryNotFound {
                package: self.archive_label(),
                path: entry.to_string(),
            });
        };
        match &self.backing {
            Backing::Zip(zip) => {
                let mut zip = zip.borrow_mut();
                let mut file = zip.by_name(original)?;
                let mut buf = Vec::with_capacity(file.size() as usize);
                file.read_to_end(&mut buf)?;
                Ok(buf)
            }
            Backing::Dir(dir) => Ok(std::fs::read(dir.join(original))?),
        }
    }

    /// Read an entry as UTF-8 text.
    pub fn read_to_string(&self, entry: &str) -> Result<String> {
        Ok(String::from_utf8(self.read(entry)?)?)
    }

    /// Extract an entry under `dest_root`, preserving its relative path and
    /// creating parent directories. `..` components are dropped.
    pub fn extract(&self, entry: &str, dest_root: &Path) -> Result<()> {
        let Some(original) = self.find_original(entry) else {
            return Err(Error::EntryNotFound {
                package: self.archive_label(),
                path: entry.to_string(),
            });
        };
        let mut dest = dest_root.to_path_buf();
        for component in Path::new(original).components() {
            if let Component::Normal(part) = component {
                dest.push(part);
            }
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = self.read(entry)?;
        std::fs::write(&dest, data)?;
        Ok(())
    }
}

impl std::fmt::Debug for PackageArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageArchive")
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn dir_package(temp: &TempDir) -> PathBuf {
        let root = temp.path().join("pkg");
        std::fs::create_dir_all(root.join("Styles/Clean")).unwrap();
        std::fs::write(root.join("info.txt"), "\"ID\" \"PKG\"").unwrap();
        std::fs::write(root.join("Styles/Clean/Items.txt"), "\"a\" \"1\"").unwrap();
        root
    }

    #[test]
    fn test_dir_archive() {
        let temp = TempDir::new().unwrap();
        let archive = PackageArchive::open(&dir_package(&temp)).unwrap();

        assert!(archive.has_entry("info.txt"));
        // Case-insensitive lookup
        assert!(archive.has_entry("styles/clean/items.txt"));
        assert!(archive.has_entry("STYLES/Clean/ITEMS.TXT"));
        assert!(!archive.has_entry("missing.txt"));
        assert_eq!(
            archive.read_to_string("styles/clean/items.txt").unwrap(),
            "\"a\" \"1\""
        );
    }

    #[test]
    fn test_zip_archive() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("pkg.zip");
        let mut writer = zip::ZipWriter::new(File::create(&zip_path).unwrap());
        let options = SimpleFileOptions::default();
        writer.start_file("info.txt", options).unwrap();
        writer.write_all(b"\"ID\" \"ZIPPED\"").unwrap();
        writer
            .start_file("Resources/ChamberPak/icon.png", options)
            .unwrap();
        writer.write_all(b"png").unwrap();
        writer.finish().unwrap();

        let archive = PackageArchive::open(&zip_path).unwrap();
        assert!(archive.has_entry("info.txt"));
        assert!(archive
            .names()
            .any(|n| n == "resources/chamberpak/icon.png"));
        assert_eq!(archive.read_to_string("info.txt").unwrap(), "\"ID\" \"ZIPPED\"");

        let dest = temp.path().join("out");
        archive
            .extract("resources/chamberpak/icon.png", &dest)
            .unwrap();
        assert!(dest.join("Resources/ChamberPak/icon.png").is_file());
    }

    #[test]
    fn test_open_rejects_plain_file() {
        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("readme.md");
        std::fs::write(&plain, "hi").unwrap();
        assert!(matches!(
            PackageArchive::open(&plain),
            Err(Error::NotAnArchive { .. })
        ));
    }
}
