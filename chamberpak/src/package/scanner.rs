//! Package discovery
//!
//! Walks the packages directory, opening every zip archive and directory it
//! finds. Anything containing an `info.txt` manifest is a package;
//! directories without one are searched recursively for nested packages.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::formats::keyvalues::Tree;
use crate::package::{PackageArchive, MANIFEST_NAME};

/// One discovered package: manifest plus the open archive handle.
///
/// The archive stays open for the whole load; objects and resources are
/// read from it long after the scan.
#[derive(Debug)]
pub struct Package {
    /// The package id (manifest `ID`).
    pub id: String,
    /// Display name (manifest `Name`, defaulting to the id).
    pub name: String,
    /// The parsed manifest.
    pub info: Tree,
    /// The open archive.
    pub archive: PackageArchive,
    /// Where the package lives on disk.
    pub path: PathBuf,
}

/// Search a directory for packages, recursing into non-package
/// subdirectories. Returns the package table keyed by id, in discovery
/// order.
///
/// Unreadable archives are logged and skipped; two packages with the same
/// id are a fatal [`Error::DuplicatePackage`].
pub fn find_packages(dir: &Path) -> Result<IndexMap<String, Package>> {
    let mut packages = IndexMap::new();
    scan_dir(dir, &mut packages)?;
    Ok(packages)
}

fn scan_dir(dir: &Path, packages: &mut IndexMap<String, Package>) -> Result<()> {
    let mut found_pak = false;

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    // Directory enumeration order is platform-dependent; sort so discovery
    // order (and with it override order) is stable.
    paths.sort();

    for path in paths {
        let is_dir = path.is_dir();
        let archive = match PackageArchive::open(&path) {
            Ok(archive) => archive,
            Err(Error::NotAnArchive { .. }) => {
                tracing::info!("extra file: {}", path.display());
                continue;
            }
            Err(err) => {
                tracing::warn!("invalid package \"{}\": {err}", path.display());
                continue;
            }
        };

        if !archive.has_entry(MANIFEST_NAME) {
            if is_dir {
                // Not a package itself, so check the subfolders too.
                tracing::debug!("checking subdir \"{}\" for packages", path.display());
                scan_dir(&path, packages)?;
            } else {
                tracing::warn!("bad package \"{}\": no {MANIFEST_NAME}", path.display());
            }
            continue;
        }

        tracing::info!("reading package \"{}\"", path.display());
        let info = Tree::parse(
            &archive.read_to_string(MANIFEST_NAME)?,
            &format!("{}:{MANIFEST_NAME}", path.display()),
        )?;
        let id = match info.get("ID") {
            Ok(id) => id.to_string(),
            Err(_) => return Err(Error::PackageMissingId { path }),
        };
        if packages.contains_key(&id) {
            return Err(Error::DuplicatePackage { id, path });
        }
        let name = info.get_or("Name", &id).to_string();
        packages.insert(
            id.clone(),
            Package {
                id,
                name,
                info,
                archive,
                path,
            },
        );
        found_pak = true;
    }

    if !found_pak {
        tracing::debug!("no packages in \"{}\"", dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_package(root: &Path, dir: &str, id: &str) {
        let pkg = root.join(dir);
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(
            pkg.join("info.txt"),
            format!("\"ID\" \"{id}\"\n\"Name\" \"{id} package\""),
        )
        .unwrap();
    }

    #[test]
    fn test_finds_packages_and_recurses() {
        let temp = TempDir::new().unwrap();
        write_package(temp.path(), "alpha", "ALPHA");
        write_package(temp.path(), "nested/beta", "BETA");
        // Extra file is skipped
        std::fs::write(temp.path().join("readme.md"), "hi").unwrap();
        // Directory without a manifest anywhere contributes nothing
        std::fs::create_dir_all(temp.path().join("empty/deeper")).unwrap();

        let packages = find_packages(temp.path()).unwrap();
        assert_eq!(packages.len(), 2);
        assert!(packages.contains_key("ALPHA"));
        assert_eq!(packages["BETA"].name, "BETA package");
    }

    #[test]
    fn test_duplicate_package_id_is_fatal() {
        let temp = TempDir::new().unwrap();
        write_package(temp.path(), "one", "SAME");
        write_package(temp.path(), "two", "SAME");
        assert!(matches!(
            find_packages(temp.path()),
            Err(Error::DuplicatePackage { id, .. }) if id == "SAME"
        ));
    }

    #[test]
    fn test_package_without_id_is_fatal() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("info.txt"), "\"Name\" \"anonymous\"").unwrap();
        assert!(matches!(
            find_packages(temp.path()),
            Err(Error::PackageMissingId { .. })
        ));
    }
}
