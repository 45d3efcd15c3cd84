//! Error types for `ChamberPak`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ChamberPak` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip archive error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// UTF-8 conversion error while reading an archive entry.
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    // ==================== Package Scan Errors ====================
    /// The configured packages directory does not exist.
    #[error("packages directory not found: {path}")]
    PackagesDirNotFound {
        /// The missing directory.
        path: PathBuf,
    },

    /// The candidate path is neither a zip archive nor a directory.
    #[error("not a package archive: {path}")]
    NotAnArchive {
        /// The rejected path.
        path: PathBuf,
    },

    /// A package manifest has no `ID` key.
    #[error("package at {path} has no \"ID\" in info.txt")]
    PackageMissingId {
        /// The package location.
        path: PathBuf,
    },

    /// Two packages declare the same id.
    #[error("package id \"{id}\" defined twice (second copy at {path})")]
    DuplicatePackage {
        /// The colliding package id.
        id: String,
        /// Location of the second copy.
        path: PathBuf,
    },

    /// An object record points at a package id that is not in the table.
    #[error("package \"{id}\" is not registered")]
    PackageNotRegistered {
        /// The missing package id.
        id: String,
    },

    /// The requested entry does not exist in the package archive.
    #[error("\"{package}:{path}\" not in package")]
    EntryNotFound {
        /// The package id.
        package: String,
        /// The entry path inside the archive.
        path: String,
    },

    // ==================== Manifest / KeyValues Errors ====================
    /// Malformed KeyValues text.
    #[error("KeyValues syntax error in {source_label} (line {line}): {message}")]
    KeyValuesSyntax {
        /// Which file/entry was being parsed.
        source_label: String,
        /// 1-based line number of the offending token.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A required key is absent from a KeyValues block.
    #[error("no \"{key}\" key in block")]
    MissingKey {
        /// The key that was looked up.
        key: String,
    },

    /// A required key is absent from an object definition.
    ///
    /// This is [`Error::MissingKey`] with the owning object attached, raised
    /// by the resolution pipeline so load failures name the object at fault.
    #[error("no \"{key}\" in {kind} object \"{id}\"")]
    MissingObjectKey {
        /// The key that was looked up.
        key: String,
        /// The object kind's manifest section name.
        kind: &'static str,
        /// The object id.
        id: String,
    },

    // ==================== Object Resolution Errors ====================
    /// An object id was defined twice for a kind that forbids duplicates.
    #[error("{kind} \"{id}\" defined twice")]
    DuplicateObject {
        /// The object kind's manifest section name.
        kind: &'static str,
        /// The colliding object id.
        id: String,
    },

    /// An item declares no versions at all.
    #[error("item \"{id}\" has no versions")]
    ItemNoVersions {
        /// The item id.
        id: String,
    },

    /// An item version references no style folders at all.
    #[error("item \"{id}\" version \"{version}\" has no styles")]
    VersionNoStyles {
        /// The item id.
        id: String,
        /// The version id.
        version: String,
    },

    /// An item folder referenced by a version is missing its definition files.
    #[error("\"{package}:items/{folder}\" not valid, folder likely missing")]
    InvalidItemFolder {
        /// The package id.
        package: String,
        /// The item folder name.
        folder: String,
    },
}

impl Error {
    /// Attach the owning object to a [`Error::MissingKey`], leaving every
    /// other variant untouched.
    #[must_use]
    pub fn for_object(self, kind: &'static str, id: &str) -> Self {
        match self {
            Error::MissingKey { key } => Error::MissingObjectKey {
                key,
                kind,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

/// A specialized Result type for `ChamberPak` operations.
pub type Result<T> = std::result::Result<T, Error>;
