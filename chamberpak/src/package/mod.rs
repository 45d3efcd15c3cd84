//! Package discovery and archive access

mod archive;
mod scanner;

pub use archive::PackageArchive;
pub use scanner::{find_packages, Package};

/// Name of the manifest entry that marks an archive as a package.
pub const MANIFEST_NAME: &str = "info.txt";
