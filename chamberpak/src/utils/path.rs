//! Path utilities

use std::path::Path;

/// Normalize an archive entry path for case-insensitive comparison:
/// backslashes become forward slashes and ASCII letters are lowercased.
#[must_use]
pub fn normalize_entry(entry: &str) -> String {
    entry.replace('\\', "/").to_ascii_lowercase()
}

/// Normalize path separators to forward slashes.
#[must_use]
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_entry() {
        assert_eq!(
            normalize_entry("Resources\\ChamberPak\\Icon.PNG"),
            "resources/chamberpak/icon.png"
        );
        assert_eq!(normalize_entry("info.txt"), "info.txt");
    }
}
