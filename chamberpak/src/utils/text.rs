//! Small text helpers shared by the manifest parsers

/// Split a delimited value list and strip whitespace.
///
/// Any of `,`, `;` and `/` separate entries; empty entries are dropped.
#[must_use]
pub fn sep_values(string: &str) -> Vec<String> {
    string
        .split([',', ';', '/'])
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce a KeyValues boolean. Accepts `1/0`, `true/false`, `yes/no`
/// case-insensitively; anything else falls back to the default.
#[must_use]
pub fn conv_bool(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => true,
        "0" | "false" | "no" => false,
        _ => default,
    }
}

/// Strip a `//` comment and surrounding whitespace from a config line.
#[must_use]
pub fn clean_line(line: &str) -> &str {
    let line = match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    };
    line.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sep_values() {
        assert_eq!(
            sep_values("Valve, TeamSpen ;Carl/ "),
            vec!["Valve", "TeamSpen", "Carl"]
        );
        assert!(sep_values("").is_empty());
        assert!(sep_values(" , ;/").is_empty());
    }

    #[test]
    fn test_conv_bool() {
        assert!(conv_bool("1", false));
        assert!(conv_bool("Yes", false));
        assert!(!conv_bool("0", true));
        assert!(!conv_bool("false", true));
        assert!(conv_bool("banana", true));
        assert!(!conv_bool("banana", false));
    }

    #[test]
    fn test_clean_line() {
        assert_eq!(clean_line("  sound/music.wav // ambient"), "sound/music.wav");
        assert_eq!(clean_line("// full comment"), "");
        assert_eq!(clean_line("plain"), "plain");
    }
}
