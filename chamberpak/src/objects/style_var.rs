//! Style variables

use crate::error::Result;
use crate::objects::{ParseContext, Style};

/// A toggleable variable that styles (or compilers) react to.
#[derive(Clone, Debug)]
pub struct StyleVar {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    pub name: String,
    /// Styles the variable applies to; `None` means unrestricted.
    pub styles: Option<Vec<String>>,
    /// Whether the variable starts enabled.
    pub default: bool,
    pub desc: String,
}

impl StyleVar {
    /// Parse a style variable definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        let info = ctx.info;
        let name = info.get("name")?.to_string();
        let unstyled = info.bool_or("unstyled", false);
        let default = info.bool_or("enabled", false);
        let styles: Vec<String> = info
            .find_all("Style")
            .filter_map(|n| n.text().map(str::to_string))
            .collect();
        let desc = info
            .find_all("description")
            .filter_map(|n| n.text())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(StyleVar {
            id: ctx.id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            name,
            styles: if unstyled { None } else { Some(styles) },
            default,
            desc,
        })
    }

    /// Merge an override in: unstyled wins, otherwise style lists union.
    /// Descriptions concatenate unless the override's text already occurs.
    pub(crate) fn add_override(&mut self, other: StyleVar) {
        match (&mut self.styles, other.styles) {
            (None, _) => {}
            (styles @ Some(_), None) => *styles = None,
            (Some(ours), Some(theirs)) => ours.extend(theirs),
        }
        if !other.desc.is_empty() && !self.desc.contains(&other.desc) {
            if self.desc.is_empty() {
                self.desc = other.desc;
            } else {
                self.desc.push_str("\n\n");
                self.desc.push_str(&other.desc);
            }
        }
    }

    /// Whether this variable applies to the given style, directly or via
    /// any style in its base chain.
    #[must_use]
    pub fn applies_to_style(&self, style: &Style) -> bool {
        let Some(styles) = &self.styles else {
            return true; // Unstyled
        };
        styles.contains(&style.id) || style.bases.iter().any(|base| styles.contains(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(styles: Option<Vec<&str>>, desc: &str) -> StyleVar {
        StyleVar {
            id: "VAR".to_string(),
            package_id: String::new(),
            package_name: String::new(),
            name: "Var".to_string(),
            styles: styles.map(|s| s.into_iter().map(str::to_string).collect()),
            default: false,
            desc: desc.to_string(),
        }
    }

    #[test]
    fn test_unstyled_wins() {
        let mut base = var(Some(vec!["CLEAN"]), "");
        base.add_override(var(None, ""));
        assert!(base.styles.is_none());

        let mut base = var(None, "");
        base.add_override(var(Some(vec!["CLEAN"]), ""));
        assert!(base.styles.is_none());
    }

    #[test]
    fn test_style_lists_union() {
        let mut base = var(Some(vec!["CLEAN"]), "");
        base.add_override(var(Some(vec!["RETRO"]), ""));
        assert_eq!(base.styles, Some(vec!["CLEAN".to_string(), "RETRO".to_string()]));
    }

    #[test]
    fn test_desc_merge_is_idempotent() {
        let mut base = var(None, "Enables the thing.");
        base.add_override(var(None, "Enables the thing."));
        assert_eq!(base.desc, "Enables the thing.");

        base.add_override(var(None, "Also affects goo."));
        assert_eq!(base.desc, "Enables the thing.\n\nAlso affects goo.");
    }
}
