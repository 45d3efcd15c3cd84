//! Resource pack lists

use crate::error::Result;
use crate::objects::ParseContext;
use crate::utils::clean_line;

/// A list of files to pack into maps, with optional trigger materials.
#[derive(Clone, Debug)]
pub struct PackList {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    /// Files to pack.
    pub files: Vec<String>,
    /// Materials which trigger the pack list when used.
    pub trigger_mats: Vec<String>,
}

impl PackList {
    /// Parse a pack list definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        let info = ctx.info;
        let trigger_mats: Vec<String> = info
            .find_all("AddIfMat")
            .filter_map(|n| n.text().map(str::to_string))
            .collect();

        let files = match info.find_key("Config") {
            // A child block defines the pack list inline.
            Some(node) if node.has_children() => node
                .children()
                .map(|tree| {
                    tree.nodes()
                        .iter()
                        .filter_map(|n| n.text().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            Some(node) => {
                let value = node.text().unwrap_or("");
                if value.is_empty() {
                    Vec::new()
                } else {
                    let path = format!("pack/{value}.cfg");
                    // Each line is a file to pack. Blank lines and //
                    // comments are skipped.
                    ctx.archive
                        .read_to_string(&path)?
                        .lines()
                        .map(clean_line)
                        .filter(|line| !line.is_empty())
                        .map(str::to_string)
                        .collect()
                }
            }
            None => {
                tracing::warn!("PackList \"{}\" has no Config", ctx.id);
                Vec::new()
            }
        };

        Ok(PackList {
            id: ctx.id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            files,
            trigger_mats,
        })
    }

    /// Append the override's files and trigger materials, skipping entries
    /// already present.
    pub(crate) fn add_override(&mut self, other: PackList) {
        for file in other.files {
            if !self.files.contains(&file) {
                self.files.push(file);
            }
        }
        for mat in other.trigger_mats {
            if !self.trigger_mats.contains(&mat) {
                self.trigger_mats.push(mat);
            }
        }
    }
}
