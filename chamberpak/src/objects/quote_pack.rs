//! Voice line packs

use crate::error::Result;
use crate::formats::keyvalues::Tree;
use crate::objects::{get_config, ParseContext, SelitemData};

/// A voice line pack.
#[derive(Clone, Debug)]
pub struct QuotePack {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    pub selitem_data: SelitemData,
    /// The quote definitions.
    pub config: Tree,
    /// Characters the pack speaks for.
    pub chars: Vec<String>,
}

impl QuotePack {
    /// Parse a voice line definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        let info = ctx.info;
        let selitem_data = SelitemData::parse(info)?;
        let mut chars: Vec<String> = Vec::new();
        for part in info.get_or("characters", "").split(',') {
            let part = part.trim();
            if !part.is_empty() && !chars.iter().any(|c| c == part) {
                chars.push(part.to_string());
            }
        }
        let config = get_config(info, ctx.archive, "voice", ctx.pak_id, "file")?;

        Ok(QuotePack {
            id: ctx.id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            selitem_data,
            config,
            chars,
        })
    }

    /// Append the override's lines, folding duplicate quote blocks together.
    pub(crate) fn add_override(&mut self, other: QuotePack) {
        self.selitem_data.authors.extend(other.selitem_data.authors);
        self.config.extend(other.config);
        self.config.merge_children(&["quotes_sp", "quotes_coop"]);
    }
}
