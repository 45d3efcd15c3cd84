//! Background music definitions

use crate::error::Result;
use crate::formats::keyvalues::Tree;
use crate::objects::{get_config, ParseContext, SelitemData};

/// A background music definition.
#[derive(Clone, Debug)]
pub struct Music {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    pub selitem_data: SelitemData,
    pub config: Tree,
    /// Instance placed to play the music.
    pub instance: Option<String>,
    /// Soundscript name.
    pub soundscript: Option<String>,
}

impl Music {
    /// Parse a music definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        let info = ctx.info;
        let selitem_data = SelitemData::parse(info)?;
        let instance = info.get_opt("instance").map(str::to_string);
        let soundscript = info.get_opt("soundscript").map(str::to_string);
        // Music configs live in the skybox folder.
        let config = get_config(info, ctx.archive, "skybox", ctx.pak_id, "config")?;

        Ok(Music {
            id: ctx.id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            selitem_data,
            config,
            instance,
            soundscript,
        })
    }

    /// Append the override's compiler config and authors.
    pub(crate) fn add_override(&mut self, other: Music) {
        self.config.extend(other.config);
        self.selitem_data.authors.extend(other.selitem_data.authors);
    }
}
