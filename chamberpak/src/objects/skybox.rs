//! Skybox definitions

use crate::error::Result;
use crate::formats::keyvalues::Tree;
use crate::objects::{get_config, ParseContext, SelitemData};

/// A skybox definition.
#[derive(Clone, Debug)]
pub struct Skybox {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    pub selitem_data: SelitemData,
    pub config: Tree,
    /// The skybox material.
    pub material: String,
}

impl Skybox {
    /// Parse a skybox definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        let info = ctx.info;
        let selitem_data = SelitemData::parse(info)?;
        let material = info.get_or("material", "sky_black").to_string();
        let config = get_config(info, ctx.archive, "skybox", ctx.pak_id, "config")?;

        Ok(Skybox {
            id: ctx.id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            selitem_data,
            config,
            material,
        })
    }

    /// Append the override's compiler config and authors.
    pub(crate) fn add_override(&mut self, other: Skybox) {
        self.selitem_data.authors.extend(other.selitem_data.authors);
        self.config.extend(other.config);
    }
}
