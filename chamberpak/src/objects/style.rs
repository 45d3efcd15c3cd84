//! Visual styles and their inheritance metadata

use crate::error::{Error, Result};
use crate::formats::keyvalues::Tree;
use crate::objects::{ParseContext, SelitemData};

/// Suggested companion objects for a style, shown as defaults in the UI.
#[derive(Clone, Debug)]
pub struct SuggestedDefaults {
    pub quote: String,
    pub music: String,
    pub skybox: String,
    pub goo: String,
    pub elevator: String,
}

/// Corridor display names, one tree per corridor group.
#[derive(Clone, Debug, Default)]
pub struct CorridorNames {
    pub sp_entry: Tree,
    pub sp_exit: Tree,
    pub coop: Tree,
}

/// A visual style definition.
#[derive(Clone, Debug)]
pub struct Style {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    pub selitem_data: SelitemData,
    /// The style's `items.txt` editor definitions.
    pub editor: Tree,
    /// The style's compiler config.
    pub config: Tree,
    /// Id of the style this one inherits from, if any.
    pub base_style: Option<String>,
    /// Ancestor chain ids, self first. Computed by the style-tree resolver;
    /// empty until then.
    pub bases: Vec<String>,
    pub suggested: SuggestedDefaults,
    pub has_video: bool,
    pub corridor_names: CorridorNames,
}

impl Style {
    /// Parse a style definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        let info = ctx.info;
        let selitem_data = SelitemData::parse(info)?;
        let base_style = match info.get_or("base", "") {
            "" => None,
            base => Some(base.to_string()),
        };
        let has_video = info.bool_or("has_video", true);

        let sugg = info.find_block("suggested");
        let suggested = SuggestedDefaults {
            quote: sugg.get_or("quote", "<NONE>").to_string(),
            music: sugg.get_or("music", "<NONE>").to_string(),
            skybox: sugg.get_or("skybox", "SKY_BLACK").to_string(),
            goo: sugg.get_or("goo", "GOO_NORM").to_string(),
            elevator: sugg.get_or("elev", "<NONE>").to_string(),
        };

        let corridors = info.find_block("corridors");
        let corridor_names = CorridorNames {
            sp_entry: corridors.find_block("sp_entry").clone(),
            sp_exit: corridors.find_block("sp_exit").clone(),
            coop: corridors.find_block("coop").clone(),
        };

        let folder = format!("styles/{}", info.get("folder")?);
        let items_path = format!("{folder}/items.txt");
        let editor = Tree::parse(
            &ctx.archive.read_to_string(&items_path)?,
            &format!("{}:{items_path}", ctx.pak_id),
        )?;

        let config_path = format!("{folder}/vbsp_config.cfg");
        let config = match ctx.archive.read_to_string(&config_path) {
            Ok(text) => Tree::parse(&text, &format!("{}:{config_path}", ctx.pak_id))?,
            Err(Error::EntryNotFound { .. }) => Tree::new(),
            Err(err) => return Err(err),
        };

        Ok(Style {
            id: ctx.id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            selitem_data,
            editor,
            config,
            base_style,
            bases: Vec::new(),
            suggested,
            has_video,
            corridor_names,
        })
    }

    /// Append an override's editor commands, config and authors.
    pub(crate) fn add_override(&mut self, other: Style) {
        self.editor.extend(other.editor);
        self.config.extend(other.config);
        self.selitem_data.authors.extend(other.selitem_data.authors);
    }
}
