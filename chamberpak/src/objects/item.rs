//! Puzzle items, their versions, and per-style definitions

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::formats::keyvalues::Tree;
use crate::objects::{desc_parse, get_config, DescLine, ParseContext, SelitemData};
use crate::utils::sep_values;

/// One item definition for one style: everything read from the item
/// folder's `properties.txt`, `editoritems.txt` and `vbsp_config.cfg`.
#[derive(Clone, Debug)]
pub struct StyleDef {
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub description: Vec<DescLine>,
    /// Entity count shown in the UI; `??` when the folder doesn't say.
    pub ent_count: String,
    pub url: Option<String>,
    /// Named icons (`all`, `64`, ...).
    pub icons: IndexMap<String, String>,
    pub all_name: Option<String>,
    pub all_icon: Option<String>,
    /// The first `Item` block of `editoritems.txt`.
    pub editor: Tree,
    /// Any further `Item` blocks (offset catchers, extent items).
    pub editor_extra: Vec<Tree>,
    /// The folder's compiler config.
    pub config: Tree,
}

/// A named variant of an item (regular, WIP, ...).
#[derive(Clone, Debug)]
pub struct Version {
    pub id: String,
    pub name: String,
    pub is_wip: bool,
    pub is_deprecated: bool,
    /// Per-style definitions. Total over every known style once the
    /// style-tree resolver has run.
    pub styles: IndexMap<String, StyleDef>,
    /// The first style folder's definition, the fallback of last resort.
    pub def_style: StyleDef,
}

/// A puzzle item.
#[derive(Clone, Debug)]
pub struct Item {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    /// Versions keyed by id, in definition order.
    pub versions: IndexMap<String, Version>,
    /// Id of the default version (the first one defined).
    pub def_version: String,
    pub needs_unlock: bool,
    /// Config applied in every style.
    pub all_conf: Tree,
    /// Unstyled items don't warn when a style falls back.
    pub unstyled: bool,
    pub global_desc: Vec<DescLine>,
    pub global_desc_last: bool,
}

impl Item {
    /// Parse an item definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        let info = ctx.info;
        let unstyled = info.bool_or("unstyled", false);
        let global_desc = desc_parse(info);
        let global_desc_last = info.bool_or("AllDescLast", false);
        let all_conf = get_config(info, ctx.archive, "items", ctx.pak_id, "all_conf")?;
        let needs_unlock = info.bool_or("needsUnlock", false);

        // First pass: record every version's style -> folder mapping and
        // collect the set of folders to parse.
        struct RawVersion {
            id: String,
            name: String,
            is_wip: bool,
            is_deprecated: bool,
            style_folders: IndexMap<String, String>,
            def_folder: Option<String>,
        }

        let mut raw_versions: Vec<RawVersion> = Vec::new();
        let mut folders: IndexMap<String, Option<StyleDef>> = IndexMap::new();
        for ver_node in info.find_all("version") {
            let Some(ver) = ver_node.children() else {
                continue;
            };
            let mut raw = RawVersion {
                id: ver.get_or("ID", "VER_DEFAULT").to_string(),
                name: ver.get_or("name", "Regular").to_string(),
                is_wip: ver.bool_or("wip", false),
                is_deprecated: ver.bool_or("deprecated", false),
                style_folders: IndexMap::new(),
                def_folder: None,
            };
            for sty_list in ver.find_all("styles") {
                let Some(styles) = sty_list.children() else {
                    continue;
                };
                for sty in styles {
                    let Some(folder) = sty.text() else {
                        continue;
                    };
                    if raw.def_folder.is_none() {
                        raw.def_folder = Some(folder.to_string());
                    }
                    raw.style_folders
                        .insert(sty.key().to_string(), folder.to_string());
                    folders.entry(folder.to_string()).or_insert(None);
                }
            }
            raw_versions.push(raw);
        }

        if raw_versions.is_empty() {
            return Err(Error::ItemNoVersions {
                id: ctx.id.to_string(),
            });
        }

        // Parse each referenced folder exactly once.
        for (folder, slot) in &mut folders {
            *slot = Some(parse_item_folder(ctx, folder)?);
        }

        let def_version = raw_versions[0].id.clone();
        let mut versions = IndexMap::new();
        for raw in raw_versions {
            let def_style = raw
                .def_folder
                .as_ref()
                .and_then(|folder| folders.get(folder).cloned().flatten())
                .ok_or_else(|| Error::VersionNoStyles {
                    id: ctx.id.to_string(),
                    version: raw.id.clone(),
                })?;
            let mut styles = IndexMap::new();
            for (style_id, folder) in raw.style_folders {
                if let Some(Some(def)) = folders.get(&folder) {
                    styles.insert(style_id, def.clone());
                }
            }
            versions.insert(
                raw.id.clone(),
                Version {
                    id: raw.id,
                    name: raw.name,
                    is_wip: raw.is_wip,
                    is_deprecated: raw.is_deprecated,
                    styles,
                    def_style,
                },
            );
        }

        Ok(Item {
            id: ctx.id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            versions,
            def_version,
            needs_unlock,
            all_conf,
            unstyled,
            global_desc,
            global_desc_last,
        })
    }

    /// Fold an override item in: adopt versions and styles the base lacks,
    /// deep-merge the rest.
    pub(crate) fn add_override(&mut self, other: Item) {
        for (ver_id, version) in other.versions {
            match self.versions.get_mut(&ver_id) {
                None => {
                    self.versions.insert(ver_id, version);
                }
                Some(ours) => {
                    for (style_id, style) in version.styles {
                        match ours.styles.get_mut(&style_id) {
                            None => {
                                ours.styles.insert(style_id, style);
                            }
                            Some(our_style) => {
                                our_style.authors.extend(style.authors);
                                our_style.description.extend(style.description);
                                our_style.tags.extend(style.tags);
                                our_style.config.extend(style.config);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Parse one item folder (`items/<folder>/`).
fn parse_item_folder(ctx: &ParseContext<'_>, folder: &str) -> Result<StyleDef> {
    let prop_path = format!("items/{folder}/properties.txt");
    let editor_path = format!("items/{folder}/editoritems.txt");
    let config_path = format!("items/{folder}/vbsp_config.cfg");

    let invalid_folder = || Error::InvalidItemFolder {
        package: ctx.pak_id.to_string(),
        folder: folder.to_string(),
    };

    let props_text = ctx
        .archive
        .read_to_string(&prop_path)
        .map_err(|_| invalid_folder())?;
    let props = Tree::parse(&props_text, &format!("{}:{prop_path}", ctx.pak_id))?
        .find_block("Properties")
        .clone();

    let editor_text = ctx
        .archive
        .read_to_string(&editor_path)
        .map_err(|_| invalid_folder())?;
    let editor_tree = Tree::parse(&editor_text, &format!("{}:{editor_path}", ctx.pak_id))?;

    let mut item_blocks = editor_tree
        .find_all("Item")
        .filter_map(|node| node.children().cloned());
    let editor = item_blocks.next().unwrap_or_default();
    let editor_extra: Vec<Tree> = item_blocks.collect();

    let ent_count = props.get_or("ent_count", "??").to_string();
    if ctx.log_missing_ent_count && ent_count == "??" {
        tracing::warn!("\"{}:{prop_path}\" has missing entity count", ctx.pak_id);
    }

    let icons: IndexMap<String, String> = props
        .find_block("icon")
        .nodes()
        .iter()
        .filter_map(|n| n.text().map(|t| (n.key().to_string(), t.to_string())))
        .collect();
    let all_name = props.get_opt("all_name").map(str::to_string);
    let all_icon = props.get_opt("all_icon").map(str::to_string);

    // If some but not all of the grouping icon parts are present, the
    // author probably forgot one.
    let group_parts = usize::from(all_name.is_some())
        + usize::from(all_icon.is_some())
        + usize::from(icons.contains_key("all"));
    if group_parts > 0 && group_parts < 3 {
        tracing::warn!(
            "\"{}:{prop_path}\" has incomplete grouping icon definition",
            ctx.pak_id
        );
    }

    let config = match ctx.archive.read_to_string(&config_path) {
        Ok(text) => Tree::parse(&text, &format!("{}:{config_path}", ctx.pak_id))?,
        Err(Error::EntryNotFound { .. }) => Tree::new(),
        Err(err) => return Err(err),
    };

    Ok(StyleDef {
        authors: sep_values(props.get_or("authors", "")),
        tags: sep_values(props.get_or("tags", "")),
        description: desc_parse(&props),
        ent_count,
        url: props.get_opt("infoURL").map(str::to_string),
        icons,
        all_name,
        all_icon,
        editor,
        editor_extra,
        config,
    })
}
