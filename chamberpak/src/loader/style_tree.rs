//! Style inheritance resolution
//!
//! Guarantees that every version of every item has a definition for every
//! known style. The priority for a missing style is:
//! - exact match (already present)
//! - parent style, grandparent style, ...
//! - the version's first style folder (default version only)
//! - the default version's already-resolved entry (other versions)

use indexmap::IndexMap;

use crate::loader::LoadConfig;
use crate::objects::{Item, Style, StyleDef, Version};

/// Compute every style's base chain and fill every item version's style
/// map so no style id is ever missing.
pub(crate) fn setup_style_tree(items: &mut [Item], styles: &mut [Style], config: &LoadConfig) {
    // Walk each style's base reference until the referenced id isn't found
    // anymore. A missing base simply ends the chain.
    let base_refs: IndexMap<String, Option<String>> = styles
        .iter()
        .map(|s| (s.id.clone(), s.base_style.clone()))
        .collect();
    for style in styles.iter_mut() {
        let mut bases = vec![style.id.clone()];
        let mut next = style.base_style.as_deref();
        while let Some(id) = next {
            if bases.iter().any(|b| b == id) {
                tracing::warn!("style \"{}\" has a base style cycle at \"{id}\"", style.id);
                break;
            }
            match base_refs.get(id) {
                Some(base) => {
                    bases.push(id.to_string());
                    next = base.as_deref();
                }
                None => break,
            }
        }
        style.bases = bases;
    }

    let chains: IndexMap<&str, &[String]> = styles
        .iter()
        .map(|s| (s.id.as_str(), s.bases.as_slice()))
        .collect();

    // Copy definitions around so every item has data for every style.
    for item in items.iter_mut() {
        resolve_item(item, &chains, config);
    }
}

fn resolve_item(item: &mut Item, chains: &IndexMap<&str, &[String]>, config: &LoadConfig) {
    // The default version is resolved first; other versions fall back to
    // its entries, which are complete by then.
    let def_id = item.def_version.clone();
    let Some(def_version) = item.versions.get_mut(&def_id) else {
        return;
    };
    resolve_version(def_version, true, None, &item.id, item.unstyled, chains, config);
    let def_styles = def_version.styles.clone();

    for version in item.versions.values_mut() {
        if version.id == def_id {
            continue;
        }
        resolve_version(
            version,
            false,
            Some(&def_styles),
            &item.id,
            item.unstyled,
            chains,
            config,
        );
    }
}

fn resolve_version(
    version: &mut Version,
    is_default: bool,
    def_styles: Option<&IndexMap<String, StyleDef>>,
    item_id: &str,
    unstyled: bool,
    chains: &IndexMap<&str, &[String]>,
    config: &LoadConfig,
) {
    for (&style_id, &bases) in chains {
        if version.styles.contains_key(style_id) {
            continue; // We already have a definition
        }

        // Nearest ancestor with a definition in this version wins. The
        // adopted definition is deep-cloned, so a later mutation of one
        // entry can't leak into the other.
        let parent = bases
            .iter()
            .skip(1)
            .find(|base| version.styles.contains_key(base.as_str()));
        if let Some(parent) = parent {
            if config.log_item_fallbacks && !unstyled {
                tracing::info!(
                    "item \"{item_id}\" using parent \"{parent}\" for \"{style_id}\""
                );
            }
            if let Some(def) = version.styles.get(parent.as_str()).cloned() {
                version.styles.insert(style_id.to_string(), def);
            }
            continue;
        }

        if is_default {
            // No ancestor matched: use the first style folder.
            if config.log_missing_styles && !unstyled {
                tracing::info!("item \"{item_id}\" using inappropriate style for \"{style_id}\"");
            }
            version
                .styles
                .insert(style_id.to_string(), version.def_style.clone());
        } else if let Some(def) = def_styles.and_then(|s| s.get(style_id)) {
            // Non-default versions borrow the default version's entry.
            version.styles.insert(style_id.to_string(), def.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::keyvalues::Tree;
    use crate::objects::{CorridorNames, SelitemData, SuggestedDefaults};
    use std::path::PathBuf;

    fn test_config() -> LoadConfig {
        LoadConfig {
            packages_dir: PathBuf::new(),
            cache_dir: PathBuf::new(),
            image_dir: PathBuf::new(),
            log_item_fallbacks: false,
            log_missing_styles: false,
            log_missing_ent_count: false,
        }
    }

    fn style(id: &str, base: Option<&str>) -> Style {
        Style {
            id: id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            selitem_data: SelitemData::default(),
            editor: Tree::new(),
            config: Tree::new(),
            base_style: base.map(str::to_string),
            bases: Vec::new(),
            suggested: SuggestedDefaults {
                quote: "<NONE>".to_string(),
                music: "<NONE>".to_string(),
                skybox: "SKY_BLACK".to_string(),
                goo: "GOO_NORM".to_string(),
                elevator: "<NONE>".to_string(),
            },
            has_video: true,
            corridor_names: CorridorNames::default(),
        }
    }

    fn style_def(marker: &str) -> StyleDef {
        StyleDef {
            authors: vec![marker.to_string()],
            tags: Vec::new(),
            description: Vec::new(),
            ent_count: "??".to_string(),
            url: None,
            icons: IndexMap::new(),
            all_name: None,
            all_icon: None,
            editor: Tree::new(),
            editor_extra: Vec::new(),
            config: Tree::new(),
        }
    }

    fn item(id: &str, versions: Vec<Version>) -> Item {
        let def_version = versions[0].id.clone();
        Item {
            id: id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            versions: versions.into_iter().map(|v| (v.id.clone(), v)).collect(),
            def_version,
            needs_unlock: false,
            all_conf: Tree::new(),
            unstyled: false,
            global_desc: Vec::new(),
            global_desc_last: false,
        }
    }

    fn version(id: &str, styles: &[(&str, &str)]) -> Version {
        let styles: IndexMap<String, StyleDef> = styles
            .iter()
            .map(|(style_id, marker)| (style_id.to_string(), style_def(marker)))
            .collect();
        let def_style = styles
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| style_def("def"));
        Version {
            id: id.to_string(),
            name: "Regular".to_string(),
            is_wip: false,
            is_deprecated: false,
            styles,
            def_style,
        }
    }

    #[test]
    fn test_base_chains() {
        let mut styles = vec![
            style("CLEAN", None),
            style("MODERN", Some("CLEAN")),
            style("FUTURE", Some("MODERN")),
            style("ORPHAN", Some("MISSING")),
        ];
        setup_style_tree(&mut [], &mut styles, &test_config());

        assert_eq!(styles[0].bases, vec!["CLEAN"]);
        assert_eq!(styles[2].bases, vec!["FUTURE", "MODERN", "CLEAN"]);
        // A missing base just ends the chain.
        assert_eq!(styles[3].bases, vec!["ORPHAN"]);
        // bases[0] is always the style itself.
        for style in &styles {
            assert_eq!(style.bases[0], style.id);
        }
    }

    #[test]
    fn test_base_cycle_terminates() {
        let mut styles = vec![style("A", Some("B")), style("B", Some("A"))];
        setup_style_tree(&mut [], &mut styles, &test_config());
        assert_eq!(styles[0].bases, vec!["A", "B"]);
        assert_eq!(styles[1].bases, vec!["B", "A"]);
    }

    #[test]
    fn test_parent_fallback() {
        let mut styles = vec![style("MODERN", None), style("FUTURE", Some("MODERN"))];
        let mut items = vec![item(
            "ITEM1",
            vec![version("VER_DEFAULT", &[("MODERN", "modern-def")])],
        )];
        setup_style_tree(&mut items, &mut styles, &test_config());

        let ver = &items[0].versions["VER_DEFAULT"];
        // FUTURE inherits MODERN's definition.
        assert_eq!(ver.styles["FUTURE"].authors, vec!["modern-def"]);
        assert_eq!(ver.styles.len(), 2);
    }

    #[test]
    fn test_totality_over_all_versions() {
        let mut styles = vec![
            style("CLEAN", None),
            style("MODERN", Some("CLEAN")),
            style("RETRO", None),
        ];
        let mut items = vec![item(
            "ITEM1",
            vec![
                version("VER_DEFAULT", &[("CLEAN", "clean-def")]),
                version("VER_WIP", &[]),
            ],
        )];
        setup_style_tree(&mut items, &mut styles, &test_config());

        for version in items[0].versions.values() {
            for style in &styles {
                assert!(
                    version.styles.contains_key(&style.id),
                    "version {} missing style {}",
                    version.id,
                    style.id
                );
            }
        }
        // RETRO has no ancestors: the default version used its first
        // folder, and the WIP version copied the default version's entry.
        assert_eq!(
            items[0].versions["VER_DEFAULT"].styles["RETRO"].authors,
            vec!["clean-def"]
        );
        assert_eq!(
            items[0].versions["VER_WIP"].styles["RETRO"].authors,
            vec!["clean-def"]
        );
    }

    #[test]
    fn test_exact_match_untouched() {
        let mut styles = vec![style("MODERN", None), style("FUTURE", Some("MODERN"))];
        let mut items = vec![item(
            "ITEM1",
            vec![version(
                "VER_DEFAULT",
                &[("MODERN", "modern-def"), ("FUTURE", "future-def")],
            )],
        )];
        setup_style_tree(&mut items, &mut styles, &test_config());

        let ver = &items[0].versions["VER_DEFAULT"];
        assert_eq!(ver.styles["FUTURE"].authors, vec!["future-def"]);
    }
}
