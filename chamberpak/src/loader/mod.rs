//! The package load pipeline
//!
//! A strict sequence: scan the packages directory, register every raw
//! object and override record (phase a), parse each unique object once and
//! fold its overrides in (phase b), resolve style inheritance so every item
//! has a definition for every style, then extract resources. Any fatal
//! error aborts the whole load; no partial object set is ever returned.

mod resources;
mod style_tree;

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::formats::keyvalues::Tree;
use crate::objects::{Object, ObjectKind, ParseContext};
use crate::package::{find_packages, Package};
use crate::progress::{LoadProgress, LoadStage};

pub(crate) use resources::{IMAGE_PREFIX, RESOURCE_PREFIX};

/// Where to load from and what to warn about.
#[derive(Clone, Debug)]
pub struct LoadConfig {
    /// Directory containing the package archives.
    pub packages_dir: PathBuf,
    /// Staging directory rebuilt on every load.
    pub cache_dir: PathBuf,
    /// Directory the UI reads resource images from.
    pub image_dir: PathBuf,
    /// Log when an item style falls back to a parent style.
    pub log_item_fallbacks: bool,
    /// Log when an item has no definition at all for a style.
    pub log_missing_styles: bool,
    /// Log item folders without an entity count.
    pub log_missing_ent_count: bool,
}

/// Identity of a loaded package.
#[derive(Clone, Debug)]
pub struct PackageInfo {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
}

/// Everything a load produces: the fully merged and style-resolved object
/// lists.
#[derive(Debug, Default)]
pub struct LoadedData {
    pub packages: Vec<PackageInfo>,
    pub styles: Vec<crate::objects::Style>,
    pub items: Vec<crate::objects::Item>,
    pub quote_packs: Vec<crate::objects::QuotePack>,
    pub skyboxes: Vec<crate::objects::Skybox>,
    pub music: Vec<crate::objects::Music>,
    pub style_vars: Vec<crate::objects::StyleVar>,
    pub elevators: Vec<crate::objects::ElevatorVid>,
    pub pack_lists: Vec<crate::objects::PackList>,
    pub editor_sounds: Vec<crate::objects::EditorSound>,
}

/// A raw object or override record from phase (a): the manifest block plus
/// the package it came from. The archive is looked up through the package
/// table when the record is parsed.
struct RawRecord {
    package_id: String,
    package_name: String,
    block: Tree,
}

#[derive(Default)]
struct KindTable {
    /// id -> owning record, in first-discovery order.
    objects: IndexMap<String, RawRecord>,
    /// id -> queued overrides, in discovery order across packages.
    overrides: IndexMap<String, Vec<RawRecord>>,
}

/// Scan and read in all packages in the configured directory.
pub fn load_packages(
    config: &LoadConfig,
    progress: &mut dyn LoadProgress,
) -> Result<LoadedData> {
    if !config.packages_dir.is_dir() {
        return Err(Error::PackagesDirNotFound {
            path: config.packages_dir.clone(),
        });
    }

    let packages = find_packages(&config.packages_dir)?;
    if packages.is_empty() {
        tracing::warn!("no packages found in {}", config.packages_dir.display());
    }
    progress.set_length(LoadStage::Packages, packages.len());

    // Phase (a): register every raw object and override record.
    let mut tables: IndexMap<ObjectKind, KindTable> = ObjectKind::ALL
        .iter()
        .map(|&kind| (kind, KindTable::default()))
        .collect();
    let mut resource_count = 0;
    let mut image_count = 0;
    for package in packages.values() {
        tracing::info!("reading objects from \"{}\"", package.id);
        register_package(package, &packages, &mut tables)?;
        for name in package.archive.names() {
            if name.starts_with(RESOURCE_PREFIX) {
                resource_count += 1;
                if name.starts_with(IMAGE_PREFIX) {
                    image_count += 1;
                }
            }
        }
        progress.step(LoadStage::Packages);
    }

    let object_count: usize = tables.values().map(|t| t.objects.len()).sum();
    progress.set_length(LoadStage::Objects, object_count);
    progress.set_length(LoadStage::Resources, resource_count);
    progress.set_length(LoadStage::ImageExtract, image_count);
    // The UI loads one image per object, except for kinds without images.
    progress.set_length(
        LoadStage::ImageLoad,
        tables
            .iter()
            .filter(|(kind, _)| kind.has_image())
            .map(|(_, t)| t.objects.len())
            .sum(),
    );

    // Phase (b): parse each unique object once and fold its overrides in.
    let mut data = LoadedData {
        packages: packages
            .values()
            .map(|p| PackageInfo {
                id: p.id.clone(),
                name: p.name.clone(),
                path: p.path.clone(),
            })
            .collect(),
        ..LoadedData::default()
    };
    for (kind, mut table) in tables {
        for (obj_id, record) in table.objects {
            tracing::debug!("loading {} \"{obj_id}\"", kind.section());
            let mut object = parse_record(config, kind, &obj_id, &record, &packages)?;
            object.set_package(&record.package_id, &record.package_name);
            for override_record in table.overrides.shift_remove(&obj_id).unwrap_or_default() {
                let override_obj =
                    parse_record(config, kind, &obj_id, &override_record, &packages)?;
                object.add_override(override_obj);
            }
            store_object(&mut data, object);
            progress.step(LoadStage::Objects);
        }
        for obj_id in table.overrides.keys() {
            tracing::warn!(
                "{} \"{obj_id}\" has overrides but no definition",
                kind.section()
            );
        }
    }

    // Copy resources out of the archives into the staging cache and move
    // the image subtree to where the UI reads it.
    resources::extract_resources(
        packages.values(),
        &config.cache_dir,
        &config.image_dir,
        progress,
    )?;

    // Archives can close now; everything has been read.
    drop(packages);

    tracing::info!("allocating styled items");
    style_tree::setup_style_tree(&mut data.items, &mut data.styles, config);

    Ok(data)
}

/// Phase (a) for one package: queue override records, claim object ids.
fn register_package(
    package: &Package,
    packages: &IndexMap<String, Package>,
    tables: &mut IndexMap<ObjectKind, KindTable>,
) -> Result<()> {
    for pre in package.info.find_block("Prerequisites") {
        let Some(pre_id) = pre.text() else { continue };
        if !packages.contains_key(pre_id) {
            tracing::warn!(
                "package \"{pre_id}\" required for \"{}\" - ignoring package",
                package.id
            );
            return Ok(());
        }
    }

    for (&kind, table) in tables.iter_mut() {
        // Overrides first, so we can match them to the originals.
        for block in package.info.find_all_nested("Overrides", kind.section()) {
            let Some(children) = block.children() else {
                continue;
            };
            let obj_id = children
                .get("id")
                .map_err(|e| e.for_object(kind.section(), &package.id))?
                .to_string();
            table
                .overrides
                .entry(obj_id)
                .or_default()
                .push(record_for(package, children));
        }

        for block in package.info.find_all(kind.section()) {
            let Some(children) = block.children() else {
                continue;
            };
            let obj_id = children
                .get("id")
                .map_err(|e| e.for_object(kind.section(), &package.id))?
                .to_string();
            if table.objects.contains_key(&obj_id) {
                if kind.allow_duplicates() {
                    // Pretend this is an override.
                    table
                        .overrides
                        .entry(obj_id)
                        .or_default()
                        .push(record_for(package, children));
                } else {
                    return Err(Error::DuplicateObject {
                        kind: kind.section(),
                        id: obj_id,
                    });
                }
            } else {
                table.objects.insert(obj_id, record_for(package, children));
            }
        }
    }
    Ok(())
}

fn record_for(package: &Package, block: &Tree) -> RawRecord {
    RawRecord {
        package_id: package.id.clone(),
        package_name: package.name.clone(),
        block: block.clone(),
    }
}

/// Parse one record through its kind's parser, attaching the object id and
/// kind to any missing-key failure.
fn parse_record(
    config: &LoadConfig,
    kind: ObjectKind,
    obj_id: &str,
    record: &RawRecord,
    packages: &IndexMap<String, Package>,
) -> Result<Object> {
    let Some(package) = packages.get(&record.package_id) else {
        // Records are only ever created from a registered package.
        return Err(Error::PackageNotRegistered {
            id: record.package_id.clone(),
        });
    };
    let ctx = ParseContext {
        archive: &package.archive,
        id: obj_id,
        info: &record.block,
        pak_id: &record.package_id,
        log_missing_ent_count: config.log_missing_ent_count,
    };
    kind.parse(&ctx)
        .map_err(|e| e.for_object(kind.section(), obj_id))
}

fn store_object(data: &mut LoadedData, object: Object) {
    match object {
        Object::Style(o) => data.styles.push(o),
        Object::Item(o) => data.items.push(o),
        Object::QuotePack(o) => data.quote_packs.push(o),
        Object::Skybox(o) => data.skyboxes.push(o),
        Object::Music(o) => data.music.push(o),
        Object::StyleVar(o) => data.style_vars.push(o),
        Object::Elevator(o) => data.elevators.push(o),
        Object::PackList(o) => data.pack_lists.push(o),
        Object::EditorSound(o) => data.editor_sounds.push(o),
    }
}
