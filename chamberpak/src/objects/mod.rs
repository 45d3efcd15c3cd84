//! Typed package objects
//!
//! Every object a package can define is one of the nine kinds below. The
//! kind table is a closed enum rather than a runtime registry: each kind
//! knows its manifest section name, whether a second definition of an id is
//! demoted to an override or is a fatal error, and whether the selector UI
//! shows an image for it.

pub mod editor_sound;
pub mod elevator;
pub mod item;
pub mod music;
pub mod pack_list;
pub mod quote_pack;
pub mod skybox;
pub mod style;
pub mod style_var;

pub use editor_sound::EditorSound;
pub use elevator::ElevatorVid;
pub use item::{Item, StyleDef, Version};
pub use music::Music;
pub use pack_list::PackList;
pub use quote_pack::QuotePack;
pub use skybox::Skybox;
pub use style::{CorridorNames, Style, SuggestedDefaults};
pub use style_var::StyleVar;

use crate::error::Result;
use crate::formats::keyvalues::Tree;
use crate::package::PackageArchive;
use crate::utils::sep_values;

/// Everything a kind parser needs to read one object definition.
pub(crate) struct ParseContext<'a> {
    /// The archive of the defining package.
    pub archive: &'a PackageArchive,
    /// The object id.
    pub id: &'a str,
    /// The object's manifest block.
    pub info: &'a Tree,
    /// Id of the defining package.
    pub pak_id: &'a str,
    /// Warn when an item folder has no entity count.
    pub log_missing_ent_count: bool,
}

/// The nine object kinds, in registration (and therefore resolution) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Style,
    Item,
    QuotePack,
    Skybox,
    Music,
    StyleVar,
    Elevator,
    PackList,
    EditorSound,
}

impl ObjectKind {
    /// All kinds, in resolution order.
    pub const ALL: [ObjectKind; 9] = [
        ObjectKind::Style,
        ObjectKind::Item,
        ObjectKind::QuotePack,
        ObjectKind::Skybox,
        ObjectKind::Music,
        ObjectKind::StyleVar,
        ObjectKind::Elevator,
        ObjectKind::PackList,
        ObjectKind::EditorSound,
    ];

    /// The manifest section name for this kind.
    #[must_use]
    pub fn section(self) -> &'static str {
        match self {
            ObjectKind::Style => "Style",
            ObjectKind::Item => "Item",
            ObjectKind::QuotePack => "QuotePack",
            ObjectKind::Skybox => "Skybox",
            ObjectKind::Music => "Music",
            ObjectKind::StyleVar => "StyleVar",
            ObjectKind::Elevator => "Elevator",
            ObjectKind::PackList => "PackList",
            ObjectKind::EditorSound => "EditorSound",
        }
    }

    /// Whether a second definition of an id is demoted to an override
    /// instead of being a duplicate-id error.
    #[must_use]
    pub fn allow_duplicates(self) -> bool {
        matches!(self, ObjectKind::StyleVar | ObjectKind::PackList)
    }

    /// Whether the selector UI loads an image for objects of this kind.
    #[must_use]
    pub fn has_image(self) -> bool {
        !matches!(self, ObjectKind::StyleVar | ObjectKind::PackList)
    }

    /// Parse one object definition of this kind.
    pub(crate) fn parse(self, ctx: &ParseContext<'_>) -> Result<Object> {
        Ok(match self {
            ObjectKind::Style => Object::Style(Style::parse(ctx)?),
            ObjectKind::Item => Object::Item(Item::parse(ctx)?),
            ObjectKind::QuotePack => Object::QuotePack(QuotePack::parse(ctx)?),
            ObjectKind::Skybox => Object::Skybox(Skybox::parse(ctx)?),
            ObjectKind::Music => Object::Music(Music::parse(ctx)?),
            ObjectKind::StyleVar => Object::StyleVar(StyleVar::parse(ctx)?),
            ObjectKind::Elevator => Object::Elevator(ElevatorVid::parse(ctx)?),
            ObjectKind::PackList => Object::PackList(PackList::parse(ctx)?),
            ObjectKind::EditorSound => Object::EditorSound(EditorSound::parse(ctx)?),
        })
    }
}

/// A parsed object of any kind.
#[derive(Clone, Debug)]
pub enum Object {
    Style(Style),
    Item(Item),
    QuotePack(QuotePack),
    Skybox(Skybox),
    Music(Music),
    StyleVar(StyleVar),
    Elevator(ElevatorVid),
    PackList(PackList),
    EditorSound(EditorSound),
}

impl Object {
    /// Stamp the owning package onto the object.
    pub(crate) fn set_package(&mut self, pak_id: &str, pak_name: &str) {
        let (id, name) = match self {
            Object::Style(o) => (&mut o.package_id, &mut o.package_name),
            Object::Item(o) => (&mut o.package_id, &mut o.package_name),
            Object::QuotePack(o) => (&mut o.package_id, &mut o.package_name),
            Object::Skybox(o) => (&mut o.package_id, &mut o.package_name),
            Object::Music(o) => (&mut o.package_id, &mut o.package_name),
            Object::StyleVar(o) => (&mut o.package_id, &mut o.package_name),
            Object::Elevator(o) => (&mut o.package_id, &mut o.package_name),
            Object::PackList(o) => (&mut o.package_id, &mut o.package_name),
            Object::EditorSound(o) => (&mut o.package_id, &mut o.package_name),
        };
        *id = pak_id.to_string();
        *name = pak_name.to_string();
    }

    /// Fold an override definition of the same kind into this object.
    pub(crate) fn add_override(&mut self, other: Object) {
        match (self, other) {
            (Object::Style(base), Object::Style(over)) => base.add_override(over),
            (Object::Item(base), Object::Item(over)) => base.add_override(over),
            (Object::QuotePack(base), Object::QuotePack(over)) => base.add_override(over),
            (Object::Skybox(base), Object::Skybox(over)) => base.add_override(over),
            (Object::Music(base), Object::Music(over)) => base.add_override(over),
            (Object::StyleVar(base), Object::StyleVar(over)) => base.add_override(over),
            // Elevator overrides are accepted but carry nothing.
            (Object::Elevator(_), Object::Elevator(_)) => {}
            (Object::PackList(base), Object::PackList(over)) => base.add_override(over),
            (Object::EditorSound(base), Object::EditorSound(_)) => {
                tracing::warn!("EditorSound \"{}\" does not support overrides", base.id);
            }
            (base, _) => {
                // The pipeline parses overrides with the base's kind, so
                // mismatched variants cannot occur.
                tracing::error!("override kind mismatch for \"{}\"", base.id());
            }
        }
    }

    /// The object id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Object::Style(o) => &o.id,
            Object::Item(o) => &o.id,
            Object::QuotePack(o) => &o.id,
            Object::Skybox(o) => &o.id,
            Object::Music(o) => &o.id,
            Object::StyleVar(o) => &o.id,
            Object::Elevator(o) => &o.id,
            Object::PackList(o) => &o.id,
            Object::EditorSound(o) => &o.id,
        }
    }
}

/// One line of a selector description: a marker (`line`, `bullet`, ...)
/// plus the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescLine {
    pub kind: String,
    pub text: String,
}

/// Metadata shared by every selectable object: name, author list, icon,
/// description and grouping.
#[derive(Clone, Debug, Default)]
pub struct SelitemData {
    pub name: String,
    pub short_name: String,
    pub authors: Vec<String>,
    pub icon: String,
    pub description: Vec<DescLine>,
    pub group: Option<String>,
}

impl SelitemData {
    pub(crate) fn parse(info: &Tree) -> Result<Self> {
        let name = info.get("name")?.to_string();
        let short_name = match info.get_opt("shortName") {
            Some(short) if !short.is_empty() => short.to_string(),
            _ => name.clone(),
        };
        let group = match info.get_or("group", "") {
            "" => None,
            group => Some(group.to_string()),
        };
        Ok(SelitemData {
            short_name,
            authors: sep_values(info.get_or("authors", "")),
            icon: info.get_or("icon", "_blank").to_string(),
            description: desc_parse(info),
            group,
            name,
        })
    }
}

/// Collect description lines from every `description` entry in a block.
///
/// A plain value is a single `line`; a block contributes one line per child
/// keyed by the child's name (`line`, `bullet`, ...).
pub(crate) fn desc_parse(info: &Tree) -> Vec<DescLine> {
    let mut lines = Vec::new();
    for node in info.find_all("description") {
        match node.children() {
            Some(children) => {
                for child in children {
                    if let Some(text) = child.text() {
                        lines.push(DescLine {
                            kind: child.key().to_string(),
                            text: text.to_string(),
                        });
                    }
                }
            }
            None => {
                if let Some(text) = node.text() {
                    lines.push(DescLine {
                        kind: "line".to_string(),
                        text: text.to_string(),
                    });
                }
            }
        }
    }
    lines
}

/// Extract the config tree a kind block refers to.
///
/// The `key` entry may hold an inline block (copied), an empty value (empty
/// tree), or a filename resolved to `<folder>/<value>.cfg` inside the
/// archive. A missing config file is logged and yields an empty tree.
pub(crate) fn get_config(
    block: &Tree,
    archive: &PackageArchive,
    folder: &str,
    pak_id: &str,
    key: &str,
) -> Result<Tree> {
    let Some(node) = block.find_key(key) else {
        return Ok(Tree::new());
    };
    if let Some(children) = node.children() {
        return Ok(children.clone());
    }
    let value = node.text().unwrap_or("");
    if value.is_empty() {
        return Ok(Tree::new());
    }

    let path = format!("{folder}/{value}.cfg");
    match archive.read_to_string(&path) {
        Ok(text) => Tree::parse(&text, &format!("{pak_id}:{path}")),
        Err(crate::error::Error::EntryNotFound { .. }) => {
            tracing::warn!("\"{pak_id}:{path}\" not in package");
            Ok(Tree::new())
        }
        Err(err) => Err(err),
    }
}
