//! Editor sound definitions
//!
//! The puzzle editor only reads its own soundscript file, so custom sounds
//! have to be collected from packages and emitted there.

use crate::error::Result;
use crate::formats::keyvalues::Tree;
use crate::objects::ParseContext;

/// Prefix applied to every editor sound id in the generated soundscript.
pub const EDITOR_SOUND_PREFIX: &str = "Editor.";

/// A sound usable in the puzzle editor.
#[derive(Clone, Debug)]
pub struct EditorSound {
    /// The soundscript name: [`EDITOR_SOUND_PREFIX`] plus the object id.
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    /// The soundscript body.
    pub keys: Tree,
}

impl EditorSound {
    /// Parse an editor sound definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        Ok(EditorSound {
            id: format!("{EDITOR_SOUND_PREFIX}{}", ctx.id),
            package_id: String::new(),
            package_name: String::new(),
            keys: ctx.info.find_block("keys").clone(),
        })
    }
}
