//! Elevator video definitions
//!
//! Mainly defined for the stock game's videos - custom videos can't be
//! packed into maps.

use crate::error::Result;
use crate::objects::{ParseContext, SelitemData};

/// An elevator video definition.
#[derive(Clone, Debug)]
pub struct ElevatorVid {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    pub selitem_data: SelitemData,
    /// Whether separate horizontal/vertical videos exist.
    pub has_orient: bool,
    pub horiz_video: String,
    pub vert_video: String,
}

impl ElevatorVid {
    /// Parse an elevator video definition.
    pub(crate) fn parse(ctx: &ParseContext<'_>) -> Result<Self> {
        let info = ctx.info;
        let selitem_data = SelitemData::parse(info)?;

        let (has_orient, horiz_video, vert_video) = if info.find_key("vert_video").is_some() {
            (
                true,
                info.get("horiz_video")?.to_string(),
                info.get("vert_video")?.to_string(),
            )
        } else {
            let video = info.get("video")?.to_string();
            (false, video.clone(), video)
        };

        Ok(ElevatorVid {
            id: ctx.id.to_string(),
            package_id: String::new(),
            package_name: String::new(),
            selitem_data,
            has_orient,
            horiz_video,
            vert_video,
        })
    }
}
