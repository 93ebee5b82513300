//! Point entities used for placement and targeting.

use bsp_entities_macros::EntityClass;

use crate::entity::Entity;
use crate::properties::Vec3;

/// Single-player spawn point.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "info_player_start")]
pub struct PlayerStart {
    #[entity(base)]
    pub base: Entity,

    pub origin: Vec3,

    /// Facing yaw in degrees
    pub angle: f32,
}

/// Multiplayer spawn point. Shares the single-player spawn fields.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "info_player_deathmatch")]
pub struct PlayerDeathmatch {
    #[entity(base)]
    pub base: PlayerStart,
}

/// Named position other entities aim at.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "info_target")]
pub struct InfoTarget {
    #[entity(base)]
    pub base: Entity,

    pub origin: Vec3,
    pub targetname: String,
}
