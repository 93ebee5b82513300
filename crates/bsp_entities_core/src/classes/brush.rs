//! Brush-backed structural entities.

use bsp_entities_macros::EntityClass;

use crate::entity::Entity;
use crate::properties::Color32;

/// The map itself. Every compiled map carries exactly one, conventionally as
/// the first group in the lump.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "worldspawn")]
pub struct Worldspawn {
    #[entity(base)]
    pub base: Entity,

    /// Title shown when the map loads
    pub message: String,

    /// Name of the sky texture set
    pub skyname: String,

    /// CD track index
    pub sounds: i32,

    /// Semicolon-separated texture archive paths
    pub wad: String,
}

/// Solid wall with adjustable render settings.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "func_wall")]
pub struct FuncWall {
    #[entity(base)]
    pub base: Entity,

    pub rendermode: i32,
    pub renderamt: i32,
    pub rendercolor: Color32,
}

/// Volume that fires its target whenever something touches it.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "trigger_multiple")]
pub struct TriggerMultiple {
    #[entity(base)]
    pub base: Entity,

    /// Name of the entity to fire
    pub target: String,

    /// Seconds between touch and firing
    pub delay: f32,

    /// Seconds before the trigger rearms
    pub wait: f32,
}
