//! Light-emitting and atmosphere entities.

use bsp_entities_macros::EntityClass;

use crate::entity::Entity;
use crate::properties::{Color32, Vec3};

/// Static point light.
///
/// Color and brightness arrive packed in the `_light` key as
/// `"R G B brightness"`; the fourth segment reads as full brightness when
/// omitted.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "light")]
pub struct Light {
    #[entity(base)]
    pub base: Entity,

    pub origin: Vec3,

    #[entity(key = "_light")]
    pub light: Color32,

    /// Appearance preset index (0 is steady)
    pub style: i32,
}

/// Outdoor sun and skylight.
///
/// Extends [`Light`] with the sun direction: `angle` is the compass yaw and
/// `pitch` the elevation, both in degrees.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "light_environment")]
pub struct LightEnvironment {
    #[entity(base)]
    pub base: Light,

    pub pitch: f32,
    pub angle: f32,
}

/// Controls distance fog for the whole map.
#[derive(Debug, Default, EntityClass)]
#[entity(class_name = "env_fog_controller")]
pub struct EnvFogController {
    #[entity(base)]
    pub base: Entity,

    #[entity(key = "fogcolor")]
    pub fog_color: Color32,

    #[entity(key = "fogstart")]
    pub fog_start: f32,

    #[entity(key = "fogend")]
    pub fog_end: f32,

    #[entity(key = "fogenable")]
    pub fog_enable: bool,
}
