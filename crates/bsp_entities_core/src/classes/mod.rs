//! Built-in entity variants for common GoldSrc-style classnames.
//!
//! These cover the structural, placement and lighting entities nearly every
//! map carries. Classnames outside this roster still decode, as plain
//! [`Entity`](crate::entity::Entity) records carrying raw properties only.

pub mod brush;
pub mod light;
pub mod point;

pub use brush::{FuncWall, TriggerMultiple, Worldspawn};
pub use light::{EnvFogController, Light, LightEnvironment};
pub use point::{InfoTarget, PlayerDeathmatch, PlayerStart};

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use bsp_entities_macros::EntityClass;

    use super::*;
    use crate::entity::{Entity, EntityClass};
    use crate::properties::FieldKind;
    use crate::registry::EntityClassRegistry;

    /// Exercises key renaming and skipped fields through the derive without
    /// touching the built-in roster.
    #[derive(Debug, Default, EntityClass)]
    #[entity(class_name = "probe_variant")]
    struct ProbeVariant {
        #[entity(base)]
        base: Entity,

        #[entity(key = "probe_speed")]
        speed: f32,

        #[entity(skip)]
        scratch: i32,
    }

    #[test]
    fn test_ancestor_chain_spans_three_levels() {
        let spawn = PlayerDeathmatch::default();
        assert!(spawn.ancestor(TypeId::of::<PlayerDeathmatch>()).is_some());
        assert!(spawn.ancestor(TypeId::of::<PlayerStart>()).is_some());
        assert!(spawn.ancestor(TypeId::of::<Entity>()).is_some());
        assert!(spawn.ancestor(TypeId::of::<Light>()).is_none());
    }

    #[test]
    fn test_display_is_registered_classname() {
        assert_eq!(Light::default().to_string(), "light");
        assert_eq!(PlayerDeathmatch::default().to_string(), "info_player_deathmatch");
    }

    #[test]
    fn test_builtin_field_kinds() {
        let registry = EntityClassRegistry::build().unwrap();

        let worldspawn = registry.resolve("worldspawn").unwrap();
        let table = registry.bindings_for(worldspawn.type_id).unwrap();
        assert_eq!(table.get("message").map(|spec| spec.kind), Some(FieldKind::Text));
        assert_eq!(table.get("sounds").map(|spec| spec.kind), Some(FieldKind::Int));

        let fog = registry.resolve("env_fog_controller").unwrap();
        let table = registry.bindings_for(fog.type_id).unwrap();
        assert_eq!(table.get("fogcolor").map(|spec| spec.kind), Some(FieldKind::Color));
        assert_eq!(table.get("fogenable").map(|spec| spec.kind), Some(FieldKind::Bool));
    }

    #[test]
    fn test_renamed_and_skipped_fields() {
        let registry = EntityClassRegistry::build().unwrap();
        let info = registry.resolve("probe_variant").unwrap();
        let table = registry.bindings_for(info.type_id).unwrap();

        assert!(table.get("probe_speed").is_some());
        assert!(table.get("speed").is_none());
        assert!(table.get("scratch").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_entity_mut_reaches_the_shared_record() {
        let mut light = Light::default();
        light.entity_mut().merge_raw([("targetname".to_string(), "lamp1".to_string())]);

        assert_eq!(light.base.property("targetname").as_text(), Some("lamp1"));
        assert!(light.entity().property("targetname").exists());
    }
}
