//! Classname registry and merged property binding tables.
//!
//! Uses the inventory crate for compile-time registration of types marked
//! with `#[derive(EntityClass)]`. Binding tables are merged over each
//! variant's base chain when the registry is built, so routing a raw
//! property at decode time is a single map lookup.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::entity::{Entity, EntityClass};
use crate::properties::{ConversionError, FieldKind};

/// The registered variant set is inconsistent and no registry can be built.
///
/// These errors are raised once, when the registry is first constructed, and
/// point at the variant declarations rather than any particular map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Duplicate entity classname {class_name:?} claimed by both {first} and {second}")]
    DuplicateClassName {
        class_name: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("Entity class {class_name:?} declares unregistered base class {base_type_name}")]
    UnknownBaseClass {
        class_name: &'static str,
        base_type_name: &'static str,
    },

    #[error("Field {key:?} of entity class {class_name:?} has no converter for type {type_name}")]
    UnsupportedFieldType {
        class_name: &'static str,
        key: &'static str,
        type_name: &'static str,
    },
}

/// One bindable field declared by an entity variant.
///
/// Emitted into a static table by the `EntityClass` derive macro. The setter
/// converts a raw value and writes it directly into the declaring variant,
/// which may sit anywhere along a subclass's base chain.
pub struct FieldSpec {
    /// External property key (the field name unless overridden with
    /// `#[entity(key = "...")]`)
    pub key: &'static str,

    /// Converter family used for this field
    pub kind: FieldKind,

    /// Returns the `TypeId` of the variant that declared the field
    pub owner: fn() -> TypeId,

    /// Converts a raw value and stores it in the declaring variant.
    ///
    /// The target must be the concrete type identified by `owner`; merged
    /// tables route through `EntityClass::ancestor_mut` first.
    pub set: fn(&mut dyn Any, &str) -> Result<(), ConversionError>,
}

/// Information about a registered entity variant.
///
/// This struct is submitted via `inventory::submit!` by the `EntityClass`
/// derive macro. Each registered variant provides:
/// - Its classname and `TypeId` for lookups in both directions
/// - The base variant it embeds, for binding-table inheritance
/// - Field definitions for binding and class-definition export
/// - A factory constructing a default instance behind `dyn EntityClass`
pub struct EntityClassInfo {
    /// The classname this variant answers to (e.g., `"light"`)
    pub class_name: &'static str,

    /// The `TypeId` of the variant type
    pub type_id: TypeId,

    /// Rust type name, used in configuration error reports
    pub type_name: &'static str,

    /// `TypeId` of the embedded base variant.
    ///
    /// `None` or the `TypeId` of the plain [`Entity`] record marks a chain
    /// root with no inherited bindings.
    pub base: Option<TypeId>,

    /// Rust type name of the base, used in configuration error reports
    pub base_type_name: Option<&'static str>,

    /// Field definitions declared directly on this variant
    pub fields: &'static [FieldSpec],

    /// Constructs a default instance of the variant
    pub factory: fn() -> Box<dyn EntityClass>,
}

// Collect all EntityClassInfo submissions at compile time
inventory::collect!(EntityClassInfo);

/// Merged key-to-field routing table for one entity variant.
///
/// Contains the variant's own field specs plus every spec inherited along
/// its base chain, with the variant's own declarations winning key
/// collisions. Each entry points at the declaring variant's static spec.
#[derive(Default, Clone)]
pub struct BindingTable {
    entries: HashMap<&'static str, &'static FieldSpec>,
}

impl BindingTable {
    /// Get the field spec routed for a property key, if any.
    pub fn get(&self, key: &str) -> Option<&'static FieldSpec> {
        self.entries.get(key).copied()
    }

    /// Iterate all routed entries.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static FieldSpec)> + '_ {
        self.entries.iter().map(|(key, spec)| (*key, *spec))
    }

    /// Get the number of routed keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table routes no keys at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Routes one raw property into `target`, converting it to the declared
    /// field type.
    ///
    /// Returns `Ok(false)` when no entry matches `key`; callers keep such
    /// properties raw-only. `target` must be an instance of the variant this
    /// table was built for.
    pub fn bind(
        &self,
        target: &mut dyn EntityClass,
        key: &str,
        value: &str,
    ) -> Result<bool, ConversionError> {
        let Some(spec) = self.get(key) else {
            return Ok(false);
        };

        // Every owner in a merged table lies on the target's base chain.
        let link = target
            .ancestor_mut((spec.owner)())
            .expect("binding table entry owned by a type outside the target's base chain");
        (spec.set)(link, value)?;
        Ok(true)
    }
}

/// Registry of all entity variants with `#[derive(EntityClass)]`.
///
/// Built once at startup by iterating all compile-time registered variants
/// via the inventory crate. Construction fails when the registered set is
/// inconsistent, for example when two variants claim the same classname.
///
/// # Example
///
/// ```
/// use bsp_entities_core::registry::EntityClassRegistry;
///
/// let registry = EntityClassRegistry::build()?;
/// assert!(registry.resolve("worldspawn").is_some());
/// # Ok::<(), bsp_entities_core::registry::ConfigurationError>(())
/// ```
pub struct EntityClassRegistry {
    by_name: HashMap<&'static str, &'static EntityClassInfo>,
    by_type: HashMap<TypeId, &'static EntityClassInfo>,
    bindings: HashMap<TypeId, BindingTable>,
}

impl EntityClassRegistry {
    /// Build the registry from all inventory submissions.
    pub fn build() -> Result<Self, ConfigurationError> {
        Self::from_classes(inventory::iter::<EntityClassInfo>)
    }

    fn from_classes<I>(classes: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = &'static EntityClassInfo>,
    {
        let mut by_name: HashMap<&'static str, &'static EntityClassInfo> = HashMap::new();
        let mut by_type: HashMap<TypeId, &'static EntityClassInfo> = HashMap::new();

        for info in classes {
            if let Some(first) = by_name.insert(info.class_name, info) {
                return Err(ConfigurationError::DuplicateClassName {
                    class_name: info.class_name,
                    first: first.type_name,
                    second: info.type_name,
                });
            }
            by_type.insert(info.type_id, info);
        }

        let mut bindings = HashMap::new();
        for info in by_name.values().copied() {
            Self::build_bindings(info, &by_type, &mut bindings)?;
        }

        let registry = Self {
            by_name,
            by_type,
            bindings,
        };

        info!(
            "EntityClassRegistry built with {} classes and {} binding tables",
            registry.by_name.len(),
            registry.bindings.len()
        );

        Ok(registry)
    }

    /// Build the merged binding table for one variant, recursing through its
    /// base chain first. Already-built tables are reused.
    fn build_bindings(
        info: &'static EntityClassInfo,
        by_type: &HashMap<TypeId, &'static EntityClassInfo>,
        bindings: &mut HashMap<TypeId, BindingTable>,
    ) -> Result<(), ConfigurationError> {
        if bindings.contains_key(&info.type_id) {
            return Ok(());
        }

        // The chain bottoms out at the plain Entity record, which declares
        // no bindable fields of its own.
        let mut table = match info.base {
            Some(base_id) if base_id != TypeId::of::<Entity>() => {
                let Some(base_info) = by_type.get(&base_id).copied() else {
                    return Err(ConfigurationError::UnknownBaseClass {
                        class_name: info.class_name,
                        base_type_name: info.base_type_name.unwrap_or("<unknown>"),
                    });
                };
                Self::build_bindings(base_info, by_type, bindings)?;
                bindings.get(&base_id).cloned().unwrap_or_default()
            }
            _ => BindingTable::default(),
        };

        for spec in info.fields {
            if let FieldKind::Unsupported { type_name } = spec.kind {
                return Err(ConfigurationError::UnsupportedFieldType {
                    class_name: info.class_name,
                    key: spec.key,
                    type_name,
                });
            }
            // Own declarations replace inherited entries for the same key.
            table.entries.insert(spec.key, spec);
        }

        bindings.insert(info.type_id, table);
        Ok(())
    }

    /// Get variant information by classname.
    ///
    /// Returns `None` for classnames with no registered variant; decoding
    /// falls back to the plain [`Entity`] record in that case.
    pub fn resolve(&self, class_name: &str) -> Option<&'static EntityClassInfo> {
        self.by_name.get(class_name).copied()
    }

    /// Get variant information by `TypeId`.
    pub fn info_of(&self, type_id: TypeId) -> Option<&'static EntityClassInfo> {
        self.by_type.get(&type_id).copied()
    }

    /// Get the merged binding table for a registered variant.
    pub fn bindings_for(&self, type_id: TypeId) -> Option<&BindingTable> {
        self.bindings.get(&type_id)
    }

    /// Iterate all registered variant info.
    pub fn iter(&self) -> impl Iterator<Item = &'static EntityClassInfo> + '_ {
        self.by_name.values().copied()
    }

    /// All registered classnames, sorted for stable presentation.
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered variants.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::{Light, LightEnvironment};
    use crate::properties::Vec3;

    struct FakeBase;
    struct FakeDerived;
    struct FakeUnregistered;

    fn set_noop(_target: &mut dyn Any, _raw: &str) -> Result<(), ConversionError> {
        Ok(())
    }

    static FAKE_BASE_FIELDS: &[FieldSpec] = &[
        FieldSpec {
            key: "shared",
            kind: FieldKind::Int,
            owner: TypeId::of::<FakeBase>,
            set: set_noop,
        },
        FieldSpec {
            key: "base_only",
            kind: FieldKind::Text,
            owner: TypeId::of::<FakeBase>,
            set: set_noop,
        },
    ];

    static FAKE_DERIVED_FIELDS: &[FieldSpec] = &[FieldSpec {
        key: "shared",
        kind: FieldKind::Float,
        owner: TypeId::of::<FakeDerived>,
        set: set_noop,
    }];

    static FAKE_UNSUPPORTED_FIELDS: &[FieldSpec] = &[FieldSpec {
        key: "timeout",
        kind: FieldKind::Unsupported {
            type_name: "Duration",
        },
        owner: TypeId::of::<FakeBase>,
        set: set_noop,
    }];

    fn fake_base_info() -> EntityClassInfo {
        EntityClassInfo {
            class_name: "fake_base",
            type_id: TypeId::of::<FakeBase>(),
            type_name: "FakeBase",
            base: Some(TypeId::of::<Entity>()),
            base_type_name: Some("Entity"),
            fields: FAKE_BASE_FIELDS,
            factory: || Box::new(Entity::new()),
        }
    }

    fn fake_derived_info() -> EntityClassInfo {
        EntityClassInfo {
            class_name: "fake_derived",
            type_id: TypeId::of::<FakeDerived>(),
            type_name: "FakeDerived",
            base: Some(TypeId::of::<FakeBase>()),
            base_type_name: Some("FakeBase"),
            fields: FAKE_DERIVED_FIELDS,
            factory: || Box::new(Entity::new()),
        }
    }

    fn leak_info(info: EntityClassInfo) -> &'static EntityClassInfo {
        Box::leak(Box::new(info))
    }

    #[test]
    fn test_build_resolves_registered_classnames() {
        let registry = EntityClassRegistry::build().unwrap();
        assert!(registry.resolve("worldspawn").is_some());
        assert!(registry.resolve("light_environment").is_some());
        assert!(registry.resolve("no_such_class").is_none());
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_merged_table_includes_inherited_fields() {
        let registry = EntityClassRegistry::build().unwrap();
        let info = registry.resolve("light_environment").unwrap();
        let table = registry.bindings_for(info.type_id).unwrap();

        assert_eq!(table.get("pitch").map(|spec| spec.kind), Some(FieldKind::Float));
        assert_eq!(table.get("origin").map(|spec| spec.kind), Some(FieldKind::Vector));
        assert_eq!(table.get("_light").map(|spec| spec.kind), Some(FieldKind::Color));

        // Inherited entries still point at the declaring variant.
        let origin = table.get("origin").unwrap();
        assert_eq!((origin.owner)(), TypeId::of::<Light>());
    }

    #[test]
    fn test_own_declaration_overrides_inherited() {
        let registry = EntityClassRegistry::from_classes([
            leak_info(fake_base_info()),
            leak_info(fake_derived_info()),
        ])
        .unwrap();

        let table = registry.bindings_for(TypeId::of::<FakeDerived>()).unwrap();
        let spec = table.get("shared").unwrap();
        assert_eq!(spec.kind, FieldKind::Float);
        assert_eq!((spec.owner)(), TypeId::of::<FakeDerived>());
        assert!(table.get("base_only").is_some());
        assert_eq!(table.len(), 2);

        // The base's own table keeps its original declaration.
        let base_table = registry.bindings_for(TypeId::of::<FakeBase>()).unwrap();
        assert_eq!(base_table.get("shared").unwrap().kind, FieldKind::Int);
    }

    #[test]
    fn test_duplicate_classname_is_fatal() {
        let mut duplicate = fake_derived_info();
        duplicate.class_name = "fake_base";
        duplicate.base = Some(TypeId::of::<Entity>());

        let result =
            EntityClassRegistry::from_classes([leak_info(fake_base_info()), leak_info(duplicate)]);
        assert_eq!(
            result.err(),
            Some(ConfigurationError::DuplicateClassName {
                class_name: "fake_base",
                first: "FakeBase",
                second: "FakeDerived",
            })
        );
    }

    #[test]
    fn test_unknown_base_is_fatal() {
        let mut orphan = fake_derived_info();
        orphan.base = Some(TypeId::of::<FakeUnregistered>());
        orphan.base_type_name = Some("FakeUnregistered");

        let result = EntityClassRegistry::from_classes([leak_info(orphan)]);
        assert_eq!(
            result.err(),
            Some(ConfigurationError::UnknownBaseClass {
                class_name: "fake_derived",
                base_type_name: "FakeUnregistered",
            })
        );
    }

    #[test]
    fn test_unsupported_field_type_is_fatal() {
        let mut info = fake_base_info();
        info.fields = FAKE_UNSUPPORTED_FIELDS;

        let result = EntityClassRegistry::from_classes([leak_info(info)]);
        assert_eq!(
            result.err(),
            Some(ConfigurationError::UnsupportedFieldType {
                class_name: "fake_base",
                key: "timeout",
                type_name: "Duration",
            })
        );
    }

    #[test]
    fn test_variants_based_on_entity_are_chain_roots() {
        let registry = EntityClassRegistry::from_classes([leak_info(fake_base_info())]).unwrap();
        let table = registry.bindings_for(TypeId::of::<FakeBase>()).unwrap();
        assert_eq!(table.len(), 2);

        // The plain record itself never gets a table.
        assert!(registry.bindings_for(TypeId::of::<Entity>()).is_none());
    }

    #[test]
    fn test_bind_converts_and_routes() {
        let registry = EntityClassRegistry::build().unwrap();
        let info = registry.resolve("light").unwrap();
        let table = registry.bindings_for(info.type_id).unwrap();

        let mut entity = (info.factory)();
        assert_eq!(table.bind(&mut *entity, "style", "3"), Ok(true));
        assert_eq!(table.bind(&mut *entity, "unknown_key", "anything"), Ok(false));

        let light = entity.as_any().downcast_ref::<Light>().unwrap();
        assert_eq!(light.style, 3);
    }

    #[test]
    fn test_bind_inherited_key_writes_into_base_link() {
        let registry = EntityClassRegistry::build().unwrap();
        let info = registry.resolve("light_environment").unwrap();
        let table = registry.bindings_for(info.type_id).unwrap();

        let mut entity = (info.factory)();
        assert_eq!(table.bind(&mut *entity, "origin", "1 2 3"), Ok(true));
        assert_eq!(table.bind(&mut *entity, "pitch", "-60"), Ok(true));

        let environment = entity.as_any().downcast_ref::<LightEnvironment>().unwrap();
        assert_eq!(environment.base.origin, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(environment.pitch, -60.0);
    }

    #[test]
    fn test_bind_reports_conversion_errors() {
        let registry = EntityClassRegistry::build().unwrap();
        let info = registry.resolve("light").unwrap();
        let table = registry.bindings_for(info.type_id).unwrap();

        let mut entity = (info.factory)();
        let error = table.bind(&mut *entity, "style", "abc").unwrap_err();
        assert!(matches!(error, ConversionError::InvalidInt { .. }));
    }

    #[test]
    fn test_class_names_are_sorted() {
        let registry = EntityClassRegistry::build().unwrap();
        let names = registry.class_names();
        assert!(names.contains(&"worldspawn"));
        assert!(names.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
