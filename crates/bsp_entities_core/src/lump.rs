//! Lazily decoded view of a container's entity lump.
//!
//! [`EntityLump`] wraps a [`LumpSource`] and decodes the entities behind it
//! exactly once, on first access, sharing the result with every later call.
//! Decoding resolves each group's classname against the registry, binds the
//! typed fields of known variants, and falls back to the plain [`Entity`]
//! record for everything else.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use bsp_entities_container::{ContainerError, LumpKind, LumpSource};
use thiserror::Error;
use tracing::{debug, info};

use crate::entity::{Entity, EntityClass};
use crate::init;
use crate::parser::{self, ParseError};
use crate::properties::ConversionError;
use crate::registry::{ConfigurationError, EntityClassRegistry};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    #[error("Entity lump parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Entity registry error: {0}")]
    Config(#[from] ConfigurationError),

    #[error("Failed to bind {key:?} on {class_name:?}: {source}")]
    Binding {
        class_name: String,
        key: String,
        source: ConversionError,
    },
}

/// How [`EntityLump::first_of`] matches candidate entities against the
/// requested variant type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassMatch {
    /// Only the exact variant type matches
    #[default]
    Exact,

    /// The variant type itself or any subclass embedding it matches
    WithSubclasses,
}

/// Decoded entities of one container, loaded on first access.
///
/// The load happens at most once per lump for as long as a load succeeds: a
/// failed attempt publishes nothing, so a later call retries and reports the
/// error again. Concurrent first accesses block on a single decoding thread.
///
/// # Example
///
/// ```no_run
/// use bsp_entities_container::BspFile;
/// use bsp_entities_core::lump::EntityLump;
///
/// let lump = EntityLump::new(BspFile::open("maps/crossfire.bsp")?);
/// for entity in lump.iter()? {
///     println!("{entity}");
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EntityLump<S: LumpSource> {
    source: S,
    entities: OnceLock<Vec<Box<dyn EntityClass>>>,
    load_guard: Mutex<()>,
}

impl<S: LumpSource> EntityLump<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entities: OnceLock::new(),
            load_guard: Mutex::new(()),
        }
    }

    /// The wrapped lump source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Decoded entities in lump order, loading them on first access.
    ///
    /// Resolves classnames against the process-wide registry.
    pub fn entities(&self) -> Result<&[Box<dyn EntityClass>], LoadError> {
        let registry = init::registry()?;
        self.entities_with(registry)
    }

    /// Decoded entities in lump order, resolved through an explicit
    /// registry.
    pub fn entities_with(
        &self,
        registry: &EntityClassRegistry,
    ) -> Result<&[Box<dyn EntityClass>], LoadError> {
        if let Some(entities) = self.entities.get() {
            return Ok(entities);
        }

        // One loader at a time; losers of the race see the published result
        // on the second check. A poisoned guard means an earlier loader
        // panicked before publishing, leaving the cell still empty.
        let _guard = self
            .load_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entities) = self.entities.get() {
            return Ok(entities);
        }

        let loaded = self.load(registry)?;
        Ok(self.entities.get_or_init(|| loaded))
    }

    /// Force the one-time load without looking at the entities.
    pub fn ensure_loaded(&self) -> Result<(), LoadError> {
        self.entities().map(|_| ())
    }

    /// Number of decoded entities.
    pub fn len(&self) -> Result<usize, LoadError> {
        Ok(self.entities()?.len())
    }

    /// Check if the lump decodes to no entities at all.
    pub fn is_empty(&self) -> Result<bool, LoadError> {
        Ok(self.entities()?.is_empty())
    }

    /// Entity at `index` in lump order.
    pub fn get(&self, index: usize) -> Result<Option<&dyn EntityClass>, LoadError> {
        Ok(self.entities()?.get(index).map(|entity| &**entity))
    }

    /// Iterate entities in lump order.
    pub fn iter(&self) -> Result<impl Iterator<Item = &dyn EntityClass> + '_, LoadError> {
        Ok(self.entities()?.iter().map(|entity| &**entity))
    }

    /// First entity of a variant type, in lump order.
    ///
    /// [`ClassMatch::Exact`] requires the entity's own type to be `T`;
    /// [`ClassMatch::WithSubclasses`] also accepts entities embedding `T`
    /// anywhere along their base chain, returning the embedded link.
    pub fn first_of<T: EntityClass>(&self, matching: ClassMatch) -> Result<Option<&T>, LoadError> {
        let found = self.entities()?.iter().find_map(|entity| match matching {
            ClassMatch::Exact => entity.as_any().downcast_ref::<T>(),
            ClassMatch::WithSubclasses => entity
                .ancestor(TypeId::of::<T>())
                .and_then(|link| link.downcast_ref::<T>()),
        });
        Ok(found)
    }

    fn load(&self, registry: &EntityClassRegistry) -> Result<Vec<Box<dyn EntityClass>>, LoadError> {
        // 1. Pull the raw lump bytes out of the container
        let bytes = self.source.lump_bytes(LumpKind::Entities)?;

        // 2. Parse the brace-delimited property groups
        let groups = parser::parse_lump_bytes(&bytes)?;

        // 3. Type each group and bind raw values into the variant's fields
        let mut entities: Vec<Box<dyn EntityClass>> = Vec::with_capacity(groups.len());
        for group in groups {
            let info = group
                .class_name
                .as_deref()
                .and_then(|name| registry.resolve(name));

            let mut entity: Box<dyn EntityClass> = match info {
                Some(info) => (info.factory)(),
                None => {
                    if let Some(name) = group.class_name.as_deref() {
                        debug!(
                            "No registered variant for classname {:?}; using the default entity",
                            name
                        );
                    }
                    Box::new(Entity::new())
                }
            };

            // Collecting keeps the last value written for a repeated key, so
            // typed binding only ever sees the surviving value.
            let merged: HashMap<String, String> = group.pairs.into_iter().collect();

            if let Some(info) = info
                && let Some(table) = registry.bindings_for(info.type_id)
            {
                for (key, value) in &merged {
                    table
                        .bind(&mut *entity, key, value)
                        .map_err(|source| LoadError::Binding {
                            class_name: info.class_name.to_string(),
                            key: key.clone(),
                            source,
                        })?;
                }
            }

            entity.entity_mut().merge_raw(merged);
            entities.push(entity);
        }

        info!("Decoded {} entities from the entity lump", entities.len());
        Ok(entities)
    }
}
