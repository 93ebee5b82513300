//! The common entity record and the polymorphic variant surface.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::properties::EntityProperty;

/// Key whose value selects the entity variant.
pub const CLASSNAME_KEY: &str = "classname";

/// The record every entity variant embeds: the raw key/value map.
///
/// `Entity` is also the default variant: raw groups whose classname has no
/// registered variant decode into a bare `Entity`, so every group produces a
/// usable entity. Duplicate keys resolve before the map is filled; the map
/// itself holds exactly one value per key.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    properties: HashMap<String, String>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved classname, if the group carried one.
    pub fn class_name(&self) -> Option<&str> {
        self.properties.get(CLASSNAME_KEY).map(String::as_str)
    }

    /// The raw key/value map. Unbound keys live only here.
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Convertible view of one raw value; absent keys read as defaults.
    pub fn property(&self, key: &str) -> EntityProperty<'_> {
        EntityProperty::new(self.properties.get(key).map(String::as_str))
    }

    /// Merges raw pairs into the map, last write wins.
    pub fn merge_raw<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            self.properties.insert(key, value);
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name().unwrap_or(""))
    }
}

/// Polymorphic surface of every entity variant.
///
/// Variants form single-inheritance chains by embedding their base variant
/// (see the `EntityClass` derive macro); every chain bottoms out at
/// [`Entity`]. `ancestor` walks that chain by type so binders and typed
/// queries can reach any link of a concrete variant.
pub trait EntityClass: Any + Send + Sync + fmt::Debug + fmt::Display {
    /// The common record at the root of this variant's chain.
    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The chain link of the given type, if this variant is or descends
    /// from it.
    fn ancestor(&self, type_id: TypeId) -> Option<&dyn Any>;

    fn ancestor_mut(&mut self, type_id: TypeId) -> Option<&mut dyn Any>;

    /// Resolved classname; empty for classless groups.
    fn class_name(&self) -> &str {
        self.entity().class_name().unwrap_or("")
    }

    /// Convertible view of one raw value; absent keys read as defaults.
    fn property(&self, key: &str) -> EntityProperty<'_> {
        self.entity().property(key)
    }
}

impl EntityClass for Entity {
    fn entity(&self) -> &Entity {
        self
    }

    fn entity_mut(&mut self) -> &mut Entity {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn ancestor(&self, type_id: TypeId) -> Option<&dyn Any> {
        if type_id == TypeId::of::<Entity>() {
            Some(self)
        } else {
            None
        }
    }

    fn ancestor_mut(&mut self, type_id: TypeId) -> Option<&mut dyn Any> {
        if type_id == TypeId::of::<Entity>() {
            Some(self)
        } else {
            None
        }
    }
}
