//! Core entity decoding for GoldSrc-style BSP containers.
//!
//! Everything in a map that is not geometry lives in the entity lump: a text
//! blob of brace-delimited key/value groups describing lights, spawn points,
//! triggers and the world itself. This crate parses that blob and turns each
//! group into a typed entity:
//!
//! - [`parser`] splits lump text into raw property groups
//! - [`registry`] maps classnames to registered variants, with binding
//!   tables merged over each variant's base chain
//! - [`classes`] provides typed variants for the common classnames
//! - [`lump`] decodes a container's entity lump lazily, exactly once
//! - [`export`] writes the registered class definitions to JSON
//!
//! Custom variants derive `EntityClass` and register themselves
//! automatically:
//!
//! ```
//! use bsp_entities_core::prelude::*;
//!
//! #[derive(Debug, Default, EntityClass)]
//! #[entity(class_name = "func_rotating")]
//! pub struct FuncRotating {
//!     #[entity(base)]
//!     pub base: Entity,
//!     pub speed: f32,
//! }
//!
//! let registry = registry()?;
//! assert!(registry.resolve("func_rotating").is_some());
//! # Ok::<(), ConfigurationError>(())
//! ```

// Generated registration code refers to this crate by name.
extern crate self as bsp_entities_core;

pub mod classes;
pub mod entity;
pub mod export;
pub mod init;
pub mod lump;
pub mod parser;
pub mod properties;
pub mod registry;

// Re-exported for the registration statics emitted by the derive macro.
pub use inventory;

pub use entity::{Entity, EntityClass};
pub use lump::EntityLump;
pub use registry::EntityClassRegistry;

/// Commonly used types for decoding entity lumps.
pub mod prelude {
    pub use bsp_entities_macros::EntityClass;

    pub use crate::classes::{
        EnvFogController, FuncWall, InfoTarget, Light, LightEnvironment, PlayerDeathmatch,
        PlayerStart, TriggerMultiple, Worldspawn,
    };
    pub use crate::entity::{Entity, EntityClass};
    pub use crate::init::{InitConfig, InitError, init, registry};
    pub use crate::lump::{ClassMatch, EntityLump, LoadError};
    pub use crate::parser::{ParseError, RawPropertyGroup};
    pub use crate::properties::{
        Color32, ConversionError, EntityProperty, FieldKind, FromRawValue, Vec3,
    };
    pub use crate::registry::{ConfigurationError, EntityClassRegistry};
}
