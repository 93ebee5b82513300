//! # bsp_entities
//!
//! Typed entity decoding for GoldSrc-style BSP map containers.
//!
//! This is a unified meta-crate combining the `bsp_entities_*` sub-crates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bsp_entities::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init(&InitConfig::default())?;
//!
//!     let lump = EntityLump::new(BspFile::open("maps/crossfire.bsp")?);
//!     if let Some(light) = lump.first_of::<Light>(ClassMatch::Exact)? {
//!         println!("first light sits at {}", light.origin);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! This crate is organized into 2 layers:
//!
//! - **Layer 1** ([`container`]): The on-disk container format: header and
//!   lump directory parsing plus byte access to individual lumps
//! - **Layer 2** ([`core`]): Entity lump decoding: the key/value parser, the
//!   classname registry with derive-based registration, typed entity
//!   variants and the lazily decoded [`EntityLump`](core::EntityLump)
//!
//! ## Using Individual Crates
//!
//! The sub-crates also work standalone if you only need one layer:
//!
//! ```rust,no_run
//! use bsp_entities_container::{BspFile, LumpKind, LumpSource};
//!
//! let file = BspFile::open("maps/crossfire.bsp")?;
//! let bytes = file.lump_bytes(LumpKind::Textures)?;
//! # Ok::<(), bsp_entities_container::ContainerError>(())
//! ```

// Re-export sub-crates for advanced usage
pub use bsp_entities_container as container;
pub use bsp_entities_core as core;

// Re-exported for code that works with the registration inventory directly
pub use inventory;

/// Unified prelude for bsp_entities.
///
/// Re-exports the most commonly used types from both sub-crates.
///
/// # Example
///
/// ```rust,no_run
/// use bsp_entities::prelude::*;
///
/// let lump = EntityLump::new(BspFile::open("maps/gut_feeling.bsp")?);
/// println!("{} entities", lump.len()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod prelude {
    pub use crate::container::prelude::*;
    pub use crate::core::prelude::*;
}
