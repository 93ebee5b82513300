//! Container-level access to version-30 BSP map files.
//!
//! This crate owns the binary container format: the 124-byte little-endian
//! header, the fifteen-entry lump directory, and byte access to individual
//! lumps. It does not interpret lump contents; higher layers consume
//! [`LumpSource`](source::LumpSource) and decode the bytes they care about.

pub mod directory;
pub mod file;
pub mod source;

// Re-export the boundary types for convenience
pub use directory::{BSP_VERSION, BspHeader, LumpEntry, LumpKind};
pub use file::BspFile;
pub use source::{ContainerError, LumpSource, MemoryLumps};

/// Prelude module for convenient imports
///
/// # Example
/// ```no_run
/// use bsp_entities_container::prelude::*;
///
/// fn main() -> Result<(), ContainerError> {
///     let map = BspFile::open("maps/crossfire.bsp")?;
///     let bytes = map.lump_bytes(LumpKind::Entities)?;
///     println!("entity lump is {} bytes", bytes.len());
///     Ok(())
/// }
/// ```
pub mod prelude {
    pub use crate::directory::{BspHeader, LumpEntry, LumpKind};
    pub use crate::file::BspFile;
    pub use crate::source::{ContainerError, LumpSource, MemoryLumps};
}
