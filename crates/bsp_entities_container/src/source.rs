//! The byte-access boundary between the container and the decoding layers.

use std::collections::HashMap;

use thiserror::Error;

use crate::directory::LumpKind;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Truncated container header: got {len} bytes")]
    TruncatedHeader { len: usize },

    #[error("Unsupported container version {found}")]
    UnsupportedVersion { found: i32 },

    #[error("Lump {} extends past the end of the container", .lump.name())]
    LumpOutOfBounds { lump: LumpKind },

    #[error("Container has no data for lump {}", .lump.name())]
    MissingLump { lump: LumpKind },
}

/// Byte access to one lump of a container.
///
/// Implementations hand back the raw bytes of the requested lump; decoding is
/// the caller's concern. Resources are scoped to the call: a source that
/// reads from disk opens and closes the file inside `lump_bytes`.
pub trait LumpSource {
    fn lump_bytes(&self, lump: LumpKind) -> Result<Vec<u8>, ContainerError>;
}

/// In-memory lump source.
///
/// Useful in tests and for synthetic containers: lumps are plain byte
/// buffers keyed by [`LumpKind`], with no header or directory involved.
///
/// # Example
/// ```
/// use bsp_entities_container::prelude::*;
///
/// let source = MemoryLumps::new()
///     .with_lump(LumpKind::Entities, "{\n\"classname\" \"worldspawn\"\n}\n");
/// let bytes = source.lump_bytes(LumpKind::Entities).unwrap();
/// assert!(!bytes.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLumps {
    lumps: HashMap<LumpKind, Vec<u8>>,
}

impl MemoryLumps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_lump(mut self, lump: LumpKind, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(lump, bytes);
        self
    }

    /// Stores (or replaces) the bytes of one lump.
    pub fn insert(&mut self, lump: LumpKind, bytes: impl Into<Vec<u8>>) {
        self.lumps.insert(lump, bytes.into());
    }
}

impl LumpSource for MemoryLumps {
    fn lump_bytes(&self, lump: LumpKind) -> Result<Vec<u8>, ContainerError> {
        self.lumps
            .get(&lump)
            .cloned()
            .ok_or(ContainerError::MissingLump { lump })
    }
}
