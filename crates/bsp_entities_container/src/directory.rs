//! The container header and lump directory.
//!
//! A version-30 container starts with a fixed header: a 32-bit version number
//! followed by fifteen `(offset, length)` directory entries, all little-endian.
//! Everything after the header is lump data addressed by those entries.

use crate::source::ContainerError;

/// Container version this crate reads.
pub const BSP_VERSION: i32 = 30;

/// Identifies one lump of the container.
///
/// The discriminant is the lump's position in the header directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LumpKind {
    /// Text key/value stream describing every placed object.
    Entities = 0,
    Planes = 1,
    Textures = 2,
    Vertices = 3,
    Visibility = 4,
    Nodes = 5,
    TexInfo = 6,
    Faces = 7,
    Lighting = 8,
    ClipNodes = 9,
    Leaves = 10,
    MarkSurfaces = 11,
    Edges = 12,
    SurfEdges = 13,
    Models = 14,
}

impl LumpKind {
    /// Number of lumps in a container.
    pub const COUNT: usize = 15;

    /// All lump kinds in directory order.
    pub const ALL: [LumpKind; Self::COUNT] = [
        LumpKind::Entities,
        LumpKind::Planes,
        LumpKind::Textures,
        LumpKind::Vertices,
        LumpKind::Visibility,
        LumpKind::Nodes,
        LumpKind::TexInfo,
        LumpKind::Faces,
        LumpKind::Lighting,
        LumpKind::ClipNodes,
        LumpKind::Leaves,
        LumpKind::MarkSurfaces,
        LumpKind::Edges,
        LumpKind::SurfEdges,
        LumpKind::Models,
    ];

    /// Position of this lump in the header directory.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name used in logs and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            LumpKind::Entities => "entities",
            LumpKind::Planes => "planes",
            LumpKind::Textures => "textures",
            LumpKind::Vertices => "vertices",
            LumpKind::Visibility => "visibility",
            LumpKind::Nodes => "nodes",
            LumpKind::TexInfo => "texinfo",
            LumpKind::Faces => "faces",
            LumpKind::Lighting => "lighting",
            LumpKind::ClipNodes => "clipnodes",
            LumpKind::Leaves => "leaves",
            LumpKind::MarkSurfaces => "marksurfaces",
            LumpKind::Edges => "edges",
            LumpKind::SurfEdges => "surfedges",
            LumpKind::Models => "models",
        }
    }
}

/// One directory entry: where a lump's bytes live in the file.
///
/// Offsets and lengths are signed in the on-disk format; negative values are
/// rejected when the lump is actually read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LumpEntry {
    pub offset: i32,
    pub length: i32,
}

/// The decoded container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BspHeader {
    pub version: i32,
    pub lumps: [LumpEntry; LumpKind::COUNT],
}

impl BspHeader {
    /// Size of the encoded header in bytes.
    pub const SIZE: usize = 4 + LumpKind::COUNT * 8;

    /// Decodes a header from the first [`BspHeader::SIZE`] bytes of a
    /// container.
    ///
    /// Fails if the buffer is too short or the version is not
    /// [`BSP_VERSION`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContainerError> {
        if bytes.len() < Self::SIZE {
            return Err(ContainerError::TruncatedHeader { len: bytes.len() });
        }

        let version = read_i32(bytes, 0);
        if version != BSP_VERSION {
            return Err(ContainerError::UnsupportedVersion { found: version });
        }

        let mut lumps = [LumpEntry::default(); LumpKind::COUNT];
        for (index, entry) in lumps.iter_mut().enumerate() {
            let base = 4 + index * 8;
            entry.offset = read_i32(bytes, base);
            entry.length = read_i32(bytes, base + 4);
        }

        Ok(BspHeader { version, lumps })
    }

    /// Directory entry for one lump.
    pub fn entry(&self, lump: LumpKind) -> LumpEntry {
        self.lumps[lump.index()]
    }

    /// Encodes the header back to its on-disk form.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.version.to_le_bytes());
        for (index, entry) in self.lumps.iter().enumerate() {
            let base = 4 + index * 8;
            bytes[base..base + 4].copy_from_slice(&entry.offset.to_le_bytes());
            bytes[base + 4..base + 8].copy_from_slice(&entry.length.to_le_bytes());
        }
        bytes
    }
}

// Caller guarantees offset + 4 <= bytes.len().
fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    i32::from_le_bytes(buf)
}
