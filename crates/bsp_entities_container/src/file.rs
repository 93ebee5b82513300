//! Disk-backed container source.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::directory::{BspHeader, LumpKind};
use crate::source::{ContainerError, LumpSource};

/// A container file on disk.
///
/// `open` reads and validates the header once and keeps only the path and
/// the lump directory. Each [`lump_bytes`](LumpSource::lump_bytes) call
/// re-opens the file, reads exactly one lump, and closes it again, so a
/// `BspFile` holds no file handle between calls.
#[derive(Debug, Clone)]
pub struct BspFile {
    path: PathBuf,
    header: BspHeader,
}

impl BspFile {
    /// Opens a container and decodes its header.
    ///
    /// # Example
    /// ```no_run
    /// use bsp_entities_container::prelude::*;
    ///
    /// let map = BspFile::open("maps/crossfire.bsp").unwrap();
    /// println!("entities at {:?}", map.header().entry(LumpKind::Entities));
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ContainerError> {
        let path = path.into();
        let mut file = File::open(&path)?;

        let mut buf = [0u8; BspHeader::SIZE];
        file.read_exact(&mut buf).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                ContainerError::TruncatedHeader { len: 0 }
            } else {
                ContainerError::Io(err)
            }
        })?;

        let header = BspHeader::from_bytes(&buf)?;
        trace!("Opened container {} (version {})", path.display(), header.version);
        Ok(BspFile { path, header })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &BspHeader {
        &self.header
    }
}

impl LumpSource for BspFile {
    fn lump_bytes(&self, lump: LumpKind) -> Result<Vec<u8>, ContainerError> {
        let entry = self.header.entry(lump);
        let offset =
            u64::try_from(entry.offset).map_err(|_| ContainerError::LumpOutOfBounds { lump })?;
        let length =
            usize::try_from(entry.length).map_err(|_| ContainerError::LumpOutOfBounds { lump })?;

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; length];
        file.read_exact(&mut buf).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                ContainerError::LumpOutOfBounds { lump }
            } else {
                ContainerError::Io(err)
            }
        })?;

        trace!("Read lump {} ({} bytes)", lump.name(), length);
        Ok(buf)
    }
}
