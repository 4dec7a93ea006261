// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, Read};
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use super::LoadError;

/// How graph files are stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Use the first of `<name>.bin`, `<name>.bin.gz` and `<name>.bin.bz2` which exists.
    #[default]
    Auto,

    /// Force uncompressed `<name>.bin` files, which are memory-mapped.
    None,

    /// Force [gzip](https://en.wikipedia.org/wiki/Gzip)-compressed `<name>.bin.gz` files.
    Gzip,

    /// Force [bzip2](https://en.wikipedia.org/wiki/Bzip2)-compressed `<name>.bin.bz2` files.
    Bzip2,
}

impl Compression {
    fn extension(self) -> &'static str {
        match self {
            Compression::Auto | Compression::None => "bin",
            Compression::Gzip => "bin.gz",
            Compression::Bzip2 => "bin.bz2",
        }
    }
}

/// Additional controls for [Graph::load_from_with](crate::Graph::load_from_with).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub compression: Compression,
}

/// Read-only bytes of a single graph file.
#[derive(Debug)]
pub(crate) enum Buffer {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Buffer::Mapped(m) => &m[..],
            Buffer::Owned(v) => &v[..],
        }
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(v: Vec<u8>) -> Self {
        Buffer::Owned(v)
    }
}

#[inline]
pub(crate) fn read_u16(buf: &[u8], offset: usize) -> u16 {
    let b = &buf[offset..offset + 2];
    u16::from_be_bytes([b[0], b[1]])
}

#[inline]
pub(crate) fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let b = &buf[offset..offset + 4];
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

#[inline]
pub(crate) fn read_u64(buf: &[u8], offset: usize) -> u64 {
    let b = &buf[offset..offset + 8];
    u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

/// Opens `<dir>/<name>.bin` (or one of its compressed variants).
pub(crate) fn open(dir: &Path, name: &str, compression: Compression) -> Result<Buffer, LoadError> {
    open_optional(dir, name, compression)?
        .ok_or_else(|| LoadError::Missing(dir.join(format!("{}.{}", name, compression.extension()))))
}

/// Opens `<dir>/<name>.bin` (or one of its compressed variants), returning `Ok(None)`
/// if no such file exists.
pub(crate) fn open_optional(
    dir: &Path,
    name: &str,
    compression: Compression,
) -> Result<Option<Buffer>, LoadError> {
    let candidates: &[Compression] = match compression {
        Compression::Auto => &[Compression::None, Compression::Gzip, Compression::Bzip2],
        Compression::None => &[Compression::None],
        Compression::Gzip => &[Compression::Gzip],
        Compression::Bzip2 => &[Compression::Bzip2],
    };

    for &c in candidates {
        let path = dir.join(format!("{}.{}", name, c.extension()));
        if path.is_file() {
            let buffer = read(&path, c).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            log::debug!("{}: {} bytes ({:?})", path.display(), buffer.len(), c);
            return Ok(Some(buffer));
        }
    }

    Ok(None)
}

fn read(path: &Path, compression: Compression) -> io::Result<Buffer> {
    let f = File::open(path)?;

    match compression {
        Compression::Auto | Compression::None => {
            if f.metadata()?.len() == 0 {
                return Ok(Buffer::Owned(Vec::new()));
            }

            // SAFETY: graph files are never modified while a Graph is alive.
            let m = unsafe { Mmap::map(&f)? };
            Ok(Buffer::Mapped(m))
        }

        Compression::Gzip => {
            let mut data = Vec::new();
            flate2::read::MultiGzDecoder::new(io::BufReader::new(f)).read_to_end(&mut data)?;
            Ok(Buffer::Owned(data))
        }

        Compression::Bzip2 => {
            let mut data = Vec::new();
            bzip2::read::MultiBzDecoder::new(io::BufReader::new(f)).read_to_end(&mut data)?;
            Ok(Buffer::Owned(data))
        }
    }
}
