//! TFile header parsing and the top-level ROOT file interface.

use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use tv_core::Histogram1D;

use crate::directory::{Directory, DirectoryHeader};
use crate::error::{Result, RootError};
use crate::key::{Key, KeyInfo};
use crate::objects;
use crate::rbuffer::RBuffer;

const ROOT_MAGIC: &[u8; 4] = b"root";
const MIN_FILE_LEN: usize = 64;

/// Parsed ROOT file header.
#[derive(Debug, Clone, Copy)]
struct FileHeader {
    /// Whether the file uses 64-bit seek pointers (version >= 1000000).
    is_large: bool,
    /// Offset of the top-level key list.
    seek_keys: u64,
}

/// File contents: mapped from disk, or handed over by the caller.
enum Bytes {
    Mapped(memmap2::Mmap),
    Owned(Vec<u8>),
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Bytes::Mapped(m) => m,
            Bytes::Owned(v) => v,
        }
    }
}

/// A ROOT file opened for reading histograms.
pub struct RootFile {
    data: Bytes,
    header: FileHeader,
    path: PathBuf,
}

impl RootFile {
    /// Open and parse a ROOT file from disk using memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::open(&path)?;
        // SAFETY: the mapping is read-only; concurrent truncation of the input
        // by another process is outside what this tool supports.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Self::parse(Bytes::Mapped(mmap), path)
    }

    /// Parse a ROOT file from an in-memory byte vector.
    pub fn from_bytes(data: Vec<u8>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::parse(Bytes::Owned(data), path.into())
    }

    fn parse(data: Bytes, path: PathBuf) -> Result<Self> {
        if data.len() < MIN_FILE_LEN || &data[0..4] != ROOT_MAGIC {
            return Err(RootError::BadMagic);
        }
        let header = parse_header(&data)?;
        tracing::debug!(path = %path.display(), large = header.is_large, "opened ROOT file");
        Ok(Self { data, header, path })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List all keys in the top-level directory.
    pub fn list_keys(&self) -> Result<Vec<KeyInfo>> {
        let dir = self.top_directory()?;
        Ok(dir.keys().iter().map(KeyInfo::from).collect())
    }

    /// List the keys of a (possibly nested) subdirectory, e.g. `"TriggerBits"`.
    pub fn list_keys_in(&self, dir_path: &str) -> Result<Vec<KeyInfo>> {
        let parts: Vec<&str> = dir_path.split('/').filter(|s| !s.is_empty()).collect();
        let dir = self.walk(&parts, dir_path)?;
        Ok(dir.keys().iter().map(KeyInfo::from).collect())
    }

    /// Get a histogram by its full path (e.g. `"TriggerBits/L1Paths"`).
    ///
    /// A path component that does not exist yields [`RootError::KeyNotFound`]
    /// carrying the full requested path.
    pub fn get_histogram(&self, path: &str) -> Result<Histogram1D> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((name, dirs)) = parts.split_last() else {
            return Err(RootError::KeyNotFound(path.to_string()));
        };

        let dir = self.walk(dirs, path)?;
        let key = dir.find_key(name).ok_or_else(|| RootError::KeyNotFound(path.to_string()))?;
        let payload = key.payload(&self.data)?;
        objects::read_histogram(&payload, &key.class_name)
    }

    fn top_directory(&self) -> Result<Directory> {
        Directory::read_key_list(&self.data, self.header.seek_keys, self.header.is_large)
    }

    fn walk(&self, parts: &[&str], full_path: &str) -> Result<Directory> {
        let mut current = self.top_directory()?;
        for part in parts {
            let key = current
                .find_key(part)
                .ok_or_else(|| RootError::KeyNotFound(full_path.to_string()))?;
            if !key.is_directory() {
                return Err(RootError::Deserialization(format!(
                    "'{}' is not a directory (class: {})",
                    part, key.class_name
                )));
            }
            current = self.read_subdirectory(key)?;
        }
        Ok(current)
    }

    fn read_subdirectory(&self, key: &Key) -> Result<Directory> {
        let payload = key.payload(&self.data)?;
        Directory::read_from_payload(&payload, &self.data, self.header.is_large)
    }
}

/// Parse the file header and the top-level TDirectory that follows it.
///
/// Small-file layout (version < 1000000):
/// ```text
/// offset  size  field
///    0      4   magic "root"
///    4      4   fVersion
///    8      4   fBEGIN
///   12      4   fEND
///   16      4   fSeekFree
///   20      4   fNbytesFree
///   24      4   nfree
///   28      4   fNbytesName
///   32      1   fUnits
///   33      4   fCompress
/// ```
/// Large files widen fEND and fSeekFree to 8 bytes. The TDirectory streamer
/// sits at `fBEGIN + fNbytesName`.
fn parse_header(data: &[u8]) -> Result<FileHeader> {
    let mut r = RBuffer::new(data);
    r.skip(4)?;

    let version = r.read_u32()?;
    let is_large = version >= 1_000_000;
    let begin = r.read_u32()? as usize;
    if is_large {
        r.skip(16)?;
    } else {
        r.skip(8)?;
    }
    let _nbytes_free = r.read_u32()?;
    let _nfree = r.read_u32()?;
    let nbytes_name = r.read_u32()? as usize;

    let dir_offset = begin + nbytes_name;
    if dir_offset >= data.len() {
        return Err(RootError::Deserialization("TDirectory offset past end of file".into()));
    }
    r.set_pos(dir_offset);
    let dir = DirectoryHeader::read(&mut r)?;

    Ok(FileHeader { is_large, seek_keys: dir.seek_keys })
}
