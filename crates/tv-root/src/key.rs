//! TKey records: the per-object headers ROOT uses to locate payloads.

use crate::decompress::decompress;
use crate::error::{Result, RootError};
use crate::rbuffer::RBuffer;

/// Key versions above this store 64-bit seek pointers.
const LARGE_KEY_VERSION: u16 = 1000;

/// A parsed TKey record.
#[derive(Debug, Clone)]
pub struct Key {
    /// Key header plus stored (possibly compressed) object.
    pub n_bytes: u32,
    /// Object size once decompressed.
    pub obj_len: u32,
    pub key_len: u16,
    pub cycle: u16,
    /// Absolute file offset of the record.
    pub seek_key: u64,
    pub class_name: String,
    pub name: String,
}

/// Name and class of a stored object, as returned by directory listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub name: String,
    pub class_name: String,
    pub cycle: u16,
}

impl From<&Key> for KeyInfo {
    fn from(key: &Key) -> Self {
        Self { name: key.name.clone(), class_name: key.class_name.clone(), cycle: key.cycle }
    }
}

impl Key {
    /// Decode the record starting at the buffer's current position.
    pub fn read(r: &mut RBuffer, is_large: bool) -> Result<Self> {
        let n_bytes = r.read_u32()?;
        let version = r.read_u16()?;
        let obj_len = r.read_u32()?;
        r.skip(4)?; // datime
        let key_len = r.read_u16()?;
        let cycle = r.read_u16()?;

        // seek_key, then the parent directory's offset which is not needed
        let seek_key = if is_large || version > LARGE_KEY_VERSION {
            let seek = r.read_u64()?;
            r.skip(8)?;
            seek
        } else {
            let seek = u64::from(r.read_u32()?);
            r.skip(4)?;
            seek
        };

        let class_name = r.read_string()?;
        let name = r.read_string()?;
        r.read_string()?; // title

        Ok(Key { n_bytes, obj_len, key_len, cycle, seek_key, class_name, name })
    }

    pub fn is_directory(&self) -> bool {
        self.class_name == "TDirectoryFile" || self.class_name == "TDirectory"
    }

    /// The object bytes of this record, decompressed when stored compressed.
    pub fn payload(&self, file_data: &[u8]) -> Result<Vec<u8>> {
        let start = usize::try_from(self.seek_key).map_err(|_| {
            RootError::Deserialization(format!("seek offset too large: {}", self.seek_key))
        })?;
        let underflow = || RootError::BufferUnderflow {
            offset: start,
            need: self.n_bytes as usize,
            have: file_data.len().saturating_sub(start),
        };
        let end = start.checked_add(self.n_bytes as usize).ok_or_else(underflow)?;
        let header = self.key_len as usize;
        if end > file_data.len() || header > self.n_bytes as usize {
            return Err(underflow());
        }

        let stored = &file_data[start + header..end];
        let expected = self.obj_len as usize;
        if stored.len() == expected { Ok(stored.to_vec()) } else { decompress(stored, expected) }
    }
}
