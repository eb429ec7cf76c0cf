//! TDirectory records and their key lists.

use crate::error::Result;
use crate::key::Key;
use crate::rbuffer::RBuffer;

/// A parsed TDirectory: an ordered list of TKeys.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    keys: Vec<Key>,
}

/// Seek information carried by a TDirectory streamer.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryHeader {
    /// Absolute position of the key list record.
    pub seek_keys: u64,
}

impl DirectoryHeader {
    /// Parse the TDirectory streamer at the reader's current position.
    ///
    /// Only `fSeekKeys` is kept; it follows two datimes, two byte counts and
    /// the directory's own and parent's seek pointers.
    pub fn read(r: &mut RBuffer) -> Result<Self> {
        let wide = r.read_u16()? > 1000;
        r.skip(16)?;
        let seek_keys = if wide {
            r.skip(16)?;
            r.read_u64()?
        } else {
            r.skip(8)?;
            u64::from(r.read_u32()?)
        };
        Ok(Self { seek_keys })
    }
}

impl Directory {
    /// Read the key list record at `seek_keys`.
    ///
    /// The record is itself a TKey, followed by a u32 key count and the keys.
    pub fn read_key_list(file_data: &[u8], seek_keys: u64, is_large: bool) -> Result<Self> {
        if seek_keys == 0 {
            return Ok(Self::default());
        }
        let mut r = RBuffer::new(file_data);
        r.seek_checked(seek_keys as usize)?;

        Key::read(&mut r, is_large)?;
        let count = r.read_u32()? as usize;
        let keys = (0..count)
            .map(|_| Key::read(&mut r, is_large))
            .collect::<Result<Vec<_>>>()?;
        Ok(Directory { keys })
    }

    /// Read a subdirectory from the payload of its `TDirectoryFile` key.
    pub fn read_from_payload(payload: &[u8], file_data: &[u8], is_large: bool) -> Result<Self> {
        let header = DirectoryHeader::read(&mut RBuffer::new(payload))?;
        Self::read_key_list(file_data, header.seek_keys, is_large)
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Highest cycle of the key called `name`.
    pub fn find_key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().filter(|k| k.name == name).max_by_key(|k| k.cycle)
    }
}
