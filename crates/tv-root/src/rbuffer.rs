//! Cursor over ROOT's big-endian streamer encoding.

use crate::error::{Result, RootError};

/// Byte-count flag on the leading u32 of a streamed object.
pub const BYTE_COUNT_MASK: u32 = 0x4000_0000;
/// Tag announcing that a class name follows inline.
pub const NEW_CLASS_TAG: u32 = 0xFFFF_FFFF;
/// Flag marking a tag as a reference to an already streamed class.
pub const CLASS_MASK: u32 = 0x8000_0000;

/// Header of an object written through a pointer (`TBuffer::WriteObjectAny`).
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectHeader {
    /// Null pointer.
    Null,
    /// First occurrence of a class: the name is stored inline.
    NewClass {
        /// Class name.
        class_name: String,
        /// Absolute end of the object, if a byte count was written.
        end: Option<usize>,
    },
    /// Object of a class streamed earlier in the same buffer.
    ClassRef {
        /// Buffer offset the tag refers to.
        tag: u32,
        /// Absolute end of the object, if a byte count was written.
        end: Option<usize>,
    },
    /// Reference to an object streamed earlier in the same buffer.
    ObjectRef(u32),
}

/// Fixed-width big-endian readers, one method per `name => type` pair.
macro_rules! big_endian {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> Result<$ty> {
                Ok(<$ty>::from_be_bytes(self.read_array()?))
            }
        )*
    };
}

/// Reader over a decompressed object payload.
pub struct RBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Unchecked; reads past the end still fail.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a sub-slice of `n` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    big_endian! {
        read_u16 => u16,
        read_i16 => i16,
        read_u32 => u32,
        read_i32 => i32,
        read_u64 => u64,
        read_f32 => f32,
        read_f64 => f64,
    }

    /// Read a ROOT-encoded string.
    ///
    /// Format: length byte (if < 255), or 255 + u32 length, then UTF-8 bytes.
    pub fn read_string(&mut self) -> Result<String> {
        let first = self.read_u8()?;
        let len = if first == 255 { self.read_u32()? as usize } else { first as usize };
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a NUL-terminated class name.
    pub fn read_cstring(&mut self) -> Result<String> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(RootError::Deserialization(format!(
                "unterminated class name at offset {}",
                self.pos
            )));
        };
        let name = String::from_utf8_lossy(&rest[..nul]).into_owned();
        self.pos += nul + 1;
        Ok(name)
    }

    /// Read a ROOT streamer version header.
    ///
    /// Returns `(version, end_pos)` where `end_pos` is the absolute buffer
    /// position where this streamed object ends (`None` if no byte-count header).
    /// The byte count spans from right after the leading u32 to the end of the
    /// object, version included.
    pub fn read_version(&mut self) -> Result<(u16, Option<usize>)> {
        let start = self.pos;
        let raw = self.read_u32()?;
        if raw & BYTE_COUNT_MASK != 0 {
            let byte_count = (raw & !BYTE_COUNT_MASK) as usize;
            let version = self.read_u16()?;
            Ok((version, Some(start + 4 + byte_count)))
        } else {
            let version = (raw >> 16) as u16;
            self.pos -= 2;
            Ok((version, None))
        }
    }

    /// Skip a versioned sub-object using its byte count.
    ///
    /// Objects without a byte count carry no payload we can size, so only the
    /// version is consumed.
    pub fn skip_versioned(&mut self) -> Result<()> {
        let (_ver, end) = self.read_version()?;
        if let Some(end) = end {
            self.seek_checked(end)?;
        }
        Ok(())
    }

    /// Move to an absolute position inside the buffer.
    pub fn seek_checked(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(RootError::BufferUnderflow {
                offset: self.pos,
                need: pos.saturating_sub(self.pos),
                have: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Read the header that precedes an object written through a pointer.
    pub fn read_object_header(&mut self) -> Result<ObjectHeader> {
        let start = self.pos;
        let first = self.read_u32()?;
        let (tag, end) = if first & BYTE_COUNT_MASK == 0 || first == NEW_CLASS_TAG {
            (first, None)
        } else {
            let byte_count = (first & !BYTE_COUNT_MASK) as usize;
            (self.read_u32()?, Some(start + 4 + byte_count))
        };

        if tag == 0 {
            return Ok(ObjectHeader::Null);
        }
        if tag == NEW_CLASS_TAG {
            let class_name = self.read_cstring()?;
            return Ok(ObjectHeader::NewClass { class_name, end });
        }
        if tag & CLASS_MASK != 0 {
            return Ok(ObjectHeader::ClassRef { tag: tag & !CLASS_MASK, end });
        }
        Ok(ObjectHeader::ObjectRef(tag))
    }

    /// Read a `TObject` header: fUniqueID (u32) + fBits (u32).
    pub fn read_tobject(&mut self) -> Result<(u32, u32)> {
        let _ver = self.read_u16()?;
        let unique_id = self.read_u32()?;
        let bits = self.read_u32()?;
        if bits & 0x0000_0010 != 0 {
            // kIsReferenced: process id follows
            self.skip(2)?;
        }
        Ok((unique_id, bits))
    }

    /// Read a `TNamed`: TObject + fName + fTitle.
    pub fn read_tnamed(&mut self) -> Result<(String, String)> {
        let (_ver, end) = self.read_version()?;
        self.read_tobject()?;
        let name = self.read_string()?;
        let title = self.read_string()?;
        if let Some(end) = end {
            self.seek_checked(end)?;
        }
        Ok((name, title))
    }

    /// Read `n` big-endian f64 values.
    pub fn read_array_f64(&mut self, n: usize) -> Result<Vec<f64>> {
        self.ensure(n.saturating_mul(8))?;
        (0..n).map(|_| self.read_f64()).collect()
    }

    /// Read `n` big-endian f32 values, widened to f64.
    pub fn read_array_f32(&mut self, n: usize) -> Result<Vec<f64>> {
        self.ensure(n.saturating_mul(4))?;
        (0..n).map(|_| self.read_f32().map(f64::from)).collect()
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        bytes.try_into().map_err(|_| RootError::Deserialization(format!("expected {N} bytes")))
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos.saturating_add(n) > self.data.len() {
            return Err(RootError::BufferUnderflow {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}
