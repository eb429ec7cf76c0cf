//! Decoding of ROOT's compressed object payloads.
//!
//! A payload is a run of blocks, each behind a 9-byte header:
//! ```text
//! bytes 0-1:  algorithm tag ("ZL", "XZ", "L4", "ZS")
//! byte  2:    method (ignored)
//! bytes 3-5:  compressed size   (3-byte little-endian)
//! bytes 6-8:  uncompressed size (3-byte little-endian)
//! ```

use std::io::Read;

use crate::error::{Result, RootError};

const BLOCK_HEADER_LEN: usize = 9;
/// xxhash64 checksum in front of every LZ4 block; not verified.
const LZ4_CHECKSUM_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    Zlib,
    Lz4,
    Zstd,
    Xz,
}

impl Algorithm {
    fn from_tag(tag: &[u8]) -> Result<Self> {
        match tag {
            b"ZL" => Ok(Algorithm::Zlib),
            b"L4" => Ok(Algorithm::Lz4),
            b"ZS" => Ok(Algorithm::Zstd),
            b"XZ" => Ok(Algorithm::Xz),
            other => Err(fail(format!(
                "unsupported compression algorithm: {}",
                String::from_utf8_lossy(other)
            ))),
        }
    }

    fn decode(self, block: &[u8], size: usize) -> Result<Vec<u8>> {
        match self {
            Algorithm::Zlib => read_all("zlib", flate2::read::ZlibDecoder::new(block), size),
            Algorithm::Lz4 => {
                let body = block
                    .get(LZ4_CHECKSUM_LEN..)
                    .ok_or_else(|| fail("LZ4 block shorter than its checksum".into()))?;
                lz4_flex::decompress(body, size).map_err(|e| fail(format!("lz4: {e}")))
            }
            Algorithm::Zstd => {
                let decoder = ruzstd::decoding::StreamingDecoder::new(block)
                    .map_err(|e| fail(format!("zstd: {e}")))?;
                read_all("zstd", decoder, size)
            }
            Algorithm::Xz => {
                let mut out = Vec::with_capacity(size);
                lzma_rs::xz_decompress(&mut std::io::BufReader::new(block), &mut out)
                    .map_err(|e| fail(format!("xz: {e}")))?;
                Ok(out)
            }
        }
    }
}

fn fail(msg: String) -> RootError {
    RootError::Decompression(msg)
}

/// Decompress `src` into exactly `expected_len` bytes.
pub fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut rest = src;

    while out.len() < expected_len && rest.len() >= BLOCK_HEADER_LEN {
        let (header, body) = rest.split_at(BLOCK_HEADER_LEN);
        let algorithm = Algorithm::from_tag(&header[..2])?;
        let stored = read_le24(&header[3..6]);
        let size = read_le24(&header[6..9]);
        if stored > body.len() {
            return Err(fail(format!(
                "compressed block claims {stored} bytes but only {} remain",
                body.len()
            )));
        }

        let (block, tail) = body.split_at(stored);
        let decoded = algorithm.decode(block, size)?;
        if decoded.len() != size {
            return Err(fail(format!(
                "{algorithm:?} block gave {} bytes, header says {size}",
                decoded.len()
            )));
        }
        out.extend_from_slice(&decoded);
        rest = tail;
    }

    if out.len() != expected_len {
        return Err(fail(format!(
            "decompressed {} bytes, key expects {expected_len}",
            out.len()
        )));
    }
    Ok(out)
}

fn read_all(algo: &str, mut reader: impl Read, size: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(size);
    reader.read_to_end(&mut out).map_err(|e| fail(format!("{algo}: {e}")))?;
    Ok(out)
}

fn read_le24(b: &[u8]) -> usize {
    usize::from(b[0]) | usize::from(b[1]) << 8 | usize::from(b[2]) << 16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_block(tag: &[u8; 2], method: u8, compressed: &[u8], u_len: usize) -> Vec<u8> {
        let mut block = Vec::new();
        block.extend_from_slice(tag);
        block.push(method);
        block.extend_from_slice(&(compressed.len() as u32).to_le_bytes()[..3]);
        block.extend_from_slice(&(u_len as u32).to_le_bytes()[..3]);
        block.extend_from_slice(compressed);
        block
    }

    #[test]
    fn le24() {
        assert_eq!(read_le24(&[0x10, 0x00, 0x00]), 16);
        assert_eq!(read_le24(&[0x00, 0x01, 0x00]), 256);
        assert_eq!(read_le24(&[0xff, 0xff, 0xff]), 0xFF_FFFF);
    }

    #[test]
    fn zlib_multi_block() {
        use flate2::Compression;
        use flate2::write::ZlibEncoder;
        use std::io::Write;

        let parts: [&[u8]; 2] = [b"L1_SingleMu7 L1_DoubleEG5 ", b"HLT_Mu9 HLT_Ele15_LW_L1R"];
        let mut src = Vec::new();
        for part in parts {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(part).unwrap();
            src.extend(root_block(b"ZL", 8, &enc.finish().unwrap(), part.len()));
        }
        let expected = parts.concat();
        assert_eq!(decompress(&src, expected.len()).unwrap(), expected);
    }

    #[test]
    fn zstd_block() {
        let original = b"TriggerBits TriggerBits TriggerBits";
        let compressed = ruzstd::encoding::compress_to_vec(
            &original[..],
            ruzstd::encoding::CompressionLevel::Fastest,
        );
        let block = root_block(b"ZS", 4, &compressed, original.len());
        assert_eq!(decompress(&block, original.len()).unwrap(), &original[..]);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let block = root_block(b"QQ", 0, &[1, 2, 3], 3);
        assert!(matches!(decompress(&block, 3), Err(RootError::Decompression(_))));
    }

    #[test]
    fn lz4_block_skips_checksum() {
        let original = b"HLT_Jet30 HLT_Jet30 HLT_Jet30 HLT_Jet30";
        let mut stored = vec![0u8; LZ4_CHECKSUM_LEN];
        stored.extend(lz4_flex::compress(original));
        let block = root_block(b"L4", 1, &stored, original.len());
        assert_eq!(decompress(&block, original.len()).unwrap(), &original[..]);
    }

    #[test]
    fn truncated_block_is_an_error() {
        let mut block = root_block(b"ZL", 8, &[0u8; 16], 32);
        block.truncate(12);
        assert!(decompress(&block, 32).is_err());
    }
}
