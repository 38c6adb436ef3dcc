//! RIFF container parser
//!
//! Recursive descent over the framing grammar: a 4-byte tag, a little-endian
//! u32 size, then either raw payload (leaf) or a 4-byte subtype and nested
//! chunks (list). Odd-size chunks are followed by one pad byte that is never
//! counted in the declared size but is counted against the parent's size.

use crate::chunks::{chunk_ids, ChunkNode, FourCC};
use crate::error::{AviError, Result};
use byteorder::{LittleEndian, ReadBytesExt};

/// Bounds-checked reader over the raw file bytes
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(AviError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn read_fourcc(&mut self) -> Result<FourCC> {
        self.need(4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(FourCC(bytes))
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.need(4)?;
        let value = (&self.data[self.pos..]).read_u32::<LittleEndian>()?;
        self.pos += 4;
        Ok(value)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.need(n)?;
        self.pos += n;
        Ok(())
    }
}

/// Parse raw bytes into a chunk tree.
///
/// The root must be a "RIFF" record and must contain a "movi" list among its
/// direct children; either failing is fatal for the file. Truncation anywhere
/// mid-structure is fatal as well, the container is corrupt.
pub fn parse(data: &[u8]) -> Result<ChunkNode> {
    let mut reader = ByteReader::new(data);

    let tag = reader.read_fourcc()?;
    let size = reader.read_u32()?;
    if tag != chunk_ids::RIFF {
        return Err(AviError::InvalidRiff);
    }

    log::debug!("parsing RIFF container, declared size {}", size);

    let root = parse_list_body(&mut reader, tag, size)?;

    if root.find_list(chunk_ids::MOVI).is_none() {
        return Err(AviError::MissingList("movi"));
    }

    Ok(root)
}

/// Parse list content: subtype then children, consuming exactly `size - 4`
/// bytes. The caller has already consumed the tag and size header.
fn parse_list_body(reader: &mut ByteReader, tag: FourCC, size: u32) -> Result<ChunkNode> {
    if size < 4 {
        return Err(AviError::Truncated {
            needed: 4,
            available: size as usize,
        });
    }
    let subtype = reader.read_fourcc()?;

    let mut remaining = size as u64 - 4;
    let mut children = Vec::new();

    while remaining > 0 {
        if remaining < 8 {
            // Stray bytes too short to hold a chunk header
            return Err(AviError::Truncated {
                needed: 8,
                available: remaining as usize,
            });
        }

        let child_tag = reader.read_fourcc()?;
        let child_size = reader.read_u32()?;
        remaining -= 8;

        // Framed content: payload plus its pad byte counts against this list
        let consumed = child_size as u64 + (child_size & 1) as u64;
        if consumed > remaining {
            return Err(AviError::Truncated {
                needed: consumed as usize,
                available: remaining as usize,
            });
        }

        let child = if child_tag == chunk_ids::LIST {
            parse_list_body(reader, child_tag, child_size)?
        } else {
            let payload = reader.take(child_size as usize)?.to_vec();
            ChunkNode::Leaf {
                tag: child_tag,
                size: child_size,
                payload,
            }
        };

        if child_size & 1 == 1 {
            reader.skip(1)?;
        }

        remaining -= consumed;
        children.push(child);
    }

    Ok(ChunkNode::List {
        tag,
        size,
        subtype,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Append a leaf chunk with header and pad byte
    fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
        out.extend_from_slice(tag);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        if payload.len() % 2 != 0 {
            out.push(0);
        }
    }

    /// Append a LIST chunk wrapping already-framed content
    fn push_list(out: &mut Vec<u8>, subtype: &[u8; 4], content: &[u8]) {
        out.extend_from_slice(b"LIST");
        out.extend_from_slice(&((content.len() + 4) as u32).to_le_bytes());
        out.extend_from_slice(subtype);
        out.extend_from_slice(content);
    }

    /// A minimal well-formed AVI image: hdrl with a dummy avih, a JUNK filler,
    /// and a movi list with interleaved frames
    fn build_avi(movi_content: &[u8]) -> Vec<u8> {
        let mut hdrl = Vec::new();
        push_chunk(&mut hdrl, b"avih", &[0u8; 56]);

        let mut body = Vec::new();
        push_list(&mut body, b"hdrl", &hdrl);
        push_chunk(&mut body, b"JUNK", &[0u8; 12]);
        push_list(&mut body, b"movi", movi_content);

        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
        data.extend_from_slice(b"AVI ");
        data.extend_from_slice(&body);
        data
    }

    fn simple_movi() -> Vec<u8> {
        let mut movi = Vec::new();
        push_chunk(&mut movi, b"00dc", &[1u8; 100]);
        push_chunk(&mut movi, b"01wb", &[2u8; 50]);
        push_chunk(&mut movi, b"00dc", &[3u8; 99]); // odd, exercises padding
        movi
    }

    #[test]
    fn test_parse_structure() {
        let data = build_avi(&simple_movi());
        let root = parse(&data).unwrap();

        assert_eq!(root.tag(), chunk_ids::RIFF);
        assert_eq!(root.subtype(), Some(chunk_ids::AVI));
        assert_eq!(root.children().len(), 3);

        let movi = root.find_list(chunk_ids::MOVI).unwrap();
        assert_eq!(movi.children().len(), 3);
        assert_eq!(movi.children()[0].size(), 100);
        assert_eq!(movi.children()[2].size(), 99);
        assert_eq!(movi.children()[2].padded_size(), 100);
    }

    #[test]
    fn test_parse_preserves_payload() {
        let data = build_avi(&simple_movi());
        let root = parse(&data).unwrap();

        let movi = root.find_list(chunk_ids::MOVI).unwrap();
        assert_eq!(movi.children()[1].payload().unwrap(), &[2u8; 50][..]);
        assert_eq!(movi.children()[2].payload().unwrap(), &[3u8; 99][..]);
    }

    #[test]
    fn test_declared_sizes_match_content() {
        let data = build_avi(&simple_movi());
        let root = parse(&data).unwrap();

        fn check(node: &ChunkNode) {
            assert_eq!(node.recomputed_size(), node.size() as u64);
            for child in node.children() {
                check(child);
            }
        }
        check(&root);
    }

    #[test]
    fn test_invalid_riff() {
        let mut data = build_avi(&simple_movi());
        data[0..4].copy_from_slice(b"LIST");
        assert!(matches!(parse(&data), Err(AviError::InvalidRiff)));
    }

    #[test]
    fn test_truncated_header() {
        let data = b"RIFF\x10";
        assert!(matches!(
            parse(data),
            Err(AviError::Truncated { .. })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = build_avi(&simple_movi());
        data.truncate(data.len() - 20);
        // Declared sizes now exceed the remaining bytes
        assert!(matches!(parse(&data), Err(AviError::Truncated { .. })));
    }

    #[test]
    fn test_child_size_overruns_list() {
        let mut movi = Vec::new();
        push_chunk(&mut movi, b"00dc", &[0u8; 10]);
        let mut data = build_avi(&movi);

        // Inflate the frame's declared size past the end of its list
        let pos = data
            .windows(4)
            .position(|w| w == b"00dc")
            .unwrap();
        data[pos + 4..pos + 8].copy_from_slice(&1000u32.to_le_bytes());

        assert!(matches!(parse(&data), Err(AviError::Truncated { .. })));
    }

    #[test]
    fn test_missing_movi_is_fatal() {
        let mut hdrl = Vec::new();
        push_chunk(&mut hdrl, b"avih", &[0u8; 56]);

        let mut body = Vec::new();
        push_list(&mut body, b"hdrl", &hdrl);

        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
        data.extend_from_slice(b"AVI ");
        data.extend_from_slice(&body);

        assert!(matches!(parse(&data), Err(AviError::MissingList("movi"))));
    }

    #[test]
    fn test_nested_lists() {
        let mut strl = Vec::new();
        push_chunk(&mut strl, b"strh", &[0u8; 56]);

        let mut hdrl = Vec::new();
        push_chunk(&mut hdrl, b"avih", &[0u8; 56]);
        push_list(&mut hdrl, b"strl", &strl);

        let mut body = Vec::new();
        push_list(&mut body, b"hdrl", &hdrl);
        push_list(&mut body, b"movi", &simple_movi());

        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
        data.extend_from_slice(b"AVI ");
        data.extend_from_slice(&body);

        let root = parse(&data).unwrap();
        let hdrl = root.find_list(chunk_ids::HDRL).unwrap();
        assert_eq!(hdrl.children().len(), 2);
        assert!(hdrl.children()[1].is_list());
        assert_eq!(hdrl.children()[1].children().len(), 1);
    }
}
