//! RIFF container writer
//!
//! Re-serializes a chunk tree to bytes. Every node's declared size is checked
//! against the content length recomputed while writing: transforms track byte
//! deltas independently, and a disagreement here means one of them mis-counted.
//! That is surfaced as an error, never silently corrected.

use crate::chunks::ChunkNode;
use crate::error::{AviError, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Serialize a chunk tree to its on-disk byte form.
pub fn serialize(root: &ChunkNode) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(root.framed_size() as usize);
    write_node(root, &mut out)?;
    log::debug!("serialized container, {} bytes", out.len());
    Ok(out)
}

fn write_node(node: &ChunkNode, out: &mut Vec<u8>) -> Result<()> {
    let actual = node.recomputed_size();
    if actual != node.size() as u64 {
        return Err(AviError::SizeMismatch {
            tag: node.tag(),
            declared: node.size(),
            actual,
        });
    }

    out.write_all(node.tag().as_bytes())?;
    out.write_u32::<LittleEndian>(node.size())?;

    match node {
        ChunkNode::Leaf { payload, .. } => {
            out.write_all(payload)?;
        }
        ChunkNode::List {
            subtype, children, ..
        } => {
            out.write_all(subtype.as_bytes())?;
            for child in children {
                write_node(child, out)?;
            }
        }
    }

    if node.size() & 1 == 1 {
        out.push(0);
    }

    Ok(())
}
