//! Pruning passes: JUNK filler, unused top-level lists, empty video frames

use super::movi_parts;
use crate::chunks::{chunk_ids, ChunkNode};
use crate::error::{AviError, Result};

/// Remove every "JUNK" chunk at any depth below `node`.
///
/// Walks lists recursively; each level shrinks its own declared size by the
/// bytes freed beneath it (direct removals plus amounts bubbled up from
/// descendant lists) and returns that total so the caller can shrink too.
/// Freed framed sizes are always even, so pad parity never shifts.
pub fn prune_junk(node: &mut ChunkNode) -> u64 {
    let ChunkNode::List { size, children, .. } = node else {
        return 0;
    };

    let mut freed = 0u64;
    children.retain(|child| {
        if child.is_junk() {
            freed += child.framed_size();
            false
        } else {
            true
        }
    });

    for child in children.iter_mut() {
        freed += prune_junk(child);
    }

    if freed > 0 {
        *size -= freed as u32;
    }
    freed
}

/// Keep only the "hdrl" and "movi" lists among the root's direct children.
///
/// Everything else, index chunks and stray metadata included, is dropped and
/// its framed size subtracted from the root's declared size. The movi list is
/// re-checked afterwards: this pass runs after parsing, but nothing stops a
/// caller from handing it a tree another pass already mangled.
pub fn prune_unused_lists(root: &mut ChunkNode) -> Result<u64> {
    let ChunkNode::List { size, children, .. } = root else {
        return Err(AviError::Precondition {
            expected: "RIFF root list",
            found: root.describe(),
        });
    };

    let mut freed = 0u64;
    children.retain(|child| match child.subtype() {
        Some(subtype) if subtype == chunk_ids::HDRL || subtype == chunk_ids::MOVI => true,
        _ => {
            log::debug!("dropping unused top-level {}", child.describe());
            freed += child.framed_size();
            false
        }
    });

    if !children.iter().any(|c| c.subtype() == Some(chunk_ids::MOVI)) {
        return Err(AviError::MissingList("movi"));
    }

    *size -= freed as u32;
    Ok(freed)
}

/// Remove zero-length "00dc" video frames from the movi list.
///
/// Some encoders emit empty placeholder frames that only waste header bytes
/// on the playback device. All other children, non-empty frames and audio
/// alike, keep their original relative order.
pub fn prune_empty_frames(movi: &mut ChunkNode) -> Result<u64> {
    let (size, children) = movi_parts(movi)?;

    let mut freed = 0u64;
    children.retain(|child| {
        if child.is_video_frame() && child.size() == 0 {
            freed += child.framed_size();
            false
        } else {
            true
        }
    });

    *size -= freed as u32;
    if freed > 0 {
        log::debug!("removed empty frames, {} bytes freed", freed);
    }
    Ok(freed)
}
