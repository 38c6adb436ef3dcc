//! Transform pipeline
//!
//! Applies a caller-chosen, ordered subset of transforms to one parsed tree.
//! Order is significant and never normalized: pruning empty frames before
//! redistributing audio changes the frame count the target chunk size is
//! derived from, so the two orderings legitimately produce different output.

use crate::chunks::{chunk_ids, ChunkNode};
use crate::error::{AviError, Result};
use crate::transforms::{
    fix_big_audio_chunk, prune_empty_frames, prune_junk, prune_unused_lists, redistribute_audio,
};

/// The available structural transforms, in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Remove "JUNK" filler chunks at any depth
    PruneJunk,
    /// Keep only the hdrl and movi lists at the top level
    PruneUnusedLists,
    /// Remove zero-length video frames from the movi list
    PruneEmptyFrames,
    /// Re-chunk all audio evenly among the video frames
    RedistributeAudio,
    /// Legacy: repair one oversized trailing audio chunk
    FixBigAudioChunk,
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::PruneJunk => "prune-junk",
            Transform::PruneUnusedLists => "prune-unused-lists",
            Transform::PruneEmptyFrames => "prune-empty-frames",
            Transform::RedistributeAudio => "redistribute-audio",
            Transform::FixBigAudioChunk => "fix-big-audio-chunk",
        }
    }
}

/// Outcome of one applied transform
#[derive(Debug, Clone, Copy)]
pub struct TransformReport {
    pub transform: Transform,
    /// Signed change to the file's byte size (negative when bytes were freed)
    pub delta: i64,
}

/// Apply transforms to a parsed tree in the given order.
///
/// Whole-tree passes act on the root directly. Movi-scoped passes locate the
/// mandatory movi child, run against it, and propagate the returned delta to
/// the root's declared size, keeping the tree ready for [`serialize`].
///
/// [`serialize`]: crate::writer::serialize
pub fn apply_transforms(
    root: &mut ChunkNode,
    transforms: &[Transform],
) -> Result<Vec<TransformReport>> {
    let mut reports = Vec::with_capacity(transforms.len());

    for &transform in transforms {
        let delta = match transform {
            Transform::PruneJunk => -(prune_junk(root) as i64),
            Transform::PruneUnusedLists => -(prune_unused_lists(root)? as i64),
            Transform::PruneEmptyFrames => {
                apply_to_movi(root, |movi| Ok(-(prune_empty_frames(movi)? as i64)))?
            }
            Transform::RedistributeAudio => apply_to_movi(root, redistribute_audio)?,
            Transform::FixBigAudioChunk => apply_to_movi(root, fix_big_audio_chunk)?,
        };

        log::debug!("applied {}: delta {} bytes", transform.name(), delta);
        reports.push(TransformReport { transform, delta });
    }

    Ok(reports)
}

/// Run a movi-scoped pass and apply its delta to the root's declared size
fn apply_to_movi<F>(root: &mut ChunkNode, pass: F) -> Result<i64>
where
    F: FnOnce(&mut ChunkNode) -> Result<i64>,
{
    let movi = root
        .find_list_mut(chunk_ids::MOVI)
        .ok_or(AviError::MissingList("movi"))?;
    let delta = pass(movi)?;

    if let ChunkNode::List { size, .. } = root {
        *size = (*size as i64 + delta) as u32;
    }
    Ok(delta)
}
