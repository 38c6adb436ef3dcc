//! Structural transforms over a parsed chunk tree
//!
//! Each pass mutates a tree (or a designated sub-list) in place and returns
//! the net byte delta of its framed content; the caller applies that delta to
//! every enclosing ancestor's declared size. Soft conditions (nothing to do,
//! ambiguous layout) return a zero delta and log a diagnostic.

mod audio;
mod prune;

pub use audio::{fix_big_audio_chunk, redistribute_audio};
pub use prune::{prune_empty_frames, prune_junk, prune_unused_lists};

use crate::chunks::{chunk_ids, ChunkNode};
use crate::error::{AviError, Result};

/// Destructure a movi list into its size and children, or fail the
/// precondition check for a pass that only operates on the movi list.
fn movi_parts(node: &mut ChunkNode) -> Result<(&mut u32, &mut Vec<ChunkNode>)> {
    if !matches!(node, ChunkNode::List { subtype, .. } if *subtype == chunk_ids::MOVI) {
        return Err(AviError::Precondition {
            expected: "movi list",
            found: node.describe(),
        });
    }
    match node {
        ChunkNode::List { size, children, .. } => Ok((size, children)),
        _ => unreachable!(),
    }
}

/// Total framed bytes of a chunk sequence
fn framed_total(chunks: &[ChunkNode]) -> u64 {
    chunks.iter().map(|c| c.framed_size()).sum()
}

/// Interleave video chunks among audio chunks proportionally.
///
/// The first two emitted chunks are always `video[0], audio[0]`. Before each
/// subsequent audio chunk, `remaining_video / remaining_audio` of the next
/// unemitted video chunks are placed (integer division, both counts taken at
/// that step), so the spacing stays even across the whole sequence. Leftover
/// video is appended at the end. Either side being empty passes the other
/// side through unchanged.
fn interleave(videos: Vec<ChunkNode>, audios: Vec<ChunkNode>) -> Vec<ChunkNode> {
    if videos.is_empty() {
        return audios;
    }
    if audios.is_empty() {
        return videos;
    }

    let video_count = videos.len();
    let audio_count = audios.len();
    let mut out = Vec::with_capacity(video_count + audio_count);

    let mut video_src = videos.into_iter();
    let mut audio_src = audios.into_iter();

    out.extend(video_src.next());
    out.extend(audio_src.next());
    let mut emitted_video = 1;

    for placed_audio in 1..audio_count {
        let remaining_audio = audio_count - placed_audio;
        let remaining_video = video_count - emitted_video;
        let take = remaining_video / remaining_audio;
        for _ in 0..take {
            out.extend(video_src.next());
        }
        emitted_video += take;
        out.extend(audio_src.next());
    }

    out.extend(video_src);
    out
}
