//! Audio re-chunking passes for the movi list
//!
//! A fixed-rate playback device drifts out of audio/video sync when audio
//! arrives in bursts, so these passes re-cut the audio payload into uniform
//! pieces and space them evenly among the video frames. The general pass
//! re-chunks the whole stream; the legacy pass only repairs one oversized
//! trailing chunk, a known encoder artifact.

use super::{framed_total, interleave, movi_parts};
use crate::chunks::{chunk_ids, ChunkNode};
use crate::error::Result;
use std::collections::HashMap;

/// Re-chunk all audio in the movi list into uniform pieces and interleave
/// them evenly among the video frames.
///
/// The target chunk size is chosen so roughly one audio chunk lands per two
/// video frames. Audio payload bytes and their order are preserved exactly;
/// video chunks are untouched in count, content, and relative order. Chunks
/// that are neither video nor audio are dropped with a warning. Returns the
/// net byte delta applied to the movi list's declared size; the caller must
/// apply the same delta to the root.
pub fn redistribute_audio(movi: &mut ChunkNode) -> Result<i64> {
    let (size, children) = movi_parts(movi)?;

    let has_video = children.iter().any(|c| c.is_video_frame());
    let has_audio = children.iter().any(|c| c.is_audio_block());
    if !has_video || !has_audio {
        log::debug!("movi has no audio/video pair to redistribute, leaving unchanged");
        return Ok(0);
    }

    let old_content = framed_total(children);

    let mut videos = Vec::new();
    let mut audio_bytes = Vec::new();
    let mut dropped = 0usize;
    for child in children.drain(..) {
        if child.is_video_frame() {
            videos.push(child);
        } else if child.is_audio_block() {
            if let ChunkNode::Leaf { payload, .. } = child {
                audio_bytes.extend_from_slice(&payload);
            }
        } else {
            log::warn!("dropping {} from movi during redistribution", child.describe());
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::warn!("{} non-stream chunks dropped from movi", dropped);
    }

    let target = target_chunk_size(audio_bytes.len(), videos.len());
    let new_audio: Vec<ChunkNode> = audio_bytes
        .chunks(target)
        .map(|piece| ChunkNode::leaf(chunk_ids::AUDIO_BLOCK, piece.to_vec()))
        .collect();

    log::debug!(
        "re-chunked {} audio bytes into {} pieces of {} bytes",
        audio_bytes.len(),
        new_audio.len(),
        target
    );

    *children = interleave(videos, new_audio);

    let new_content = framed_total(children);
    let delta = new_content as i64 - old_content as i64;
    *size = (*size as i64 + delta) as u32;
    Ok(delta)
}

/// Uniform audio chunk size: twice the per-frame share of the audio payload,
/// rounded up to even. Clamped to a floor of 2 so slicing terminates when the
/// audio payload is smaller than the frame count.
fn target_chunk_size(total_audio_bytes: usize, video_count: usize) -> usize {
    let mut target = total_audio_bytes * 2 / video_count;
    target += target & 1;
    target.max(2)
}

/// Repair a single oversized trailing audio chunk.
///
/// Detects an audio chunk at least twice the modal (most frequent) audio
/// chunk size. Everything from that chunk onward is split into tail video and
/// tail audio; the tail audio is re-cut to the modal size and spliced back
/// with the proportional interleave rule, after the untouched prefix. Soft
/// no-ops (zero delta, logged): no anomaly above threshold, or an ambiguous
/// tail holding more than two audio chunks.
pub fn fix_big_audio_chunk(movi: &mut ChunkNode) -> Result<i64> {
    let (size, children) = movi_parts(movi)?;

    let audio_sizes: Vec<u32> = children
        .iter()
        .filter(|c| c.is_audio_block())
        .map(|c| c.size())
        .collect();
    if audio_sizes.is_empty() {
        log::debug!("movi has no audio chunks, nothing to fix");
        return Ok(0);
    }

    let modal = modal_size(&audio_sizes);
    if modal == 0 {
        log::debug!("modal audio chunk size is zero, nothing to re-chunk");
        return Ok(0);
    }

    // First occurrence wins among equally-large chunks
    let mut largest: Option<(usize, u32)> = None;
    for (idx, child) in children.iter().enumerate() {
        if child.is_audio_block() && largest.map_or(true, |(_, s)| child.size() > s) {
            largest = Some((idx, child.size()));
        }
    }
    let Some((largest_idx, largest_size)) = largest else {
        return Ok(0);
    };

    if (largest_size as u64) < 2 * modal as u64 {
        log::debug!(
            "largest audio chunk ({} bytes) below anomaly threshold (modal {})",
            largest_size,
            modal
        );
        return Ok(0);
    }

    let tail_audio_count = children[largest_idx..]
        .iter()
        .filter(|c| c.is_audio_block())
        .count();
    if tail_audio_count > 2 {
        log::warn!(
            "ambiguous tail layout ({} audio chunks after the anomaly), skipping fix",
            tail_audio_count
        );
        return Ok(0);
    }

    let old_content = framed_total(children);

    let tail = children.split_off(largest_idx);
    let mut tail_videos = Vec::new();
    let mut tail_audio_bytes = Vec::new();
    for child in tail {
        if child.is_video_frame() {
            tail_videos.push(child);
        } else if child.is_audio_block() {
            if let ChunkNode::Leaf { payload, .. } = child {
                tail_audio_bytes.extend_from_slice(&payload);
            }
        } else {
            log::warn!("dropping {} from movi tail", child.describe());
        }
    }

    let new_tail_audio: Vec<ChunkNode> = tail_audio_bytes
        .chunks(modal as usize)
        .map(|piece| ChunkNode::leaf(chunk_ids::AUDIO_BLOCK, piece.to_vec()))
        .collect();

    log::debug!(
        "re-cut {} tail audio bytes into {} chunks of modal size {}",
        tail_audio_bytes.len(),
        new_tail_audio.len(),
        modal
    );

    children.extend(interleave(tail_videos, new_tail_audio));

    let new_content = framed_total(children);
    let delta = new_content as i64 - old_content as i64;
    *size = (*size as i64 + delta) as u32;
    Ok(delta)
}

/// Most frequently occurring size; ties resolve toward the smaller size.
/// Robust against a single outlier in a way mean or max are not.
fn modal_size(sizes: &[u32]) -> u32 {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &size in sizes {
        *counts.entry(size).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(size, _)| size)
        .unwrap_or(0)
}
