//! RIFF/AVI container restructuring
//!
//! This crate parses a RIFF-family container (specifically AVI) into an
//! in-memory chunk tree, applies structural transforms that shrink or
//! re-shape it for playback on a resource-constrained streaming device, and
//! re-serializes the tree with every size field recomputed and cross-checked.
//!
//! # Features
//!
//! - Full RIFF chunk tree parsing and byte-identical re-serialization
//! - JUNK, unused-list, and empty-frame pruning
//! - Audio re-chunking and even interleave against the video frames
//! - Per-transform byte-delta reporting for the surrounding orchestration
//!
//! Only the container framing is understood: payload content is never
//! decoded, validated, or re-encoded.
//!
//! # Example
//!
//! ```no_run
//! use avi_slim::{apply_transforms, parse, serialize, Transform};
//!
//! let bytes = std::fs::read("video.avi").unwrap();
//! let mut tree = parse(&bytes).unwrap();
//!
//! apply_transforms(
//!     &mut tree,
//!     &[
//!         Transform::PruneJunk,
//!         Transform::PruneUnusedLists,
//!         Transform::PruneEmptyFrames,
//!         Transform::RedistributeAudio,
//!     ],
//! )
//! .unwrap();
//!
//! std::fs::write("video-slim.avi", serialize(&tree).unwrap()).unwrap();
//! ```

mod chunks;
mod error;
mod parser;
mod pipeline;
mod transforms;
mod writer;

pub use chunks::{chunk_ids, ChunkNode, FourCC};
pub use error::{AviError, Result};
pub use parser::parse;
pub use pipeline::{apply_transforms, Transform, TransformReport};
pub use transforms::{
    fix_big_audio_chunk, prune_empty_frames, prune_junk, prune_unused_lists, redistribute_audio,
};
pub use writer::serialize;
