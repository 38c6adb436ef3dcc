//! RIFF chunk tree model

use std::fmt;

/// FourCC (Four Character Code) identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Create from bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }

    /// Create from string (must be 4 bytes)
    pub fn from_str(s: &str) -> Option<Self> {
        if s.len() == 4 {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(s.as_bytes());
            Some(FourCC(bytes))
        } else {
            None
        }
    }

    /// Get as string
    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(&self.0).to_string()
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{}\")", self.as_str())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(bytes: &[u8; 4]) -> Self {
        FourCC(*bytes)
    }
}

/// Well-known chunk IDs
pub mod chunk_ids {
    use super::FourCC;

    pub const RIFF: FourCC = FourCC(*b"RIFF");
    pub const AVI: FourCC = FourCC(*b"AVI ");
    pub const LIST: FourCC = FourCC(*b"LIST");
    pub const HDRL: FourCC = FourCC(*b"hdrl");
    pub const AVIH: FourCC = FourCC(*b"avih");
    pub const MOVI: FourCC = FourCC(*b"movi");
    pub const IDX1: FourCC = FourCC(*b"idx1");
    pub const JUNK: FourCC = FourCC(*b"JUNK");
    pub const VIDEO_FRAME: FourCC = FourCC(*b"00dc");
    pub const AUDIO_BLOCK: FourCC = FourCC(*b"01wb");
}

/// A node in the RIFF chunk tree.
///
/// Leaves carry raw payload bytes; lists carry a subtype and nested children.
/// The `size` field is the on-disk declared size: payload length for a leaf,
/// `4 + sum of framed child sizes` for a list. Transforms that mutate the tree
/// must keep every enclosing `size` consistent; the writer re-checks this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkNode {
    /// Plain data chunk (e.g. "00dc", "01wb", "JUNK")
    Leaf {
        tag: FourCC,
        size: u32,
        payload: Vec<u8>,
    },
    /// Container chunk: "LIST", or "RIFF" at the root
    List {
        tag: FourCC,
        size: u32,
        subtype: FourCC,
        children: Vec<ChunkNode>,
    },
}

impl ChunkNode {
    /// Create a leaf with its size derived from the payload
    pub fn leaf(tag: FourCC, payload: Vec<u8>) -> Self {
        ChunkNode::Leaf {
            tag,
            size: payload.len() as u32,
            payload,
        }
    }

    /// Create a LIST with its size derived from the children
    pub fn list(subtype: FourCC, children: Vec<ChunkNode>) -> Self {
        Self::container(chunk_ids::LIST, subtype, children)
    }

    /// Create a RIFF root with its size derived from the children
    pub fn riff(subtype: FourCC, children: Vec<ChunkNode>) -> Self {
        Self::container(chunk_ids::RIFF, subtype, children)
    }

    fn container(tag: FourCC, subtype: FourCC, children: Vec<ChunkNode>) -> Self {
        let size = 4 + children.iter().map(|c| c.framed_size()).sum::<u64>();
        ChunkNode::List {
            tag,
            size: size as u32,
            subtype,
            children,
        }
    }

    /// Chunk tag
    pub fn tag(&self) -> FourCC {
        match self {
            ChunkNode::Leaf { tag, .. } | ChunkNode::List { tag, .. } => *tag,
        }
    }

    /// Declared size (payload bytes for a leaf, content bytes for a list)
    pub fn size(&self) -> u32 {
        match self {
            ChunkNode::Leaf { size, .. } | ChunkNode::List { size, .. } => *size,
        }
    }

    /// Declared size rounded up to the even on-disk length
    pub fn padded_size(&self) -> u32 {
        let size = self.size();
        size + (size & 1)
    }

    /// Bytes this chunk occupies on disk: 8-byte header plus padded content
    pub fn framed_size(&self) -> u64 {
        8 + self.padded_size() as u64
    }

    /// Content length recomputed from actual payload/children, ignoring the
    /// declared `size` field (child sizes are still taken as declared; the
    /// writer recurses so a stale descendant is caught at its own level).
    pub fn recomputed_size(&self) -> u64 {
        match self {
            ChunkNode::Leaf { payload, .. } => payload.len() as u64,
            ChunkNode::List { children, .. } => {
                4 + children.iter().map(|c| c.framed_size()).sum::<u64>()
            }
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ChunkNode::List { .. })
    }

    /// List subtype, if this is a list
    pub fn subtype(&self) -> Option<FourCC> {
        match self {
            ChunkNode::List { subtype, .. } => Some(*subtype),
            ChunkNode::Leaf { .. } => None,
        }
    }

    /// Leaf payload, if this is a leaf
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            ChunkNode::Leaf { payload, .. } => Some(payload),
            ChunkNode::List { .. } => None,
        }
    }

    /// Direct children (empty for a leaf)
    pub fn children(&self) -> &[ChunkNode] {
        match self {
            ChunkNode::List { children, .. } => children,
            ChunkNode::Leaf { .. } => &[],
        }
    }

    pub fn is_junk(&self) -> bool {
        self.tag() == chunk_ids::JUNK
    }

    pub fn is_video_frame(&self) -> bool {
        self.tag() == chunk_ids::VIDEO_FRAME
    }

    pub fn is_audio_block(&self) -> bool {
        self.tag() == chunk_ids::AUDIO_BLOCK
    }

    /// Find a direct child list by subtype
    pub fn find_list(&self, subtype: FourCC) -> Option<&ChunkNode> {
        self.children()
            .iter()
            .find(|c| c.subtype() == Some(subtype))
    }

    /// Find a direct child list by subtype, mutably
    pub fn find_list_mut(&mut self, subtype: FourCC) -> Option<&mut ChunkNode> {
        match self {
            ChunkNode::List { children, .. } => children
                .iter_mut()
                .find(|c| c.subtype() == Some(subtype)),
            ChunkNode::Leaf { .. } => None,
        }
    }

    /// Short human-readable description, for diagnostics
    pub fn describe(&self) -> String {
        match self {
            ChunkNode::Leaf { tag, .. } => format!("'{}' chunk", tag),
            ChunkNode::List { subtype, .. } => format!("'{}' list", subtype),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            ChunkNode::Leaf { tag, size, .. } => {
                writeln!(f, "{}{} ({})", indent, tag, size)
            }
            ChunkNode::List {
                tag,
                size,
                subtype,
                children,
            } => {
                writeln!(f, "{}[{}] <{}> ({})", indent, tag, subtype, size)?;
                for child in children {
                    child.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Indented tree listing, one chunk per line
impl fmt::Display for ChunkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc() {
        let fourcc = FourCC::new(*b"RIFF");
        assert_eq!(fourcc.as_str(), "RIFF");
        assert_eq!(fourcc.as_bytes(), b"RIFF");

        let fourcc2 = FourCC::from_str("AVI ").unwrap();
        assert_eq!(fourcc2.as_str(), "AVI ");
        assert!(FourCC::from_str("toolong").is_none());
    }

    #[test]
    fn test_leaf_sizes() {
        let even = ChunkNode::leaf(chunk_ids::VIDEO_FRAME, vec![0; 100]);
        assert_eq!(even.size(), 100);
        assert_eq!(even.padded_size(), 100);
        assert_eq!(even.framed_size(), 108);

        let odd = ChunkNode::leaf(chunk_ids::AUDIO_BLOCK, vec![0; 5]);
        assert_eq!(odd.size(), 5);
        assert_eq!(odd.padded_size(), 6);
        assert_eq!(odd.framed_size(), 14);
    }

    #[test]
    fn test_list_size_derivation() {
        let list = ChunkNode::list(
            chunk_ids::MOVI,
            vec![
                ChunkNode::leaf(chunk_ids::VIDEO_FRAME, vec![0; 10]),
                ChunkNode::leaf(chunk_ids::AUDIO_BLOCK, vec![0; 3]),
            ],
        );
        // 4 (subtype) + (8 + 10) + (8 + 4)
        assert_eq!(list.size(), 34);
        assert_eq!(list.recomputed_size(), 34);
    }

    #[test]
    fn test_find_list() {
        let root = ChunkNode::riff(
            chunk_ids::AVI,
            vec![
                ChunkNode::list(chunk_ids::HDRL, vec![]),
                ChunkNode::list(chunk_ids::MOVI, vec![]),
                ChunkNode::leaf(chunk_ids::IDX1, vec![0; 16]),
            ],
        );

        assert!(root.find_list(chunk_ids::MOVI).is_some());
        assert!(root.find_list(chunk_ids::HDRL).is_some());
        assert!(root.find_list(FourCC(*b"strl")).is_none());
    }

    #[test]
    fn test_predicates() {
        let junk = ChunkNode::leaf(chunk_ids::JUNK, vec![0; 8]);
        assert!(junk.is_junk());
        assert!(!junk.is_video_frame());
        assert!(!junk.is_list());
        assert_eq!(junk.subtype(), None);
        assert_eq!(junk.payload().unwrap().len(), 8);
    }

    #[test]
    fn test_tree_dump() {
        let root = ChunkNode::riff(
            chunk_ids::AVI,
            vec![ChunkNode::list(
                chunk_ids::MOVI,
                vec![ChunkNode::leaf(chunk_ids::VIDEO_FRAME, vec![0; 100])],
            )],
        );

        let dump = root.to_string();
        assert!(dump.contains("[RIFF] <AVI >"));
        assert!(dump.contains("[LIST] <movi>"));
        assert!(dump.contains("00dc (100)"));
    }
}
