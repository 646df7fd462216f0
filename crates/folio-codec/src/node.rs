//! The editable tree.
//!
//! `EditableNode` is the in-memory shape the editing surface operates on:
//! block nodes mirroring graph records, with each block's text layer
//! materialized as a leaf text container holding flat-attribute runs.
//!
//! Trees are ephemeral. The decoder rebuilds them from the graph on demand
//! and the encoder discards them once their mutations are applied; the
//! graph stays the only system of record.

use folio_types::{BlockData, BlockId, BlockType, ChildrenId, TextId};

use crate::delta::TextRun;

/// A node of the editable tree: a structural block or a leaf text container.
#[derive(Clone, Debug, PartialEq)]
pub enum EditableNode {
    Block(BlockNode),
    Text(TextNode),
}

/// A structural node mirroring one block record.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockNode {
    pub block_id: BlockId,
    /// Id of the children list this node's child order came from.
    pub relation_id: ChildrenId,
    pub ty: BlockType,
    pub data: BlockData,
    /// When the block has a text layer it is always `children[0]`.
    pub children: Vec<EditableNode>,
}

/// A leaf text container: the materialized text layer of one block.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    /// Bound run-sequence id. `None` for decoder placeholders, which stand
    /// in for a text layer that doesn't exist in the graph.
    pub text_id: Option<TextId>,
    /// At least one run, always — possibly a single empty one.
    pub runs: Vec<TextRun>,
}

impl BlockNode {
    /// A freshly authored block node (import/paste pipelines). Ids are
    /// provisional — the encoder allocates real ones in the graph.
    pub fn new(ty: BlockType, data: BlockData) -> Self {
        let block_id = BlockId::new();
        Self {
            block_id,
            relation_id: ChildrenId::from(block_id),
            ty,
            data,
            children: Vec::new(),
        }
    }

    /// Append a child (builder-style).
    pub fn with_child(mut self, child: impl Into<EditableNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Prepend a text layer holding `runs` (builder-style).
    pub fn with_text(mut self, runs: Vec<TextRun>) -> Self {
        let text_node = TextNode {
            text_id: Some(TextId::from(self.block_id)),
            runs,
        };
        self.children.insert(0, EditableNode::Text(text_node));
        self
    }

    /// This node's text layer, when it has one.
    pub fn text_layer(&self) -> Option<&TextNode> {
        match self.children.first() {
            Some(EditableNode::Text(text)) if text.text_id.is_some() => Some(text),
            _ => None,
        }
    }
}

impl TextNode {
    /// A text container bound to a persisted run sequence.
    pub fn new(text_id: TextId, runs: Vec<TextRun>) -> Self {
        Self {
            text_id: Some(text_id),
            runs,
        }
    }

    /// The decoder's stand-in leaf for a block with no text layer: a single
    /// empty run bound to nothing.
    pub fn placeholder() -> Self {
        Self {
            text_id: None,
            runs: vec![TextRun::default()],
        }
    }
}

impl EditableNode {
    /// Sentinel for a dangling block reference: keeps the parent tree
    /// well-formed and carries the requested id for diagnostics.
    pub fn not_found(id: BlockId) -> Self {
        EditableNode::Block(BlockNode {
            block_id: id,
            relation_id: ChildrenId::from(id),
            ty: BlockType::NotFound,
            data: BlockData::default(),
            children: vec![EditableNode::Text(TextNode::new(
                TextId::from(id),
                vec![TextRun::default()],
            ))],
        })
    }

    pub fn as_block(&self) -> Option<&BlockNode> {
        match self {
            EditableNode::Block(block) => Some(block),
            EditableNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            EditableNode::Text(text) => Some(text),
            EditableNode::Block(_) => None,
        }
    }

    /// Concatenate every run of the subtree in document order, one line per
    /// block-level text layer. Used for copy-as-text and export.
    pub fn plain_text(&self) -> String {
        match self {
            EditableNode::Text(text) => text.runs.iter().map(|r| r.text.as_str()).collect(),
            EditableNode::Block(block) => block
                .children
                .iter()
                .map(EditableNode::plain_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<BlockNode> for EditableNode {
    fn from(node: BlockNode) -> Self {
        EditableNode::Block(node)
    }
}

impl From<TextNode> for EditableNode {
    fn from(node: TextNode) -> Self {
        EditableNode::Text(node)
    }
}

// ============================================================================
// Tests
// ============================================================================
