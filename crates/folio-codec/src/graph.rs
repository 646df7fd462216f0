//! Shared block graph — the codec's view of the replicated document state.
//!
//! The replication runtime owns conflict resolution; by the time the codec
//! reads or writes, every map and sequence is plain converged data. The
//! graph is therefore modeled as an arena of records addressed by id — no
//! pointer links, no back-references — so recursive decode/encode is always
//! an id lookup away from any block.
//!
//! Three id-keyed maps plus a root:
//! - `blocks`: block records
//! - `children`: ordered child-id sequences (insertion order = sibling order)
//! - `texts`: per-block rich-text run sequences

use std::collections::BTreeMap;

use folio_types::{BlockData, BlockId, BlockType, ChildrenId, TextId};
use serde::{Deserialize, Serialize};

use crate::delta::RunOp;
use crate::{CodecError, Result};

/// One block's persisted record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: BlockId,
    pub ty: BlockType,
    /// Names the ordered child-id sequence owned by this block.
    pub children_id: ChildrenId,
    /// External text-layer binding, if the block has ever had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<TextId>,
    /// Raw structural payload as persisted (a JSON object string).
    #[serde(default)]
    pub data: String,
}

/// Arena of converged document state.
///
/// Invariant (maintained by writers, assumed by the decoder): every
/// non-root block is reachable from exactly one parent's children list,
/// and `children_id` uniquely identifies the list owned by that block.
#[derive(Clone, Debug, Default)]
pub struct SharedGraph {
    blocks: BTreeMap<BlockId, BlockRecord>,
    children: BTreeMap<ChildrenId, Vec<BlockId>>,
    texts: BTreeMap<TextId, Vec<RunOp>>,
    root: Option<BlockId>,
}

impl SharedGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Read surface (consumed by the decoder)
    // =========================================================================

    /// Get a block record by id.
    pub fn get_block(&self, id: &BlockId) -> Option<&BlockRecord> {
        self.blocks.get(id)
    }

    /// Get the ordered child-id sequence of a children list.
    pub fn children_list(&self, id: &ChildrenId) -> Option<&[BlockId]> {
        self.children.get(id).map(Vec::as_slice)
    }

    /// Get the run sequence of a text layer.
    pub fn text_runs(&self, id: &TextId) -> Option<&[RunOp]> {
        self.texts.get(id).map(Vec::as_slice)
    }

    /// The root page id, if the document has one.
    pub fn root_page_id(&self) -> Option<BlockId> {
        self.root
    }

    /// Number of block records.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the graph holds no blocks at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // =========================================================================
    // Write surface (consumed by the encoder)
    // =========================================================================

    /// Allocate a fresh block record with an empty children list and no
    /// text layer. Returns a copy of the new record.
    pub fn create_block(&mut self, ty: BlockType, data: &BlockData) -> BlockRecord {
        let id = BlockId::new();
        let record = BlockRecord {
            id,
            ty,
            children_id: ChildrenId::from(id),
            external_id: None,
            data: data.to_payload(),
        };
        self.children.insert(record.children_id, Vec::new());
        self.blocks.insert(id, record.clone());
        record
    }

    /// Obtain the text layer bound to a block, creating the binding and an
    /// empty run sequence on first use.
    pub fn bind_text_layer(&mut self, id: &BlockId) -> Result<TextId> {
        let record = self
            .blocks
            .get_mut(id)
            .ok_or(CodecError::BlockNotFound(*id))?;
        let text_id = *record.external_id.get_or_insert_with(|| TextId::from(*id));
        self.texts.entry(text_id).or_default();
        Ok(text_id)
    }

    /// Replace a text layer's run sequence in one step.
    pub fn apply_run_ops(&mut self, text_id: &TextId, ops: Vec<RunOp>) {
        self.texts.insert(*text_id, ops);
    }

    /// Insert (or move) `child` within `parent`'s children list at `index`.
    /// Existing entries at or after the index shift right; an index past the
    /// end clamps to appending.
    pub fn set_parent(&mut self, child: &BlockId, parent: &BlockId, index: usize) -> Result<()> {
        let children_id = self
            .blocks
            .get(parent)
            .map(|record| record.children_id)
            .ok_or(CodecError::BlockNotFound(*parent))?;
        let list = self.children.entry(children_id).or_default();
        list.retain(|id| id != child);
        let index = index.min(list.len());
        list.insert(index, *child);
        Ok(())
    }

    /// Set the root page id.
    pub fn set_root(&mut self, id: BlockId) {
        self.root = Some(id);
    }

    // =========================================================================
    // Direct construction (sync ingestion and tests)
    // =========================================================================

    /// Insert a record as-is, replacing any previous record with its id.
    pub fn insert_record(&mut self, record: BlockRecord) {
        self.blocks.insert(record.id, record);
    }

    /// Insert a children list as-is.
    pub fn insert_children(&mut self, id: ChildrenId, child_ids: Vec<BlockId>) {
        self.children.insert(id, child_ids);
    }

    /// Insert a text-layer run sequence as-is.
    pub fn insert_text(&mut self, id: TextId, ops: Vec<RunOp>) {
        self.texts.insert(id, ops);
    }
}

// ============================================================================
// Tests
// ============================================================================
