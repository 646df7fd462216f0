//! Block decoder — materializes an editable tree from the shared graph.
//!
//! Decoding is a plain depth-first walk over converged data, tolerant of
//! the holes a replicated graph can legitimately have: a dangling child id
//! becomes a sentinel node, a missing children list reads as no children,
//! an unparseable payload reads as empty. One fault class stays fatal —
//! a run sequence that fails to parse aborts the whole document decode
//! (see DESIGN.md on this asymmetry).
//!
//! Reads go through the graph on every lookup; nothing is cached across
//! recursion, so a block disappearing mid-traversal degrades to the same
//! sentinel as one that was never there.

use folio_types::{BlockData, BlockId, BlockType, TextId};
use serde_json::Value;

use crate::delta::{RunOp, decode_runs};
use crate::graph::{BlockRecord, SharedGraph};
use crate::node::{BlockNode, EditableNode, TextNode};
use crate::table;
use crate::{CodecError, Result};

/// Decode the whole document from the graph's root page.
///
/// Best-effort, all-or-nothing at the document level: a missing root or
/// any error in the recursive decode yields `None` (logged), never a
/// partially built tree. Callers treat `None` as "no content to display".
pub fn decode_document(graph: &SharedGraph) -> Option<EditableNode> {
    let root = graph.root_page_id()?;
    if graph.get_block(&root).is_none() {
        tracing::warn!(root = %root, "root block record missing, nothing to decode");
        return None;
    }
    match decode_block(graph, &root) {
        Ok(node) => Some(node),
        Err(err) => {
            tracing::warn!(error = %err, "document decode aborted");
            None
        }
    }
}

/// Decode one block and its subtree, depth-first.
///
/// A dangling `id` is not an error: the parent tree stays well-formed via
/// a [`BlockType::NotFound`] sentinel carrying the requested id.
pub fn decode_block(graph: &SharedGraph, id: &BlockId) -> Result<EditableNode> {
    let Some(record) = graph.get_block(id) else {
        tracing::warn!(block = %id, "dangling block reference, emitting sentinel");
        return Ok(EditableNode::not_found(*id));
    };

    let child_ids = graph.children_list(&record.children_id).unwrap_or_default();
    let mut children = Vec::with_capacity(child_ids.len());
    for child_id in child_ids {
        children.push(decode_block(graph, child_id)?);
    }

    let payload = parse_payload(&record.data);
    let data = match &payload {
        Some(value) => BlockData::from_value(&record.ty, value.clone()),
        None => BlockData::default(),
    };

    let mut node = BlockNode {
        block_id: *id,
        relation_id: record.children_id,
        ty: record.ty.clone(),
        data,
        children: Vec::new(),
    };

    node.children = match &node.ty {
        // The persisted list is insertion-ordered; visual order is declared
        // on the cells themselves.
        BlockType::Table => table::sort_cells(children),
        BlockType::TableCell => {
            if children.len() > 1 {
                tracing::warn!(
                    block = %id,
                    dropped = children.len() - 1,
                    "table cell holds more than one subtree, truncating"
                );
            }
            children.truncate(1);
            children
        }
        _ => children,
    };

    // Pages are structural only — no text layer, ever.
    if node.ty == BlockType::Page {
        return Ok(EditableNode::Block(node));
    }

    match resolve_text_layer(graph, record, payload.as_ref())? {
        TextSource::External { text_id, ops } => {
            attach_text_layer(&mut node, text_id, &ops);
        }
        TextSource::Legacy { text_id, ops } => {
            if node.children.is_empty() {
                node.children.push(EditableNode::Text(TextNode::placeholder()));
            }
            attach_text_layer(&mut node, text_id, &ops);
        }
        TextSource::Absent => {
            if node.children.is_empty() {
                node.children.push(EditableNode::Text(TextNode::placeholder()));
            }
        }
    }

    Ok(EditableNode::Block(node))
}

/// Where a block's text layer comes from. Strategies are tried in order;
/// the first hit wins.
#[derive(Debug, PartialEq)]
enum TextSource {
    /// Live run sequence bound via the record's external text id.
    External { text_id: TextId, ops: Vec<RunOp> },
    /// Delta embedded in the structural payload by clients that predate the
    /// external text layer. The block's own id doubles as the text id.
    Legacy { text_id: TextId, ops: Vec<RunOp> },
    /// No text layer: a purely structural block.
    Absent,
}

fn resolve_text_layer(
    graph: &SharedGraph,
    record: &BlockRecord,
    payload: Option<&Value>,
) -> Result<TextSource> {
    if let Some(text_id) = record.external_id
        && let Some(ops) = graph.text_runs(&text_id)
    {
        return Ok(TextSource::External {
            text_id,
            ops: ops.to_vec(),
        });
    }

    if let Some(delta) = payload.and_then(|value| value.get("delta")) {
        let text_id = TextId::from(record.id);
        let ops: Vec<RunOp> = serde_json::from_value(delta.clone())
            .map_err(|source| CodecError::MalformedRuns { text_id, source })?;
        return Ok(TextSource::Legacy { text_id, ops });
    }

    Ok(TextSource::Absent)
}

fn attach_text_layer(node: &mut BlockNode, text_id: TextId, ops: &[RunOp]) {
    let runs = decode_runs(ops);
    node.children
        .insert(0, EditableNode::Text(TextNode::new(text_id, runs)));
}

fn parse_payload(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str(raw).ok()
}

// ============================================================================
// Tests
// ============================================================================
