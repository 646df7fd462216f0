//! Block encoder — writes an editable (sub)tree into the shared graph.
//!
//! One call per authored fragment (paste, import). Each block node becomes
//! a fresh record wired under its parent at a positional index; a leading
//! text container becomes the new block's text layer. Mutations are eager
//! and non-transactional at this layer — callers wanting an atomic paste
//! wrap the call in the substrate's transaction facility.

use folio_types::BlockId;

use crate::delta::encode_run;
use crate::graph::SharedGraph;
use crate::node::{BlockNode, EditableNode};
use crate::{CodecError, Result};

/// Encode `nodes` as new blocks under `parent_id`, starting at
/// `insert_index` in the parent's children list (existing entries shift
/// right). Returns the new top-level block ids in input order — callers
/// use them to select the inserted range.
pub fn encode_subtree(
    graph: &mut SharedGraph,
    parent_id: &BlockId,
    insert_index: usize,
    nodes: &[EditableNode],
) -> Result<Vec<BlockId>> {
    let mut created = Vec::with_capacity(nodes.len());
    let mut slot = 0;
    for node in nodes {
        let EditableNode::Block(block) = node else {
            tracing::warn!(parent = %parent_id, "skipping loose text node, it has no block form");
            continue;
        };
        created.push(encode_block(graph, block, parent_id, insert_index + slot)?);
        slot += 1;
    }
    Ok(created)
}

fn encode_block(
    graph: &mut SharedGraph,
    node: &BlockNode,
    parent_id: &BlockId,
    index: usize,
) -> Result<BlockId> {
    if graph.get_block(parent_id).is_none() {
        return Err(CodecError::BlockNotFound(*parent_id));
    }

    let record = graph.create_block(node.ty.clone(), &node.data);
    let id = record.id;

    // A leading text container is this block's text layer; everything after
    // it is structural. Decoder placeholders (no bound id) are not a text
    // layer and fall through to the structural walk, which skips them.
    let (text, structural) = match node.children.split_first() {
        Some((EditableNode::Text(text), rest)) if text.text_id.is_some() => (Some(text), rest),
        _ => (None, node.children.as_slice()),
    };

    if let Some(text) = text {
        let text_id = graph.bind_text_layer(&id)?;
        let ops = text.runs.iter().map(encode_run).collect();
        graph.apply_run_ops(&text_id, ops);
    }

    graph.set_parent(&id, parent_id, index)?;

    let mut slot = 0;
    for child in structural {
        match child {
            EditableNode::Block(block) => {
                encode_block(graph, block, &id, slot)?;
                slot += 1;
            }
            EditableNode::Text(_) => {
                // Placeholders and stray leaves have nothing to persist.
            }
        }
    }

    Ok(id)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::{RunOp, TextRun};
    use crate::node::TextNode;
    use folio_types::{BlockData, BlockType, HeadingData};
    use indexmap::IndexMap;
    use serde_json::json;

    fn graph_with_page() -> (SharedGraph, BlockId) {
        let mut graph = SharedGraph::new();
        let page = graph.create_block(BlockType::Page, &BlockData::default());
        graph.set_root(page.id);
        (graph, page.id)
    }

    fn paragraph(runs: Vec<TextRun>) -> BlockNode {
        BlockNode::new(BlockType::Paragraph, BlockData::default()).with_text(runs)
    }

    fn page_children(graph: &SharedGraph, page: &BlockId) -> Vec<BlockId> {
        let relation = graph.get_block(page).unwrap().children_id;
        graph.children_list(&relation).unwrap().to_vec()
    }

    #[test]
    fn test_scenario_encode_paragraph_runs() {
        // Encoding runs [{text:"a"}, {text:"b", italic:true}] produces a
        // bound sequence [{insert:"a"}, {insert:"b", attributes:{italic:true}}].
        let (mut graph, page) = graph_with_page();
        let node = paragraph(vec![
            TextRun::plain("a"),
            TextRun::plain("b").attr("italic", true),
        ]);

        let ids = encode_subtree(&mut graph, &page, 0, &[node.into()]).unwrap();
        assert_eq!(ids.len(), 1);

        let record = graph.get_block(&ids[0]).unwrap();
        assert_eq!(record.ty, BlockType::Paragraph);
        let text_id = record.external_id.unwrap();
        let italic: IndexMap<String, serde_json::Value> =
            [("italic".to_string(), json!(true))].into_iter().collect();
        assert_eq!(
            graph.text_runs(&text_id).unwrap(),
            &[
                RunOp::plain("a"),
                RunOp {
                    insert: "b".into(),
                    attributes: Some(italic),
                },
            ]
        );
    }

    #[test]
    fn test_returns_top_level_ids_in_order() {
        let (mut graph, page) = graph_with_page();
        let nodes = [
            paragraph(vec![TextRun::plain("one")]).into(),
            paragraph(vec![TextRun::plain("two")]).into(),
        ];
        let ids = encode_subtree(&mut graph, &page, 0, &nodes).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(page_children(&graph, &page), ids);
    }

    #[test]
    fn test_insert_shifts_existing_siblings() {
        let (mut graph, page) = graph_with_page();
        let existing = encode_subtree(
            &mut graph,
            &page,
            0,
            &[paragraph(vec![TextRun::plain("old")]).into()],
        )
        .unwrap()[0];

        let inserted = encode_subtree(
            &mut graph,
            &page,
            0,
            &[paragraph(vec![TextRun::plain("new")]).into()],
        )
        .unwrap()[0];

        assert_eq!(page_children(&graph, &page), vec![inserted, existing]);
    }

    #[test]
    fn test_structural_children_recurse() {
        let (mut graph, page) = graph_with_page();
        let node = BlockNode::new(BlockType::Quote, BlockData::default())
            .with_child(paragraph(vec![TextRun::plain("inner")]))
            .with_text(vec![TextRun::plain("outer")]);

        let ids = encode_subtree(&mut graph, &page, 0, &[node.into()]).unwrap();
        let quote = graph.get_block(&ids[0]).unwrap();
        assert_eq!(quote.ty, BlockType::Quote);

        let children = graph.children_list(&quote.children_id).unwrap();
        assert_eq!(children.len(), 1);
        let inner = graph.get_block(&children[0]).unwrap();
        assert_eq!(inner.ty, BlockType::Paragraph);
        let inner_text = inner.external_id.unwrap();
        assert_eq!(graph.text_runs(&inner_text).unwrap(), &[RunOp::plain("inner")]);
    }

    #[test]
    fn test_no_text_layer_without_leading_container() {
        let (mut graph, page) = graph_with_page();
        let node = BlockNode::new(BlockType::Quote, BlockData::default())
            .with_child(paragraph(vec![TextRun::plain("only child")]));

        let ids = encode_subtree(&mut graph, &page, 0, &[node.into()]).unwrap();
        assert_eq!(graph.get_block(&ids[0]).unwrap().external_id, None);
    }

    #[test]
    fn test_placeholder_is_not_a_text_layer() {
        // A decoded divider carries an unbound placeholder leaf; re-encoding
        // must not invent a text layer for it.
        let (mut graph, page) = graph_with_page();
        let node = BlockNode::new(BlockType::Divider, BlockData::default())
            .with_child(TextNode::placeholder());

        let ids = encode_subtree(&mut graph, &page, 0, &[node.into()]).unwrap();
        let record = graph.get_block(&ids[0]).unwrap();
        assert_eq!(record.external_id, None);
        assert_eq!(graph.children_list(&record.children_id), Some(&[][..]));
    }

    #[test]
    fn test_data_payload_persisted() {
        let (mut graph, page) = graph_with_page();
        let node = BlockNode::new(
            BlockType::Heading,
            BlockData::Heading(HeadingData { level: 2 }),
        )
        .with_text(vec![TextRun::plain("title")]);

        let ids = encode_subtree(&mut graph, &page, 0, &[node.into()]).unwrap();
        assert_eq!(graph.get_block(&ids[0]).unwrap().data, r#"{"level":2}"#);
    }

    #[test]
    fn test_missing_parent_errors() {
        let mut graph = SharedGraph::new();
        let missing = BlockId::new();
        let err = encode_subtree(
            &mut graph,
            &missing,
            0,
            &[paragraph(vec![TextRun::plain("x")]).into()],
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::BlockNotFound(id) if id == missing));
    }

    #[test]
    fn test_loose_text_node_is_skipped() {
        let (mut graph, page) = graph_with_page();
        let nodes = [
            EditableNode::Text(TextNode::placeholder()),
            paragraph(vec![TextRun::plain("kept")]).into(),
        ];
        let ids = encode_subtree(&mut graph, &page, 0, &nodes).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(page_children(&graph, &page), ids);
    }
}
