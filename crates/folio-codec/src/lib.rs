//! Document tree codec for Folio.
//!
//! Bridges the two representations of a collaborative document:
//!
//! - the **shared block graph** — flat, id-addressed, CRDT-backed maps of
//!   block records, ordered children lists, and rich-text run sequences.
//!   Converged but messy: references dangle, payloads go stale, text layers
//!   live in two generations of encoding.
//! - the **editable tree** — the ephemeral, owned tree an editor component
//!   renders and mutates, with each block's text materialized as a leaf
//!   container of flat-attribute runs.
//!
//! # Design Philosophy
//!
//! The graph is the only system of record. Trees are rebuilt from it on
//! every decode and discarded after every encode; neither direction caches
//! or aliases across calls, so a concurrently syncing graph can never leave
//! a stale tree behind.
//!
//! Decoding is tolerant where replicated data is legitimately ragged
//! (dangling ids, missing lists, stale payloads) and strict where silence
//! would lose content (an unreadable run sequence aborts the document
//! decode instead of dropping text on the floor).
//!
//! Both directions are synchronous single-threaded tree walks. All
//! suspension, locking, and conflict resolution belongs to the replication
//! substrate; calls here are bounded only by tree depth and fan-out.

mod decode;
mod delta;
mod encode;
mod error;
mod graph;
mod node;
mod table;

pub use decode::{decode_block, decode_document};
pub use delta::{RunOp, TextRun, decode_run, decode_runs, encode_run};
pub use encode::encode_subtree;
pub use error::CodecError;
pub use graph::{BlockRecord, SharedGraph};
pub use node::{BlockNode, EditableNode, TextNode};

// Vocabulary re-exports, so codec callers need only this crate.
pub use folio_types::{BlockData, BlockId, BlockType, ChildrenId, TextId};

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{HeadingData, TableCellData};

    /// Structural equality modulo ids: encoding allocates fresh block and
    /// text ids, so round-trips compare types, payloads, runs, and shape.
    fn assert_same_shape(a: &EditableNode, b: &EditableNode) {
        match (a, b) {
            (EditableNode::Block(x), EditableNode::Block(y)) => {
                assert_eq!(x.ty, y.ty);
                assert_eq!(x.data, y.data);
                assert_eq!(x.children.len(), y.children.len(), "fan-out differs on {:?}", x.ty);
                for (ca, cb) in x.children.iter().zip(&y.children) {
                    assert_same_shape(ca, cb);
                }
            }
            (EditableNode::Text(x), EditableNode::Text(y)) => {
                assert_eq!(x.runs, y.runs);
            }
            _ => panic!("node kinds differ"),
        }
    }

    fn graph_with_page() -> (SharedGraph, BlockId) {
        let mut graph = SharedGraph::new();
        let page = graph.create_block(BlockType::Page, &BlockData::default());
        graph.set_root(page.id);
        (graph, page.id)
    }

    fn cell(row: u32, col: u32, text: &str) -> EditableNode {
        BlockNode::new(
            BlockType::TableCell,
            BlockData::TableCell(TableCellData {
                row_position: row,
                col_position: col,
            }),
        )
        .with_child(
            BlockNode::new(BlockType::Paragraph, BlockData::default())
                .with_text(vec![TextRun::plain(text)]),
        )
        .into()
    }

    #[test]
    fn test_roundtrip_mixed_fragment() {
        let fragment: Vec<EditableNode> = vec![
            BlockNode::new(BlockType::Heading, BlockData::Heading(HeadingData { level: 1 }))
                .with_text(vec![TextRun::plain("Title")])
                .into(),
            BlockNode::new(BlockType::Quote, BlockData::default())
                .with_child(
                    BlockNode::new(BlockType::Paragraph, BlockData::default())
                        .with_text(vec![
                            TextRun::plain("nested "),
                            TextRun::plain("bold").attr("bold", true),
                        ]),
                )
                .with_text(vec![TextRun::plain("quoted")])
                .into(),
            BlockNode::new(BlockType::Divider, BlockData::default())
                .with_child(TextNode::placeholder())
                .into(),
        ];

        let (mut graph, page) = graph_with_page();
        let ids = encode_subtree(&mut graph, &page, 0, &fragment).unwrap();
        assert_eq!(ids.len(), 3);

        let doc = decode_document(&graph).unwrap();
        let decoded = &doc.as_block().unwrap().children;
        assert_eq!(decoded.len(), fragment.len());
        for (original, roundtripped) in fragment.iter().zip(decoded.iter()) {
            assert_same_shape(original, roundtripped);
        }
    }

    #[test]
    fn test_roundtrip_canonicalizes_table_order() {
        // Cells encoded in scrambled insertion order come back row-major.
        let table: EditableNode = BlockNode::new(
            BlockType::Table,
            BlockData::Table(folio_types::TableData {
                rows_len: 2,
                cols_len: 2,
            }),
        )
        .with_child(cell(1, 1, "d"))
        .with_child(cell(0, 1, "b"))
        .with_child(cell(1, 0, "c"))
        .with_child(cell(0, 0, "a"))
        .into();

        let (mut graph, page) = graph_with_page();
        encode_subtree(&mut graph, &page, 0, std::slice::from_ref(&table)).unwrap();

        let doc = decode_document(&graph).unwrap();
        let decoded_table = doc.as_block().unwrap().children[0].as_block().unwrap();
        let texts: Vec<String> = decoded_table
            .children
            .iter()
            .map(EditableNode::plain_text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_roundtrip_preserves_unknown_vocabulary() {
        // A block type this build doesn't know still survives a full pass.
        let ty: BlockType = "simple_table".parse().unwrap();
        let data = BlockData::parse(&ty, r#"{"columnWidths":[120,80]}"#);
        let node: EditableNode = BlockNode::new(ty.clone(), data.clone()).into();

        let (mut graph, page) = graph_with_page();
        encode_subtree(&mut graph, &page, 0, std::slice::from_ref(&node)).unwrap();

        let doc = decode_document(&graph).unwrap();
        let decoded = doc.as_block().unwrap().children[0].as_block().unwrap();
        assert_eq!(decoded.ty, ty);
        assert_eq!(decoded.data, data);
    }

    #[test]
    fn test_plain_text_of_decoded_document() {
        let fragment: Vec<EditableNode> = vec![
            BlockNode::new(BlockType::Heading, BlockData::Heading(HeadingData { level: 2 }))
                .with_text(vec![TextRun::plain("Notes")])
                .into(),
            BlockNode::new(BlockType::Paragraph, BlockData::default())
                .with_text(vec![TextRun::plain("first "), TextRun::plain("line")])
                .into(),
        ];

        let (mut graph, page) = graph_with_page();
        encode_subtree(&mut graph, &page, 0, &fragment).unwrap();

        let doc = decode_document(&graph).unwrap();
        assert_eq!(doc.plain_text(), "Notes\nfirst line");
    }
}
