//! Table child canonicalization.
//!
//! A table block's persisted children list preserves insertion order, which
//! stops matching visual order as soon as cells are moved or rows/columns
//! inserted. The decoder reorders cells row-major by their declared grid
//! position before handing the tree to the editor.

use folio_types::BlockData;

use crate::node::EditableNode;

/// Sort table-cell children into row-major order. Stable: nodes without a
/// cell payload keep their relative order at the front.
pub(crate) fn sort_cells(mut cells: Vec<EditableNode>) -> Vec<EditableNode> {
    cells.sort_by_key(cell_position);
    cells
}

fn cell_position(node: &EditableNode) -> (u32, u32) {
    match node {
        EditableNode::Block(block) => match &block.data {
            BlockData::TableCell(cell) => (cell.row_position, cell.col_position),
            _ => (0, 0),
        },
        EditableNode::Text(_) => (0, 0),
    }
}

// ============================================================================
// Tests
// ============================================================================
