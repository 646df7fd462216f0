//! Shared identity and block vocabulary for Folio documents.
//!
//! A Folio document is a tree of typed blocks persisted in a replicated
//! block graph. This crate defines the vocabulary both sides of the codec
//! speak: typed ids for blocks, children lists, and text layers, the
//! `BlockType` tag enum, and the per-type `BlockData` payload union.
//!
//! The payload union deliberately replaces the untyped JSON the graph
//! persists: each recognized block type gets a documented schema, and
//! everything else (including tags introduced by newer clients) flows
//! through the `Opaque` variant untouched, so older readers never reject
//! a document they merely don't understand.

mod block;
mod ids;

pub use block::{
    BlockData, BlockType, CalloutData, CodeData, HeadingData, NumberedListData, TableCellData,
    TableData, TodoListData, ToggleListData,
};
pub use ids::{BlockId, ChildrenId, TextId};
