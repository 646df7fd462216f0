//! Error types for codec operations.

use folio_types::{BlockId, TextId};
use thiserror::Error;

/// Errors that can occur while decoding or encoding a document tree.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Referenced block has no record in the graph.
    ///
    /// Only the encoder surfaces this (a missing attach parent). The decoder
    /// tolerates dangling references with a sentinel node instead.
    #[error("block not found: {0:?}")]
    BlockNotFound(BlockId),

    /// A persisted run sequence failed to parse.
    ///
    /// Fatal to the enclosing block decode: the whole document decode aborts
    /// rather than returning a tree with a silently dropped text layer.
    #[error("malformed text runs for {text_id:?}: {source}")]
    MalformedRuns {
        text_id: TextId,
        #[source]
        source: serde_json::Error,
    },
}
