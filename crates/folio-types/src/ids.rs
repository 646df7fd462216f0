//! Typed identifiers for blocks, children lists, and text layers.
//!
//! All ID types wrap UUIDv4 (random, allocated per block with no
//! coordination). They're opaque in the persisted graph and display as
//! standard UUID text for logging. The `short()` form (first 8 hex chars)
//! is for human-facing diagnostics — never used as a lookup key.
//!
//! A block's children list and legacy text layer are addressed by ids
//! derived from the block's own id, hence the cross-type `From<BlockId>`
//! conversions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block identifier (UUIDv4).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(uuid::Uuid);

/// Identifier of an ordered children list owned by one block (UUIDv4).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildrenId(uuid::Uuid);

/// Identifier of a rich-text run sequence (UUIDv4).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Allocate a fresh random ID (UUIDv4).
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// First 8 hex characters — for human display only, not lookup.
            pub fn short(&self) -> String {
                self.0.as_simple().to_string()[..8].to_string()
            }

            /// Full 32-character hex string (no hyphens).
            pub fn to_hex(&self) -> String {
                self.0.as_simple().to_string()
            }

            /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $T {
            fn from(u: uuid::Uuid) -> Self {
                Self(u)
            }
        }

        impl From<$T> for uuid::Uuid {
            fn from(id: $T) -> uuid::Uuid {
                id.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Full UUID with hyphens for log readability
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(BlockId, "BlockId");
impl_typed_id!(ChildrenId, "ChildrenId");
impl_typed_id!(TextId, "TextId");

// ── Derived ids ─────────────────────────────────────────────────────────────

/// A block's children list is addressed by the block's own id.
impl From<BlockId> for ChildrenId {
    fn from(id: BlockId) -> Self {
        Self(id.0)
    }
}

/// Legacy text layers (and decoder placeholders) reuse the block's id.
impl From<BlockId> for TextId {
    fn from(id: BlockId) -> Self {
        Self(id.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
