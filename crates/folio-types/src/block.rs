//! Block type tags and per-type payload schemas.
//!
//! The persisted graph stores each block's structural payload as an opaque
//! JSON string. This module gives that payload a typed shape: `BlockType`
//! names what a block *is*, and `BlockData` is a tagged union keyed by it.
//!
//! Unrecognized tags and unparseable payloads are never errors — they land
//! in `BlockType::Unknown` / `BlockData::Opaque` and survive a decode/encode
//! pass byte-for-byte, so a reader built against an older vocabulary can
//! still carry newer documents.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::EnumString;

/// Block type tag, as persisted in the graph.
///
/// Wire strings are snake_case (`"todo_list"`, `"math_equation"`), with two
/// irregulars: table cells use the path-style `"table/cell"`, and the decoder
/// sentinel is `"block_not_found"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum BlockType {
    /// Document root. Structural only — a page carries no text layer.
    Page,
    Paragraph,
    Heading,
    TodoList,
    BulletedList,
    NumberedList,
    ToggleList,
    Quote,
    Callout,
    Code,
    /// Structural divider. No children, no text layer.
    Divider,
    Image,
    MathEquation,
    Table,
    #[strum(serialize = "table/cell")]
    TableCell,
    /// Decoder sentinel for a dangling block reference.
    #[strum(serialize = "block_not_found")]
    NotFound,
    /// Forward-compat catch-all. Preserves the raw tag.
    #[strum(default)]
    Unknown(String),
}

impl BlockType {
    /// The persisted tag string.
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Page => "page",
            BlockType::Paragraph => "paragraph",
            BlockType::Heading => "heading",
            BlockType::TodoList => "todo_list",
            BlockType::BulletedList => "bulleted_list",
            BlockType::NumberedList => "numbered_list",
            BlockType::ToggleList => "toggle_list",
            BlockType::Quote => "quote",
            BlockType::Callout => "callout",
            BlockType::Code => "code",
            BlockType::Divider => "divider",
            BlockType::Image => "image",
            BlockType::MathEquation => "math_equation",
            BlockType::Table => "table",
            BlockType::TableCell => "table/cell",
            BlockType::NotFound => "block_not_found",
            BlockType::Unknown(tag) => tag,
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BlockType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        // The `default` variant makes parsing total.
        Ok(Self::from_str(&tag).unwrap_or(BlockType::Unknown(tag)))
    }
}

// ── Per-type payload schemas ────────────────────────────────────────────────

/// `heading` payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingData {
    pub level: u8,
}

/// `todo_list` payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoListData {
    pub checked: bool,
}

/// `toggle_list` payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleListData {
    pub collapsed: bool,
}

/// `numbered_list` payload. `number` overrides the rendered ordinal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberedListData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

/// `code` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeData {
    pub language: String,
}

/// `callout` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalloutData {
    pub icon: String,
}

/// `table` payload — declared grid dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableData {
    pub rows_len: u32,
    pub cols_len: u32,
}

/// `table/cell` payload — the cell's declared grid position.
///
/// Sibling order in the persisted children list is insertion order, not
/// visual order; these indices are what the decoder canonicalizes by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableCellData {
    pub row_position: u32,
    pub col_position: u32,
}

/// Structural payload of a block, keyed by its [`BlockType`].
///
/// Serializes untagged — the variant's fields *are* the payload object, the
/// type tag lives on the block record. Parsing goes through
/// [`BlockData::parse`] (total, best-effort) rather than `Deserialize`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockData {
    Heading(HeadingData),
    TodoList(TodoListData),
    ToggleList(ToggleListData),
    NumberedList(NumberedListData),
    Code(CodeData),
    Callout(CalloutData),
    Table(TableData),
    TableCell(TableCellData),
    /// Payload of a type with no dedicated schema, an unrecognized type, or
    /// a typed payload that failed to parse. Key order preserved.
    Opaque(IndexMap<String, Value>),
}

impl Default for BlockData {
    fn default() -> Self {
        BlockData::Opaque(IndexMap::new())
    }
}

impl BlockData {
    /// Best-effort parse of a persisted payload string. Never fails: an
    /// empty or unparseable payload yields the empty `Opaque` map.
    pub fn parse(ty: &BlockType, raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(ty, value),
            Err(_) => Self::default(),
        }
    }

    /// Typed view of an already-parsed payload value. A value that doesn't
    /// match the type's schema degrades to `Opaque` rather than erroring.
    pub fn from_value(ty: &BlockType, value: Value) -> Self {
        fn typed<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
            serde_json::from_value(value.clone()).ok()
        }

        let parsed = match ty {
            BlockType::Heading => typed(&value).map(BlockData::Heading),
            BlockType::TodoList => typed(&value).map(BlockData::TodoList),
            BlockType::ToggleList => typed(&value).map(BlockData::ToggleList),
            BlockType::NumberedList => typed(&value).map(BlockData::NumberedList),
            BlockType::Code => typed(&value).map(BlockData::Code),
            BlockType::Callout => typed(&value).map(BlockData::Callout),
            BlockType::Table => typed(&value).map(BlockData::Table),
            BlockType::TableCell => typed(&value).map(BlockData::TableCell),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::opaque(value))
    }

    /// Serialize back to the persisted payload string. Exact inverse of
    /// [`BlockData::parse`] for payloads that parsed to a typed variant.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn opaque(value: Value) -> Self {
        match serde_json::from_value::<IndexMap<String, Value>>(value) {
            Ok(map) => BlockData::Opaque(map),
            Err(_) => Self::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
