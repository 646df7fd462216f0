//! Rich-text run conversion.
//!
//! The graph persists a block's text as an ordered delta: insertions with
//! optional formatting attributes (`RunOp`). The editable tree wants the
//! same content as leaf runs with attributes hoisted flat (`TextRun`).
//! Conversion is total in both directions; the only normalization is that
//! falsy attribute values (`null`, `false`, `0`, `""`) are dropped on
//! decode — collaborating clients persist `{"bold": false}` and
//! `{"bold": null}` interchangeably for "not bold".

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One persisted rich-text operation: an insertion with optional attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOp {
    pub insert: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<IndexMap<String, Value>>,
}

impl RunOp {
    /// An unformatted insertion.
    pub fn plain(insert: impl Into<String>) -> Self {
        Self {
            insert: insert.into(),
            attributes: None,
        }
    }
}

/// One leaf run of the editable tree. Attributes are flat sibling fields
/// and never hold falsy values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub attributes: IndexMap<String, Value>,
}

impl TextRun {
    /// An unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Add a formatting attribute (builder-style, for authored content).
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Convert a persisted run op into an editable leaf run, dropping falsy
/// attributes. Never fails.
pub fn decode_run(op: &RunOp) -> TextRun {
    let mut attributes = IndexMap::new();
    if let Some(attrs) = &op.attributes {
        for (key, value) in attrs {
            if !is_falsy(value) {
                attributes.insert(key.clone(), value.clone());
            }
        }
    }
    TextRun {
        text: op.insert.clone(),
        attributes,
    }
}

/// Convert an editable leaf run back into a persisted run op. Attributes
/// are absent (not an empty map) when the run carries none. Never fails.
pub fn encode_run(run: &TextRun) -> RunOp {
    RunOp {
        insert: run.text.clone(),
        attributes: (!run.attributes.is_empty()).then(|| run.attributes.clone()),
    }
}

/// Decode an ordered run sequence. An empty sequence yields a single empty
/// run: a text container never has zero runs.
pub fn decode_runs(ops: &[RunOp]) -> Vec<TextRun> {
    let mut runs: Vec<TextRun> = ops.iter().map(decode_run).collect();
    if runs.is_empty() {
        runs.push(TextRun::default());
    }
    runs
}

/// JSON falsiness: `null`, `false`, numeric zero, empty string.
/// Arrays and objects are always truthy, even when empty.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

// ============================================================================
// Tests
// ============================================================================
