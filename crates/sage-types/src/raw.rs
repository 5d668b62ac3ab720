use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A loosely-typed cell value as handed over by the tabular parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
    /// Booleans, arrays and objects. Never numeric or textual.
    Other(serde_json::Value),
}

impl RawValue {
    /// Numeric view of the cell. Non-numeric, empty and non-finite values yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(text) => text.trim().parse::<f64>().ok()?,
            RawValue::Null | RawValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Trimmed text view of the cell. Blank text and nulls yield `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            RawValue::Null | RawValue::Other(_) => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<u64> for RawValue {
    fn from(value: u64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// One parsed row keyed by header name. Header names are trimmed on insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, RawValue>", into = "BTreeMap<String, RawValue>")]
pub struct RawRow {
    cells: BTreeMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<RawValue>) {
        self.cells
            .insert(key.as_ref().trim().to_string(), value.into());
    }

    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.cells.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<BTreeMap<String, RawValue>> for RawRow {
    fn from(cells: BTreeMap<String, RawValue>) -> Self {
        let mut row = RawRow::new();
        for (key, value) in cells {
            row.insert(key, value);
        }
        row
    }
}

impl From<RawRow> for BTreeMap<String, RawValue> {
    fn from(row: RawRow) -> Self {
        row.cells
    }
}
