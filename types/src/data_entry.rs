//! Account data storage entries.

use serde::{Deserialize, Serialize};

/// A typed value stored under a data key.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DataValue {
    /// 64-bit signed integer.
    Integer(i64),
    /// Boolean.
    Boolean(bool),
    /// UTF-8 string.
    String(String),
    /// Arbitrary bytes.
    Binary(Vec<u8>),
}

impl DataValue {
    /// Number of bytes the value contributes to a data payload.
    pub fn payload_size(&self) -> usize {
        match self {
            DataValue::Integer(_) => 8,
            DataValue::Boolean(_) => 1,
            DataValue::String(value) => value.len(),
            DataValue::Binary(value) => value.len(),
        }
    }

    /// Name of the value type as seen by scripts.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Integer(_) => "IntegerEntry",
            DataValue::Boolean(_) => "BooleanEntry",
            DataValue::String(_) => "StringEntry",
            DataValue::Binary(_) => "BinaryEntry",
        }
    }
}

/// A write to an account's data storage. A missing value deletes the key.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DataEntry {
    /// Storage key.
    pub key: String,
    /// New value, or `None` to delete the key.
    pub value: Option<DataValue>,
}

impl DataEntry {
    /// A write of `value` under `key`.
    pub fn new<K: Into<String>>(key: K, value: DataValue) -> Self {
        DataEntry {
            key: key.into(),
            value: Some(value),
        }
    }

    /// A deletion of `key`.
    pub fn delete<K: Into<String>>(key: K) -> Self {
        DataEntry {
            key: key.into(),
            value: None,
        }
    }

    /// Number of bytes the entry contributes to the data payload limit.
    pub fn payload_size(&self) -> usize {
        self.key.len() + self.value.as_ref().map_or(0, DataValue::payload_size)
    }
}
