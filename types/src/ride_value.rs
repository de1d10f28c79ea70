//! The attribute-bag representation in which scripts see transactions, blocks and invocations.

use std::collections::BTreeMap;

use crate::{Address, Alias, AssetId, DataValue, Digest, OptionalAsset, PublicKey, Recipient};

/// A value readable by a script.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RideValue {
    /// The unit value, used for absent optionals.
    Unit,
    /// Integer.
    Int(i64),
    /// Boolean.
    Boolean(bool),
    /// String.
    String(String),
    /// Byte vector.
    Bytes(Vec<u8>),
    /// Address.
    Address(Address),
    /// Alias.
    Alias(Alias),
    /// Nested object.
    Object(RideObject),
    /// List of values.
    List(Vec<RideValue>),
}

impl From<i64> for RideValue {
    fn from(value: i64) -> Self {
        RideValue::Int(value)
    }
}

/// Heights and timestamps above `i64::MAX` saturate.
impl From<u64> for RideValue {
    fn from(value: u64) -> Self {
        RideValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for RideValue {
    fn from(value: bool) -> Self {
        RideValue::Boolean(value)
    }
}

impl From<String> for RideValue {
    fn from(value: String) -> Self {
        RideValue::String(value)
    }
}

impl From<&str> for RideValue {
    fn from(value: &str) -> Self {
        RideValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for RideValue {
    fn from(value: Vec<u8>) -> Self {
        RideValue::Bytes(value)
    }
}

impl From<Digest> for RideValue {
    fn from(value: Digest) -> Self {
        RideValue::Bytes(value.as_ref().to_vec())
    }
}

impl From<PublicKey> for RideValue {
    fn from(value: PublicKey) -> Self {
        RideValue::Bytes(value.as_ref().to_vec())
    }
}

impl From<AssetId> for RideValue {
    fn from(value: AssetId) -> Self {
        RideValue::Bytes(value.as_ref().to_vec())
    }
}

impl From<OptionalAsset> for RideValue {
    fn from(value: OptionalAsset) -> Self {
        match value {
            OptionalAsset::Waves => RideValue::Unit,
            OptionalAsset::Asset(asset_id) => asset_id.into(),
        }
    }
}

impl From<Address> for RideValue {
    fn from(value: Address) -> Self {
        RideValue::Address(value)
    }
}

impl From<Recipient> for RideValue {
    fn from(value: Recipient) -> Self {
        match value {
            Recipient::Address(address) => RideValue::Address(address),
            Recipient::Alias(alias) => RideValue::Alias(alias),
        }
    }
}

impl From<DataValue> for RideValue {
    fn from(value: DataValue) -> Self {
        match value {
            DataValue::Integer(value) => RideValue::Int(value),
            DataValue::Boolean(value) => RideValue::Boolean(value),
            DataValue::String(value) => RideValue::String(value),
            DataValue::Binary(value) => RideValue::Bytes(value),
        }
    }
}

impl<T: Into<RideValue>> From<Option<T>> for RideValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RideValue::Unit, Into::into)
    }
}

impl From<RideObject> for RideValue {
    fn from(value: RideObject) -> Self {
        RideValue::Object(value)
    }
}

/// A named record of fields, e.g. `TransferTransaction` or `Invocation`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RideObject {
    type_name: String,
    fields: BTreeMap<String, RideValue>,
}

impl RideObject {
    /// Creates an empty object of the given instance type.
    pub fn new<T: Into<String>>(type_name: T) -> Self {
        RideObject {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field, replacing any previous value under the same name.
    #[must_use]
    pub fn with<K: Into<String>, V: Into<RideValue>>(mut self, name: K, value: V) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the instance type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns a field by name.
    pub fn get(&self, name: &str) -> Option<&RideValue> {
        self.fields.get(name)
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<RideValue> {
        self.fields.remove(name)
    }

    /// Iterates the fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &RideValue)> {
        self.fields.iter()
    }
}
