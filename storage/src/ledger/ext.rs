use ride_types::{DataValue, Recipient};

use super::{Error, LedgerReader};

/// Typed data storage lookups. An entry of a different type reads as absent.
pub trait LedgerReaderExt {
    /// Integer stored under `key`.
    fn integer_entry(&self, account: &Recipient, key: &str) -> Result<Option<i64>, Error>;

    /// Boolean stored under `key`.
    fn boolean_entry(&self, account: &Recipient, key: &str) -> Result<Option<bool>, Error>;

    /// String stored under `key`.
    fn string_entry(&self, account: &Recipient, key: &str) -> Result<Option<String>, Error>;

    /// Bytes stored under `key`.
    fn binary_entry(&self, account: &Recipient, key: &str) -> Result<Option<Vec<u8>>, Error>;
}

impl<T: LedgerReader + ?Sized> LedgerReaderExt for T {
    fn integer_entry(&self, account: &Recipient, key: &str) -> Result<Option<i64>, Error> {
        match self.data_entry(account, key)? {
            Some(DataValue::Integer(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    fn boolean_entry(&self, account: &Recipient, key: &str) -> Result<Option<bool>, Error> {
        match self.data_entry(account, key)? {
            Some(DataValue::Boolean(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    fn string_entry(&self, account: &Recipient, key: &str) -> Result<Option<String>, Error> {
        match self.data_entry(account, key)? {
            Some(DataValue::String(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    fn binary_entry(&self, account: &Recipient, key: &str) -> Result<Option<Vec<u8>>, Error> {
        match self.data_entry(account, key)? {
            Some(DataValue::Binary(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }
}
