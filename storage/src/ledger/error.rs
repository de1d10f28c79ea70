use thiserror::Error;

use ride_types::{Address, Alias, AssetId, Digest};

/// Possible ledger query errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A generic lookup miss.
    #[error("Not found: {0}")]
    NotFound(String),
    /// An alias is not registered.
    #[error("Alias {0} not found")]
    AliasNotFound(Alias),
    /// No public key is known for an address.
    #[error("Public key of {0} not found")]
    PublicKeyNotFound(Address),
    /// No script is attached to an address.
    #[error("Script of {0} not found")]
    ScriptNotFound(Address),
    /// An asset is not registered.
    #[error("Asset {0} not found")]
    AssetNotFound(AssetId),
    /// A transaction is not known.
    #[error("Transaction {0} not found")]
    TransactionNotFound(Digest),
    /// No block exists at a height.
    #[error("Block at height {0} not found")]
    BlockNotFound(u64),
    /// Merging a quantity diff produced a negative asset quantity.
    #[error("Asset {asset_id} quantity would become negative: {quantity}")]
    NegativeAssetQuantity {
        /// The asset.
        asset_id: AssetId,
        /// The merged quantity.
        quantity: i64,
    },
    /// Merging a diff overflowed.
    #[error("Arithmetic overflow while merging {0}")]
    Overflow(&'static str),
    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Returns `true` for lookup misses, as opposed to store or consistency failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::AliasNotFound(_)
                | Error::PublicKeyNotFound(_)
                | Error::ScriptNotFound(_)
                | Error::AssetNotFound(_)
                | Error::TransactionNotFound(_)
                | Error::BlockNotFound(_)
        )
    }
}
