//! The read-only query capability over the committed ledger.

mod error;
mod ext;
mod in_memory;

use std::rc::Rc;

use ride_types::{
    Address, AssetId, AssetInfo, BlockInfo, DataValue, Digest, FullAssetInfo, FullWavesBalance,
    OptionalAsset, PublicKey, Recipient, RideObject,
};

pub use self::{error::Error, ext::LedgerReaderExt, in_memory::InMemoryLedger};

/// A trait expressing the reading of committed ledger state. Implementations must be free of side
/// effects; the execution layer never writes through this interface.
pub trait LedgerReader {
    /// Balance of `account` in `asset`.
    fn account_balance(&self, account: &Recipient, asset: &OptionalAsset) -> Result<i64, Error>;

    /// Every native-token balance figure of `account`.
    fn full_waves_balance(&self, account: &Recipient) -> Result<FullWavesBalance, Error>;

    /// The value stored under `key` in the data storage of `account`.
    fn data_entry(&self, account: &Recipient, key: &str) -> Result<Option<DataValue>, Error>;

    /// Summary of an asset.
    fn asset_info(&self, asset_id: &AssetId) -> Result<AssetInfo, Error>;

    /// Complete description of an asset.
    fn full_asset_info(&self, asset_id: &AssetId) -> Result<FullAssetInfo, Error>;

    /// Whether fees may be paid in the asset.
    fn is_asset_sponsored(&self, asset_id: &AssetId) -> Result<bool, Error>;

    /// Resolves an alias to its address; plain addresses are returned as is.
    fn resolve_recipient(&self, recipient: &Recipient) -> Result<Address, Error>;

    /// Script attached to `account`.
    fn script_bytes(&self, account: &Recipient) -> Result<Vec<u8>, Error>;

    /// Public key of the account that owns the script at `address`.
    fn script_public_key(&self, address: &Address) -> Result<PublicKey, Error>;

    /// A committed transaction, as scripts see it.
    fn transaction_by_id(&self, id: &Digest) -> Result<RideObject, Error>;

    /// Height at which a transaction was committed.
    fn transaction_height(&self, id: &Digest) -> Result<u64, Error>;

    /// Header of the block at `height`.
    fn block_header(&self, height: u64) -> Result<BlockInfo, Error>;

    /// VRF of the block at `height`, absent for blocks predating VRF.
    fn block_vrf(&self, height: u64) -> Result<Option<Vec<u8>>, Error>;

    /// Height of the block currently being built.
    fn building_height(&self) -> Result<u64, Error>;

    /// Version of the script complexity estimator in effect.
    fn estimator_version(&self) -> Result<u8, Error>;

    /// Classifies `error` as a lookup miss.
    fn is_not_found(&self, error: &Error) -> bool {
        error.is_not_found()
    }
}

macro_rules! forward_ledger_reader {
    () => {
        fn account_balance(
            &self,
            account: &Recipient,
            asset: &OptionalAsset,
        ) -> Result<i64, Error> {
            (**self).account_balance(account, asset)
        }

        fn full_waves_balance(&self, account: &Recipient) -> Result<FullWavesBalance, Error> {
            (**self).full_waves_balance(account)
        }

        fn data_entry(&self, account: &Recipient, key: &str) -> Result<Option<DataValue>, Error> {
            (**self).data_entry(account, key)
        }

        fn asset_info(&self, asset_id: &AssetId) -> Result<AssetInfo, Error> {
            (**self).asset_info(asset_id)
        }

        fn full_asset_info(&self, asset_id: &AssetId) -> Result<FullAssetInfo, Error> {
            (**self).full_asset_info(asset_id)
        }

        fn is_asset_sponsored(&self, asset_id: &AssetId) -> Result<bool, Error> {
            (**self).is_asset_sponsored(asset_id)
        }

        fn resolve_recipient(&self, recipient: &Recipient) -> Result<Address, Error> {
            (**self).resolve_recipient(recipient)
        }

        fn script_bytes(&self, account: &Recipient) -> Result<Vec<u8>, Error> {
            (**self).script_bytes(account)
        }

        fn script_public_key(&self, address: &Address) -> Result<PublicKey, Error> {
            (**self).script_public_key(address)
        }

        fn transaction_by_id(&self, id: &Digest) -> Result<RideObject, Error> {
            (**self).transaction_by_id(id)
        }

        fn transaction_height(&self, id: &Digest) -> Result<u64, Error> {
            (**self).transaction_height(id)
        }

        fn block_header(&self, height: u64) -> Result<BlockInfo, Error> {
            (**self).block_header(height)
        }

        fn block_vrf(&self, height: u64) -> Result<Option<Vec<u8>>, Error> {
            (**self).block_vrf(height)
        }

        fn building_height(&self) -> Result<u64, Error> {
            (**self).building_height()
        }

        fn estimator_version(&self) -> Result<u8, Error> {
            (**self).estimator_version()
        }

        fn is_not_found(&self, error: &Error) -> bool {
            (**self).is_not_found(error)
        }
    };
}

impl<T: LedgerReader + ?Sized> LedgerReader for &T {
    forward_ledger_reader!();
}

impl<T: LedgerReader + ?Sized> LedgerReader for Rc<T> {
    forward_ledger_reader!();
}
