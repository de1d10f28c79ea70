//! The ledger as seen by a running script: either the committed store alone, or the store behind
//! the invocation chain's overlay.

use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use ride_types::{
    Address, AssetId, AssetInfo, BlockInfo, DataValue, Digest, FullAssetInfo, FullWavesBalance,
    OptionalAsset, PublicKey, Recipient, RideObject,
};

use crate::{
    diff_ledger::DiffLedger,
    ledger::{Error, LedgerReader},
};

/// A ledger capability that starts read-only and is upgraded to an overlay on first mutation.
///
/// Clones share the same overlay instance, so every frame of an invocation chain observes the
/// effects of the frames before it.
pub enum LedgerHandle<R> {
    /// Only the committed ledger; nothing has been written yet.
    ReadOnly(R),
    /// The committed ledger behind an overlay.
    Overlay(Rc<RefCell<DiffLedger<R>>>),
}

impl<R: Clone> Clone for LedgerHandle<R> {
    fn clone(&self) -> Self {
        match self {
            LedgerHandle::ReadOnly(reader) => LedgerHandle::ReadOnly(reader.clone()),
            LedgerHandle::Overlay(overlay) => LedgerHandle::Overlay(Rc::clone(overlay)),
        }
    }
}

impl<R: LedgerReader + Clone> LedgerHandle<R> {
    /// Creates a read-only handle.
    pub fn new(reader: R) -> Self {
        LedgerHandle::ReadOnly(reader)
    }

    /// Returns `true` once the overlay exists.
    pub fn is_overlay(&self) -> bool {
        matches!(self, LedgerHandle::Overlay(_))
    }

    /// Returns the overlay, creating it on first use.
    pub fn overlay(&mut self, generating_balance_depth: usize) -> Rc<RefCell<DiffLedger<R>>> {
        match self {
            LedgerHandle::Overlay(overlay) => Rc::clone(overlay),
            LedgerHandle::ReadOnly(reader) => {
                debug!("upgrading ledger handle to overlay");
                let overlay = Rc::new(RefCell::new(DiffLedger::new(
                    reader.clone(),
                    generating_balance_depth,
                )));
                *self = LedgerHandle::Overlay(Rc::clone(&overlay));
                overlay
            }
        }
    }
}

impl<R: LedgerReader> LedgerReader for LedgerHandle<R> {
    fn account_balance(&self, account: &Recipient, asset: &OptionalAsset) -> Result<i64, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.account_balance(account, asset),
            LedgerHandle::Overlay(overlay) => overlay.borrow().account_balance(account, asset),
        }
    }

    fn full_waves_balance(&self, account: &Recipient) -> Result<FullWavesBalance, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.full_waves_balance(account),
            LedgerHandle::Overlay(overlay) => overlay.borrow_mut().full_waves_balance(account),
        }
    }

    fn data_entry(&self, account: &Recipient, key: &str) -> Result<Option<DataValue>, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.data_entry(account, key),
            LedgerHandle::Overlay(overlay) => overlay.borrow().data_entry(account, key),
        }
    }

    fn asset_info(&self, asset_id: &AssetId) -> Result<AssetInfo, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.asset_info(asset_id),
            LedgerHandle::Overlay(overlay) => overlay.borrow().asset_info(asset_id),
        }
    }

    fn full_asset_info(&self, asset_id: &AssetId) -> Result<FullAssetInfo, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.full_asset_info(asset_id),
            LedgerHandle::Overlay(overlay) => overlay.borrow().full_asset_info(asset_id),
        }
    }

    fn is_asset_sponsored(&self, asset_id: &AssetId) -> Result<bool, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.is_asset_sponsored(asset_id),
            LedgerHandle::Overlay(overlay) => overlay.borrow().is_asset_sponsored(asset_id),
        }
    }

    fn resolve_recipient(&self, recipient: &Recipient) -> Result<Address, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.resolve_recipient(recipient),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().resolve_recipient(recipient),
        }
    }

    fn script_bytes(&self, account: &Recipient) -> Result<Vec<u8>, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.script_bytes(account),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().script_bytes(account),
        }
    }

    fn script_public_key(&self, address: &Address) -> Result<PublicKey, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.script_public_key(address),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().script_public_key(address),
        }
    }

    fn transaction_by_id(&self, id: &Digest) -> Result<RideObject, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.transaction_by_id(id),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().transaction_by_id(id),
        }
    }

    fn transaction_height(&self, id: &Digest) -> Result<u64, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.transaction_height(id),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().transaction_height(id),
        }
    }

    fn block_header(&self, height: u64) -> Result<BlockInfo, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.block_header(height),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().block_header(height),
        }
    }

    fn block_vrf(&self, height: u64) -> Result<Option<Vec<u8>>, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.block_vrf(height),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().block_vrf(height),
        }
    }

    fn building_height(&self) -> Result<u64, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.building_height(),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().building_height(),
        }
    }

    fn estimator_version(&self) -> Result<u8, Error> {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.estimator_version(),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().estimator_version(),
        }
    }

    fn is_not_found(&self, error: &Error) -> bool {
        match self {
            LedgerHandle::ReadOnly(reader) => reader.is_not_found(error),
            LedgerHandle::Overlay(overlay) => overlay.borrow().reader().is_not_found(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ride_types::{DataEntry, DataValue, PublicKey, Scheme};

    use super::*;
    use crate::ledger::InMemoryLedger;

    const SCHEME: Scheme = b'T';

    #[test]
    fn clones_should_share_the_overlay() {
        let mut store = InMemoryLedger::new(SCHEME, 1);
        let address = store.add_account(PublicKey::new([1; 32]));
        let mut handle = LedgerHandle::new(Rc::new(store));
        assert!(!handle.is_overlay());

        let overlay = handle.overlay(10);
        let child = handle.clone();
        assert!(child.is_overlay());

        let entry = DataEntry::new("key", DataValue::Boolean(true));
        overlay
            .borrow_mut()
            .put_data_entry(address, &entry.key, entry.value.clone());

        assert_eq!(
            child.data_entry(&Recipient::Address(address), "key"),
            Ok(Some(DataValue::Boolean(true)))
        );
        assert!(Rc::ptr_eq(&overlay, &handle.overlay(10)));
    }
}
