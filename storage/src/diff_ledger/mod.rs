//! This module defines the `DiffLedger` - an overlay that holds the effects of an invocation chain
//! on top of the committed ledger, so that the ledger remains unmodified while scripts interact
//! with it as if the effects were already applied.
mod balance;
#[cfg(test)]
mod tests;

use std::collections::{hash_map::Entry, HashMap, HashSet};

use tracing::trace;

use ride_types::{
    Address, AssetId, AssetInfo, DataValue, FullAssetInfo, FullWavesBalance, LeaseId,
    OptionalAsset, Recipient,
};

use self::balance::checked_add;
pub use self::balance::BalanceDiff;
use crate::ledger::{Error, LedgerReader};

/// Key of a data storage entry in the overlay.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DataKey {
    /// Owner of the data storage.
    pub address: Address,
    /// Entry key.
    pub key: String,
}

impl DataKey {
    /// Constructs a key.
    pub fn new(address: Address, key: &str) -> Self {
        DataKey {
            address,
            key: key.to_string(),
        }
    }
}

/// An asset issued within the current invocation chain.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewAsset {
    /// Issuing dApp.
    pub issuer: Address,
    /// Asset name.
    pub name: String,
    /// Asset description.
    pub description: String,
    /// Current quantity.
    pub quantity: i64,
    /// Number of decimal places.
    pub decimals: u8,
    /// Whether more may be issued.
    pub reissuable: bool,
    /// Asset script.
    pub script: Option<Vec<u8>>,
    /// Nonce of the issue.
    pub nonce: i64,
}

/// Changes to an asset that existed before the chain started.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct AssetDiff {
    /// Net quantity reissued minus burned.
    pub quantity: i64,
    /// Reissuable flag set by the latest reissue, if any.
    pub reissuable: Option<bool>,
}

/// A lease started within the current invocation chain.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LeaseRecord {
    /// Lessor.
    pub sender: Address,
    /// Lessee.
    pub recipient: Address,
    /// Leased amount.
    pub amount: i64,
}

/// An interface for the ledger that holds all mutations of an invocation chain instead of
/// applying them to the store. Every read consults the overlay first and falls back to the store.
pub struct DiffLedger<R> {
    reader: R,
    generating_balance_depth: usize,
    integer_entries: HashMap<DataKey, i64>,
    boolean_entries: HashMap<DataKey, bool>,
    string_entries: HashMap<DataKey, String>,
    binary_entries: HashMap<DataKey, Vec<u8>>,
    deleted_entries: HashSet<DataKey>,
    balances: HashMap<(Address, OptionalAsset), BalanceDiff>,
    new_assets: HashMap<AssetId, NewAsset>,
    old_assets: HashMap<AssetId, AssetDiff>,
    sponsorships: HashMap<AssetId, i64>,
    leases: HashMap<LeaseId, LeaseRecord>,
}

impl<R: LedgerReader> DiffLedger<R> {
    /// Creates an empty overlay using `reader` as the interface to the committed ledger.
    pub fn new(reader: R, generating_balance_depth: usize) -> DiffLedger<R> {
        DiffLedger {
            reader,
            generating_balance_depth,
            integer_entries: HashMap::new(),
            boolean_entries: HashMap::new(),
            string_entries: HashMap::new(),
            binary_entries: HashMap::new(),
            deleted_entries: HashSet::new(),
            balances: HashMap::new(),
            new_assets: HashMap::new(),
            old_assets: HashMap::new(),
            sponsorships: HashMap::new(),
            leases: HashMap::new(),
        }
    }

    /// Returns the `reader` used to access the committed ledger.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Balance of `account` in `asset`: the stored balance plus the overlay delta.
    pub fn account_balance(
        &self,
        account: &Recipient,
        asset: &OptionalAsset,
    ) -> Result<i64, Error> {
        let address = self.reader.resolve_recipient(account)?;
        let stored = self
            .reader
            .account_balance(&Recipient::Address(address), asset)?;
        match self.balances.get(&(address, *asset)) {
            Some(diff) => checked_add(stored, diff.regular(), "account balance"),
            None => Ok(stored),
        }
    }

    /// Every native-token balance figure of `account`.
    ///
    /// Each call records the merged effective balance in the account's history; the generating
    /// balance is the minimum of that history and the stored generating balance. The first call for
    /// an account creates an empty diff for it and returns the stored figures unchanged.
    pub fn full_waves_balance(&mut self, account: &Recipient) -> Result<FullWavesBalance, Error> {
        let address = self.reader.resolve_recipient(account)?;
        let stored = self.reader.full_waves_balance(&Recipient::Address(address))?;
        let depth = self.generating_balance_depth;

        let diff = match self.balances.entry((address, OptionalAsset::Waves)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!(%address, "creating empty native balance diff");
                let mut diff = BalanceDiff::default();
                diff.record_effective(stored.effective, depth);
                entry.insert(diff);
                return Ok(stored);
            }
        };

        let spendable = diff
            .regular()
            .checked_sub(diff.lease_out())
            .ok_or(Error::Overflow("available balance"))?;
        let regular = checked_add(diff.regular(), stored.regular, "regular balance")?;
        let available = checked_add(spendable, stored.available, "available balance")?;
        let effective = checked_add(
            checked_add(spendable, diff.lease_in(), "effective balance")?,
            stored.effective,
            "effective balance",
        )?;
        let lease_in = checked_add(diff.lease_in(), stored.lease_in, "lease in")?;
        let lease_out = checked_add(diff.lease_out(), stored.lease_out, "lease out")?;

        diff.record_effective(effective, depth);
        let generating = diff
            .min_effective()
            .map_or(stored.generating, |min| min.min(stored.generating));

        Ok(FullWavesBalance {
            regular,
            generating,
            available,
            effective,
            lease_in,
            lease_out,
        })
    }

    /// Summary of an asset, merged with quantity and sponsorship changes from the overlay.
    pub fn asset_info(&self, asset_id: &AssetId) -> Result<AssetInfo, Error> {
        if let Some(asset) = self.new_assets.get(asset_id) {
            return self.new_asset_info(asset_id, asset);
        }
        let mut info = self.reader.asset_info(asset_id)?;
        if let Some(diff) = self.old_assets.get(asset_id) {
            info.quantity = checked_add(info.quantity, diff.quantity, "asset quantity")?;
            if let Some(reissuable) = diff.reissuable {
                info.reissuable = reissuable;
            }
        }
        if let Some(min_fee) = self.sponsorships.get(asset_id) {
            info.sponsored = *min_fee > 0;
        }
        Ok(info)
    }

    /// Complete description of an asset. Unlike [`asset_info`](Self::asset_info) this rejects a
    /// merged quantity below zero.
    pub fn full_asset_info(&self, asset_id: &AssetId) -> Result<FullAssetInfo, Error> {
        if let Some(asset) = self.new_assets.get(asset_id) {
            return Ok(FullAssetInfo {
                info: self.new_asset_info(asset_id, asset)?,
                name: asset.name.clone(),
                description: asset.description.clone(),
                sponsorship_cost: self.sponsorships.get(asset_id).copied().unwrap_or_default(),
                script: asset.script.clone(),
            });
        }
        let mut full = self.reader.full_asset_info(asset_id)?;
        if let Some(diff) = self.old_assets.get(asset_id) {
            let quantity = checked_add(full.info.quantity, diff.quantity, "asset quantity")?;
            if quantity < 0 {
                return Err(Error::NegativeAssetQuantity {
                    asset_id: *asset_id,
                    quantity,
                });
            }
            full.info.quantity = quantity;
            if let Some(reissuable) = diff.reissuable {
                full.info.reissuable = reissuable;
            }
        }
        if let Some(min_fee) = self.sponsorships.get(asset_id) {
            full.info.sponsored = *min_fee > 0;
            full.sponsorship_cost = *min_fee;
        }
        Ok(full)
    }

    /// Whether fees may be paid in the asset. A zero override reads as not sponsored.
    pub fn is_asset_sponsored(&self, asset_id: &AssetId) -> Result<bool, Error> {
        if let Some(min_fee) = self.sponsorships.get(asset_id) {
            return Ok(*min_fee > 0);
        }
        if self.new_assets.contains_key(asset_id) {
            return Ok(false);
        }
        self.reader.is_asset_sponsored(asset_id)
    }

    /// The value under `key` in the data storage of `account`.
    pub fn data_entry(&self, account: &Recipient, key: &str) -> Result<Option<DataValue>, Error> {
        let address = self.reader.resolve_recipient(account)?;
        let data_key = DataKey::new(address, key);
        if self.deleted_entries.contains(&data_key) {
            return Ok(None);
        }
        if let Some(value) = self.integer_entries.get(&data_key) {
            return Ok(Some(DataValue::Integer(*value)));
        }
        if let Some(value) = self.boolean_entries.get(&data_key) {
            return Ok(Some(DataValue::Boolean(*value)));
        }
        if let Some(value) = self.string_entries.get(&data_key) {
            return Ok(Some(DataValue::String(value.clone())));
        }
        if let Some(value) = self.binary_entries.get(&data_key) {
            return Ok(Some(DataValue::Binary(value.clone())));
        }
        self.reader.data_entry(&Recipient::Address(address), key)
    }

    /// Returns the overlay delta of one balance, if any.
    pub fn balance_diff(
        &self,
        address: &Address,
        asset: &OptionalAsset,
    ) -> Option<&BalanceDiff> {
        self.balances.get(&(*address, *asset))
    }

    /// Returns an asset issued in this chain.
    pub fn new_asset(&self, asset_id: &AssetId) -> Option<&NewAsset> {
        self.new_assets.get(asset_id)
    }

    /// Returns the changes to a pre-existing asset.
    pub fn asset_diff(&self, asset_id: &AssetId) -> Option<&AssetDiff> {
        self.old_assets.get(asset_id)
    }

    /// Returns a lease started in this chain.
    pub fn lease(&self, lease_id: &LeaseId) -> Option<&LeaseRecord> {
        self.leases.get(lease_id)
    }

    /// Adds `delta` to the balance of `address` in `asset`.
    pub fn add_balance_delta(
        &mut self,
        address: Address,
        asset: OptionalAsset,
        delta: i64,
    ) -> Result<(), Error> {
        trace!(%address, %asset, delta, "balance delta");
        self.balances
            .entry((address, asset))
            .or_default()
            .add_regular(delta)
    }

    /// Adds deltas to the lease figures of `address`.
    pub fn add_lease_delta(
        &mut self,
        address: Address,
        lease_in: i64,
        lease_out: i64,
    ) -> Result<(), Error> {
        trace!(%address, lease_in, lease_out, "lease delta");
        self.balances
            .entry((address, OptionalAsset::Waves))
            .or_default()
            .add_lease(lease_in, lease_out)
    }

    /// Writes or deletes a data entry; the latest write of a key wins regardless of type.
    pub fn put_data_entry(&mut self, address: Address, key: &str, value: Option<DataValue>) {
        let data_key = DataKey::new(address, key);
        self.integer_entries.remove(&data_key);
        self.boolean_entries.remove(&data_key);
        self.string_entries.remove(&data_key);
        self.binary_entries.remove(&data_key);
        match value {
            Some(DataValue::Integer(value)) => {
                self.deleted_entries.remove(&data_key);
                self.integer_entries.insert(data_key, value);
            }
            Some(DataValue::Boolean(value)) => {
                self.deleted_entries.remove(&data_key);
                self.boolean_entries.insert(data_key, value);
            }
            Some(DataValue::String(value)) => {
                self.deleted_entries.remove(&data_key);
                self.string_entries.insert(data_key, value);
            }
            Some(DataValue::Binary(value)) => {
                self.deleted_entries.remove(&data_key);
                self.binary_entries.insert(data_key, value);
            }
            None => {
                self.deleted_entries.insert(data_key);
            }
        }
    }

    /// Records an asset issued in this chain.
    pub fn put_new_asset(&mut self, asset_id: AssetId, asset: NewAsset) {
        self.new_assets.insert(asset_id, asset);
    }

    /// Increases the quantity of an asset and sets its reissuable flag.
    pub fn reissue(
        &mut self,
        asset_id: AssetId,
        quantity: i64,
        reissuable: bool,
    ) -> Result<(), Error> {
        if let Some(asset) = self.new_assets.get_mut(&asset_id) {
            asset.quantity = checked_add(asset.quantity, quantity, "asset quantity")?;
            asset.reissuable = reissuable;
            return Ok(());
        }
        let diff = self.old_assets.entry(asset_id).or_default();
        diff.quantity = checked_add(diff.quantity, quantity, "asset quantity")?;
        diff.reissuable = Some(reissuable);
        Ok(())
    }

    /// Decreases the quantity of an asset.
    pub fn burn(&mut self, asset_id: AssetId, quantity: i64) -> Result<(), Error> {
        let decrement = quantity
            .checked_neg()
            .ok_or(Error::Overflow("asset quantity"))?;
        if let Some(asset) = self.new_assets.get_mut(&asset_id) {
            asset.quantity = checked_add(asset.quantity, decrement, "asset quantity")?;
            return Ok(());
        }
        let diff = self.old_assets.entry(asset_id).or_default();
        diff.quantity = checked_add(diff.quantity, decrement, "asset quantity")?;
        Ok(())
    }

    /// Overrides the sponsorship minimal fee of an asset; `0` cancels sponsorship.
    pub fn set_sponsorship(&mut self, asset_id: AssetId, min_fee: i64) {
        self.sponsorships.insert(asset_id, min_fee);
    }

    /// Records a lease started in this chain.
    pub fn put_lease(&mut self, lease_id: LeaseId, lease: LeaseRecord) {
        self.leases.insert(lease_id, lease);
    }

    /// Removes and returns a lease started in this chain.
    pub fn take_lease(&mut self, lease_id: &LeaseId) -> Option<LeaseRecord> {
        self.leases.remove(lease_id)
    }

    fn new_asset_info(&self, asset_id: &AssetId, asset: &NewAsset) -> Result<AssetInfo, Error> {
        let issuer_public_key = self.reader.script_public_key(&asset.issuer)?;
        Ok(AssetInfo {
            id: *asset_id,
            quantity: asset.quantity,
            decimals: asset.decimals,
            issuer: asset.issuer,
            issuer_public_key,
            reissuable: asset.reissuable,
            scripted: asset.script.is_some(),
            sponsored: self
                .sponsorships
                .get(asset_id)
                .map_or(false, |min_fee| *min_fee > 0),
        })
    }
}
