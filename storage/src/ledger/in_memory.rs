use std::collections::BTreeMap;

use ride_types::{
    Address, Alias, AssetId, AssetInfo, BlockInfo, DataValue, Digest, FullAssetInfo,
    FullWavesBalance, OptionalAsset, PublicKey, Recipient, RideObject, Scheme,
};

use super::{Error, LedgerReader};

/// A ledger held entirely in ordered maps.
///
/// Accounts without an entry have zero balances, which matches how a freshly generated address
/// looks on chain.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    scheme: Scheme,
    building_height: u64,
    estimator_version: u8,
    public_keys: BTreeMap<Address, PublicKey>,
    aliases: BTreeMap<Alias, Address>,
    scripts: BTreeMap<Address, Vec<u8>>,
    waves_balances: BTreeMap<Address, FullWavesBalance>,
    asset_balances: BTreeMap<(Address, AssetId), i64>,
    data: BTreeMap<(Address, String), DataValue>,
    assets: BTreeMap<AssetId, FullAssetInfo>,
    transactions: BTreeMap<Digest, (u64, RideObject)>,
    blocks: BTreeMap<u64, BlockInfo>,
}

impl InMemoryLedger {
    /// Creates an empty ledger for the chain `scheme`, building the block at `building_height`.
    pub fn new(scheme: Scheme, building_height: u64) -> Self {
        InMemoryLedger {
            scheme,
            building_height,
            estimator_version: 3,
            ..Default::default()
        }
    }

    /// Registers an account by its public key and returns its address.
    pub fn add_account(&mut self, public_key: PublicKey) -> Address {
        let address = Address::from_public_key(self.scheme, &public_key);
        self.public_keys.insert(address, public_key);
        address
    }

    /// Registers `public_key` as the owner of an address imported from elsewhere.
    pub fn add_account_at(&mut self, address: Address, public_key: PublicKey) {
        self.public_keys.insert(address, public_key);
    }

    /// Attaches a script to the account.
    pub fn set_script(&mut self, address: Address, script: Vec<u8>) {
        self.scripts.insert(address, script);
    }

    /// Registers an alias.
    pub fn add_alias(&mut self, alias: Alias, address: Address) {
        self.aliases.insert(alias, address);
    }

    /// Sets every native-token balance figure of the account.
    pub fn set_waves_balance(&mut self, address: Address, balance: FullWavesBalance) {
        self.waves_balances.insert(address, balance);
    }

    /// Sets a plain native-token balance with no leases: every figure equals `amount`.
    pub fn set_regular_waves_balance(&mut self, address: Address, amount: i64) {
        self.set_waves_balance(
            address,
            FullWavesBalance {
                regular: amount,
                generating: amount,
                available: amount,
                effective: amount,
                lease_in: 0,
                lease_out: 0,
            },
        );
    }

    /// Sets an asset balance.
    pub fn set_asset_balance(&mut self, address: Address, asset_id: AssetId, amount: i64) {
        self.asset_balances.insert((address, asset_id), amount);
    }

    /// Writes a data entry.
    pub fn set_data_entry(&mut self, address: Address, key: &str, value: DataValue) {
        self.data.insert((address, key.to_string()), value);
    }

    /// Registers an asset.
    pub fn add_asset(&mut self, asset: FullAssetInfo) {
        self.assets.insert(asset.info.id, asset);
    }

    /// Registers a committed transaction.
    pub fn add_transaction(&mut self, id: Digest, height: u64, transaction: RideObject) {
        self.transactions.insert(id, (height, transaction));
    }

    /// Registers a block header.
    pub fn add_block(&mut self, block: BlockInfo) {
        self.blocks.insert(block.height, block);
    }

    /// Sets the estimator version reported to scripts.
    pub fn set_estimator_version(&mut self, version: u8) {
        self.estimator_version = version;
    }
}

impl LedgerReader for InMemoryLedger {
    fn account_balance(&self, account: &Recipient, asset: &OptionalAsset) -> Result<i64, Error> {
        let address = self.resolve_recipient(account)?;
        let balance = match asset {
            OptionalAsset::Waves => self
                .waves_balances
                .get(&address)
                .map_or(0, |balance| balance.regular),
            OptionalAsset::Asset(asset_id) => self
                .asset_balances
                .get(&(address, *asset_id))
                .copied()
                .unwrap_or_default(),
        };
        Ok(balance)
    }

    fn full_waves_balance(&self, account: &Recipient) -> Result<FullWavesBalance, Error> {
        let address = self.resolve_recipient(account)?;
        Ok(self
            .waves_balances
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    fn data_entry(&self, account: &Recipient, key: &str) -> Result<Option<DataValue>, Error> {
        let address = self.resolve_recipient(account)?;
        Ok(self.data.get(&(address, key.to_string())).cloned())
    }

    fn asset_info(&self, asset_id: &AssetId) -> Result<AssetInfo, Error> {
        self.full_asset_info(asset_id).map(|asset| asset.info)
    }

    fn full_asset_info(&self, asset_id: &AssetId) -> Result<FullAssetInfo, Error> {
        self.assets
            .get(asset_id)
            .cloned()
            .ok_or(Error::AssetNotFound(*asset_id))
    }

    fn is_asset_sponsored(&self, asset_id: &AssetId) -> Result<bool, Error> {
        self.full_asset_info(asset_id)
            .map(|asset| asset.sponsorship_cost > 0)
    }

    fn resolve_recipient(&self, recipient: &Recipient) -> Result<Address, Error> {
        match recipient {
            Recipient::Address(address) => Ok(*address),
            Recipient::Alias(alias) => self
                .aliases
                .get(alias)
                .copied()
                .ok_or_else(|| Error::AliasNotFound(alias.clone())),
        }
    }

    fn script_bytes(&self, account: &Recipient) -> Result<Vec<u8>, Error> {
        let address = self.resolve_recipient(account)?;
        self.scripts
            .get(&address)
            .cloned()
            .ok_or(Error::ScriptNotFound(address))
    }

    fn script_public_key(&self, address: &Address) -> Result<PublicKey, Error> {
        self.public_keys
            .get(address)
            .copied()
            .ok_or(Error::PublicKeyNotFound(*address))
    }

    fn transaction_by_id(&self, id: &Digest) -> Result<RideObject, Error> {
        self.transactions
            .get(id)
            .map(|(_, transaction)| transaction.clone())
            .ok_or(Error::TransactionNotFound(*id))
    }

    fn transaction_height(&self, id: &Digest) -> Result<u64, Error> {
        self.transactions
            .get(id)
            .map(|(height, _)| *height)
            .ok_or(Error::TransactionNotFound(*id))
    }

    fn block_header(&self, height: u64) -> Result<BlockInfo, Error> {
        self.blocks
            .get(&height)
            .cloned()
            .ok_or(Error::BlockNotFound(height))
    }

    fn block_vrf(&self, height: u64) -> Result<Option<Vec<u8>>, Error> {
        self.block_header(height).map(|block| block.vrf)
    }

    fn building_height(&self) -> Result<u64, Error> {
        Ok(self.building_height)
    }

    fn estimator_version(&self) -> Result<u8, Error> {
        Ok(self.estimator_version)
    }
}
