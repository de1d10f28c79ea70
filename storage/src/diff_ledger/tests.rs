use std::{cell::Cell, rc::Rc};

use assert_matches::assert_matches;
use proptest::prelude::*;

use ride_types::{
    Address, AssetId, AssetInfo, BlockInfo, DataValue, Digest, FullAssetInfo, FullWavesBalance,
    LeaseId, OptionalAsset, PublicKey, Recipient, RideObject, Scheme,
};

use super::{DiffLedger, LeaseRecord, NewAsset};
use crate::ledger::{Error, InMemoryLedger, LedgerReader};

const SCHEME: Scheme = b'T';

/// A reader that counts how many times the committed ledger was queried.
struct CountingLedger {
    count: Rc<Cell<i32>>,
    inner: InMemoryLedger,
}

impl CountingLedger {
    fn new(inner: InMemoryLedger, counter: Rc<Cell<i32>>) -> CountingLedger {
        CountingLedger {
            count: counter,
            inner,
        }
    }

    fn hit(&self) {
        self.count.set(self.count.get() + 1);
    }
}

impl LedgerReader for CountingLedger {
    fn account_balance(&self, account: &Recipient, asset: &OptionalAsset) -> Result<i64, Error> {
        self.hit();
        self.inner.account_balance(account, asset)
    }

    fn full_waves_balance(&self, account: &Recipient) -> Result<FullWavesBalance, Error> {
        self.hit();
        self.inner.full_waves_balance(account)
    }

    fn data_entry(&self, account: &Recipient, key: &str) -> Result<Option<DataValue>, Error> {
        self.hit();
        self.inner.data_entry(account, key)
    }

    fn asset_info(&self, asset_id: &AssetId) -> Result<AssetInfo, Error> {
        self.hit();
        self.inner.asset_info(asset_id)
    }

    fn full_asset_info(&self, asset_id: &AssetId) -> Result<FullAssetInfo, Error> {
        self.hit();
        self.inner.full_asset_info(asset_id)
    }

    fn is_asset_sponsored(&self, asset_id: &AssetId) -> Result<bool, Error> {
        self.hit();
        self.inner.is_asset_sponsored(asset_id)
    }

    fn resolve_recipient(&self, recipient: &Recipient) -> Result<Address, Error> {
        self.inner.resolve_recipient(recipient)
    }

    fn script_bytes(&self, account: &Recipient) -> Result<Vec<u8>, Error> {
        self.hit();
        self.inner.script_bytes(account)
    }

    fn script_public_key(&self, address: &Address) -> Result<PublicKey, Error> {
        self.inner.script_public_key(address)
    }

    fn transaction_by_id(&self, id: &Digest) -> Result<RideObject, Error> {
        self.hit();
        self.inner.transaction_by_id(id)
    }

    fn transaction_height(&self, id: &Digest) -> Result<u64, Error> {
        self.hit();
        self.inner.transaction_height(id)
    }

    fn block_header(&self, height: u64) -> Result<BlockInfo, Error> {
        self.hit();
        self.inner.block_header(height)
    }

    fn block_vrf(&self, height: u64) -> Result<Option<Vec<u8>>, Error> {
        self.hit();
        self.inner.block_vrf(height)
    }

    fn building_height(&self) -> Result<u64, Error> {
        self.inner.building_height()
    }

    fn estimator_version(&self) -> Result<u8, Error> {
        self.inner.estimator_version()
    }
}

fn store_with_accounts() -> (InMemoryLedger, Address, Address) {
    let mut store = InMemoryLedger::new(SCHEME, 100);
    let alice = store.add_account(PublicKey::new([1; 32]));
    let bob = store.add_account(PublicKey::new([2; 32]));
    (store, alice, bob)
}

fn stored_asset(id: AssetId, issuer: Address, quantity: i64) -> FullAssetInfo {
    FullAssetInfo {
        info: AssetInfo {
            id,
            quantity,
            decimals: 2,
            issuer,
            issuer_public_key: PublicKey::new([1; 32]),
            reissuable: true,
            scripted: false,
            sponsored: false,
        },
        name: "gold".to_string(),
        description: "bars".to_string(),
        sponsorship_cost: 0,
        script: None,
    }
}

#[test]
fn transfer_deltas_should_be_visible_on_top_of_store() {
    let (mut store, alice, bob) = store_with_accounts();
    store.set_regular_waves_balance(alice, 1_000);
    let mut ledger = DiffLedger::new(store, 10);

    ledger
        .add_balance_delta(alice, OptionalAsset::Waves, -300)
        .unwrap();
    ledger
        .add_balance_delta(bob, OptionalAsset::Waves, 300)
        .unwrap();

    assert_eq!(
        ledger.account_balance(&Recipient::Address(alice), &OptionalAsset::Waves),
        Ok(700)
    );
    assert_eq!(
        ledger.account_balance(&Recipient::Address(bob), &OptionalAsset::Waves),
        Ok(300)
    );
    assert_eq!(
        ledger
            .balance_diff(&alice, &OptionalAsset::Waves)
            .map(|diff| diff.regular()),
        Some(-300)
    );
}

#[test]
fn lease_and_cancel_should_restore_lease_figures() {
    let (mut store, alice, bob) = store_with_accounts();
    store.set_regular_waves_balance(alice, 1_000);
    let mut ledger = DiffLedger::new(store, 10);
    let lease_id = LeaseId::new(Digest::hash(b"lease"));

    ledger.add_lease_delta(alice, 0, 400).unwrap();
    ledger.add_lease_delta(bob, 400, 0).unwrap();
    ledger.put_lease(
        lease_id,
        LeaseRecord {
            sender: alice,
            recipient: bob,
            amount: 400,
        },
    );

    let alice_balance = ledger
        .full_waves_balance(&Recipient::Address(alice))
        .unwrap();
    assert_eq!(alice_balance.lease_out, 400);
    assert_eq!(alice_balance.available, 600);
    assert_eq!(alice_balance.effective, 600);

    let lease = ledger.take_lease(&lease_id).unwrap();
    ledger.add_lease_delta(lease.sender, 0, -lease.amount).unwrap();
    ledger
        .add_lease_delta(lease.recipient, -lease.amount, 0)
        .unwrap();
    assert_eq!(ledger.lease(&lease_id), None);

    let alice_balance = ledger
        .full_waves_balance(&Recipient::Address(alice))
        .unwrap();
    assert_eq!(alice_balance.lease_out, 0);
    assert_eq!(alice_balance.available, 1_000);
    // The lower effective balance observed while the lease was active still bounds generating.
    assert_eq!(alice_balance.generating, 600);
}

#[test]
fn first_full_balance_read_should_return_stored_figures() {
    let (mut store, alice, _) = store_with_accounts();
    let stored = FullWavesBalance {
        regular: 500,
        generating: 450,
        available: 480,
        effective: 490,
        lease_in: 10,
        lease_out: 20,
    };
    store.set_waves_balance(alice, stored);
    let mut ledger = DiffLedger::new(store, 10);

    assert_eq!(ledger.full_waves_balance(&Recipient::Address(alice)), Ok(stored));
    let diff = ledger
        .balance_diff(&alice, &OptionalAsset::Waves)
        .expect("diff should be created");
    assert_eq!(diff.regular(), 0);
    assert_eq!(diff.effective_history().copied().collect::<Vec<_>>(), vec![490]);
}

#[test]
fn full_balance_should_merge_every_figure() {
    let (mut store, alice, _) = store_with_accounts();
    store.set_waves_balance(
        alice,
        FullWavesBalance {
            regular: 500,
            generating: 450,
            available: 480,
            effective: 490,
            lease_in: 10,
            lease_out: 20,
        },
    );
    let mut ledger = DiffLedger::new(store, 10);
    ledger
        .add_balance_delta(alice, OptionalAsset::Waves, 100)
        .unwrap();
    ledger.add_lease_delta(alice, 30, 50).unwrap();

    let balance = ledger
        .full_waves_balance(&Recipient::Address(alice))
        .unwrap();
    assert_eq!(
        balance,
        FullWavesBalance {
            regular: 600,
            generating: 450,
            available: 530,
            effective: 570,
            lease_in: 40,
            lease_out: 70,
        }
    );
}

#[test]
fn generating_balance_should_track_minimum_effective() {
    let (mut store, alice, _) = store_with_accounts();
    store.set_regular_waves_balance(alice, 1_000);
    let mut ledger = DiffLedger::new(store, 10);
    let alice_recipient = Recipient::Address(alice);

    ledger
        .add_balance_delta(alice, OptionalAsset::Waves, -800)
        .unwrap();
    assert_eq!(
        ledger.full_waves_balance(&alice_recipient).unwrap().generating,
        200
    );

    ledger
        .add_balance_delta(alice, OptionalAsset::Waves, 800)
        .unwrap();
    let balance = ledger.full_waves_balance(&alice_recipient).unwrap();
    assert_eq!(balance.effective, 1_000);
    assert_eq!(balance.generating, 200);
}

#[test]
fn latest_data_write_should_win_across_types() {
    let (mut store, alice, _) = store_with_accounts();
    store.set_data_entry(alice, "key", DataValue::String("stored".to_string()));
    let mut ledger = DiffLedger::new(store, 10);
    let alice_recipient = Recipient::Address(alice);

    ledger.put_data_entry(alice, "key", Some(DataValue::Integer(5)));
    ledger.put_data_entry(alice, "key", Some(DataValue::Boolean(true)));
    assert_eq!(
        ledger.data_entry(&alice_recipient, "key"),
        Ok(Some(DataValue::Boolean(true)))
    );

    ledger.put_data_entry(alice, "key", Some(DataValue::Binary(vec![1, 2])));
    assert_eq!(
        ledger.data_entry(&alice_recipient, "key"),
        Ok(Some(DataValue::Binary(vec![1, 2])))
    );
}

#[test]
fn delete_marker_should_hide_stored_entry_until_rewritten() {
    let (mut store, alice, _) = store_with_accounts();
    store.set_data_entry(alice, "key", DataValue::Integer(1));
    let mut ledger = DiffLedger::new(store, 10);
    let alice_recipient = Recipient::Address(alice);

    ledger.put_data_entry(alice, "key", None);
    assert_eq!(ledger.data_entry(&alice_recipient, "key"), Ok(None));

    ledger.put_data_entry(alice, "key", Some(DataValue::Integer(2)));
    assert_eq!(
        ledger.data_entry(&alice_recipient, "key"),
        Ok(Some(DataValue::Integer(2)))
    );
}

#[test]
fn new_asset_should_be_described_without_store_reads() {
    let (store, alice, _) = store_with_accounts();
    let counter = Rc::new(Cell::new(0));
    let mut ledger = DiffLedger::new(CountingLedger::new(store, Rc::clone(&counter)), 10);
    let asset_id = AssetId::new(Digest::hash(b"new asset"));

    ledger.put_new_asset(
        asset_id,
        NewAsset {
            issuer: alice,
            name: "token".to_string(),
            description: String::new(),
            quantity: 1_000,
            decimals: 4,
            reissuable: true,
            script: None,
            nonce: 0,
        },
    );
    ledger.reissue(asset_id, 500, false).unwrap();
    ledger.burn(asset_id, 200).unwrap();

    let info = ledger.asset_info(&asset_id).unwrap();
    assert_eq!(info.quantity, 1_300);
    assert_eq!(info.decimals, 4);
    assert_eq!(info.issuer, alice);
    assert_eq!(info.issuer_public_key, PublicKey::new([1; 32]));
    assert!(!info.reissuable);
    assert!(!info.sponsored);

    let full = ledger.full_asset_info(&asset_id).unwrap();
    assert_eq!(full.name, "token");
    assert_eq!(full.sponsorship_cost, 0);
    assert_eq!(ledger.is_asset_sponsored(&asset_id), Ok(false));

    assert_eq!(counter.get(), 0);
}

#[test]
fn old_asset_changes_should_merge_with_store() {
    let (mut store, alice, _) = store_with_accounts();
    let asset_id = AssetId::new(Digest::hash(b"gold"));
    store.add_asset(stored_asset(asset_id, alice, 100));
    let mut ledger = DiffLedger::new(store, 10);

    ledger.reissue(asset_id, 50, false).unwrap();
    ledger.burn(asset_id, 30).unwrap();

    let info = ledger.asset_info(&asset_id).unwrap();
    assert_eq!(info.quantity, 120);
    assert!(!info.reissuable);
    assert_eq!(
        ledger.asset_diff(&asset_id).map(|diff| diff.quantity),
        Some(20)
    );
}

#[test]
fn full_asset_info_should_reject_negative_quantity() {
    let (mut store, alice, _) = store_with_accounts();
    let asset_id = AssetId::new(Digest::hash(b"gold"));
    store.add_asset(stored_asset(asset_id, alice, 100));
    let mut ledger = DiffLedger::new(store, 10);

    ledger.burn(asset_id, 150).unwrap();

    assert_eq!(ledger.asset_info(&asset_id).map(|info| info.quantity), Ok(-50));
    assert_matches!(
        ledger.full_asset_info(&asset_id),
        Err(Error::NegativeAssetQuantity { quantity: -50, .. })
    );
}

#[test]
fn zero_sponsorship_should_read_as_not_sponsored() {
    let (mut store, alice, _) = store_with_accounts();
    let asset_id = AssetId::new(Digest::hash(b"gold"));
    let mut asset = stored_asset(asset_id, alice, 100);
    asset.info.sponsored = true;
    asset.sponsorship_cost = 10;
    store.add_asset(asset);
    let mut ledger = DiffLedger::new(store, 10);

    assert_eq!(ledger.is_asset_sponsored(&asset_id), Ok(true));

    ledger.set_sponsorship(asset_id, 0);
    assert_eq!(ledger.is_asset_sponsored(&asset_id), Ok(false));
    let full = ledger.full_asset_info(&asset_id).unwrap();
    assert!(!full.info.sponsored);
    assert_eq!(full.sponsorship_cost, 0);

    ledger.set_sponsorship(asset_id, 25);
    assert_eq!(ledger.is_asset_sponsored(&asset_id), Ok(true));
    assert_eq!(
        ledger.full_asset_info(&asset_id).map(|full| full.sponsorship_cost),
        Ok(25)
    );
}

#[test]
fn unknown_asset_should_be_not_found() {
    let (store, _, _) = store_with_accounts();
    let ledger = DiffLedger::new(store, 10);
    let asset_id = AssetId::new(Digest::hash(b"missing"));

    let error = ledger.asset_info(&asset_id).unwrap_err();
    assert_eq!(error, Error::AssetNotFound(asset_id));
    assert!(ledger.reader().is_not_found(&error));
}

#[test]
fn overflowing_delta_should_fail() {
    let (store, alice, _) = store_with_accounts();
    let mut ledger = DiffLedger::new(store, 10);

    ledger
        .add_balance_delta(alice, OptionalAsset::Waves, i64::MAX)
        .unwrap();
    assert_matches!(
        ledger.add_balance_delta(alice, OptionalAsset::Waves, 1),
        Err(Error::Overflow(_))
    );
    assert_matches!(ledger.burn(AssetId::new(Digest::hash(b"x")), i64::MIN), Err(Error::Overflow(_)));
}

proptest! {
    #[test]
    fn balance_should_equal_stored_plus_sum_of_deltas(
        stored in 0i64..1_000_000_000,
        deltas in proptest::collection::vec(-1_000_000i64..1_000_000, 0..20),
    ) {
        let (mut store, alice, _) = store_with_accounts();
        store.set_regular_waves_balance(alice, stored);
        let mut ledger = DiffLedger::new(store, 10);
        for delta in &deltas {
            ledger.add_balance_delta(alice, OptionalAsset::Waves, *delta).unwrap();
        }
        let expected = stored + deltas.iter().sum::<i64>();
        prop_assert_eq!(
            ledger.account_balance(&Recipient::Address(alice), &OptionalAsset::Waves),
            Ok(expected)
        );
        let full = ledger.full_waves_balance(&Recipient::Address(alice)).unwrap();
        prop_assert_eq!(full.regular, expected);
    }
}
