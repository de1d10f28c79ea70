use std::rc::Rc;

use assert_matches::assert_matches;

use ride_storage::{InMemoryLedger, LedgerReader, LedgerReaderExt};
use ride_types::{
    ActionKind, Address, AssetId, AssetInfo, AttachedPayment, BlockInfo, DataEntry, DataValue,
    Digest, FullAssetInfo, Invocation, InvokeScriptTransaction, LibraryVersion, OptionalAsset,
    Order, OrderType, PublicKey, Recipient, RideObject, RideValue, Scheme, ScriptAction,
    TransferAction,
};

use super::*;
use crate::execution::{ActionError, Error};

const SCHEME: Scheme = b'T';
const HEIGHT: u64 = 500;
const USER_KEY: PublicKey = PublicKey::new([1; 32]);
const FIRST_KEY: PublicKey = PublicKey::new([2; 32]);
const SECOND_KEY: PublicKey = PublicKey::new([3; 32]);

struct Fixture {
    store: Rc<InMemoryLedger>,
    user: Address,
    first: Address,
    second: Address,
}

fn fixture() -> Fixture {
    let mut store = InMemoryLedger::new(SCHEME, HEIGHT);
    let user = store.add_account(USER_KEY);
    let first = store.add_account(FIRST_KEY);
    let second = store.add_account(SECOND_KEY);
    store.set_regular_waves_balance(user, 10_000);
    store.set_regular_waves_balance(first, 1_000);
    Fixture {
        store: Rc::new(store),
        user,
        first,
        second,
    }
}

fn invoke(fixture: &Fixture, payments: Vec<AttachedPayment>) -> InvokeScriptTransaction {
    InvokeScriptTransaction {
        id: Digest::hash(b"invoke"),
        sender: fixture.user,
        sender_public_key: USER_KEY,
        dapp: Recipient::Address(fixture.first),
        function: "call".to_string(),
        payments,
        fee: 500_000,
        fee_asset: OptionalAsset::Waves,
        timestamp: 1_600_000_000_000,
        version: 2,
        proofs: vec![vec![1; 64]],
    }
}

fn environment(fixture: &Fixture) -> Environment<Rc<InMemoryLedger>> {
    let mut environment =
        Environment::new(SCHEME, HEIGHT, Rc::clone(&fixture.store), EngineConfig::default());
    environment.set_invoke(&invoke(fixture, Vec::new()));
    environment.set_this_from_address(fixture.first);
    environment.choose_size_check(LibraryVersion::V5);
    environment
}

fn nested_invocation(fixture: &Fixture, payments: Vec<AttachedPayment>) -> Invocation {
    Invocation {
        caller: fixture.first,
        caller_public_key: FIRST_KEY,
        origin_caller: fixture.user,
        origin_caller_public_key: USER_KEY,
        payments,
        transaction_id: Some(Digest::hash(b"invoke")),
        fee: 500_000,
        fee_asset: OptionalAsset::Waves,
    }
}

fn waves(account: Address, environment: &Environment<Rc<InMemoryLedger>>) -> i64 {
    environment
        .state()
        .account_balance(&Recipient::Address(account), &OptionalAsset::Waves)
        .unwrap()
}

fn data(key: &str, value: i64) -> ScriptAction {
    ScriptAction::DataEntry(DataEntry::new(key, DataValue::Integer(value)))
}

#[test]
fn fresh_environment_should_read_store_only() {
    let fixture = fixture();
    let environment = environment(&fixture);

    assert_eq!(environment.scheme(), SCHEME);
    assert_eq!(environment.height(), HEIGHT);
    assert!(!environment.state().is_overlay());
    assert_eq!(waves(fixture.first, &environment), 1_000);
    assert_eq!(environment.state().building_height(), Ok(HEIGHT));
    assert_eq!(environment.transaction_id(), Some(Digest::hash(b"invoke")));
    assert_eq!(
        environment.invocation().map(|invocation| invocation.caller),
        Some(fixture.user)
    );
    assert!(environment.actions().is_empty());
}

#[test]
fn applying_actions_should_upgrade_to_overlay_and_accumulate() {
    let fixture = fixture();
    let mut environment = environment(&fixture);

    let validated = environment
        .apply_actions(LibraryVersion::V5, &[data("count", 1)])
        .unwrap();

    assert!(environment.state().is_overlay());
    assert_eq!(validated.len(), 1);
    assert_eq!(validated[0].sender, FIRST_KEY);
    assert_eq!(environment.actions(), validated);
    assert_eq!(
        environment
            .state()
            .integer_entry(&Recipient::Address(fixture.first), "count"),
        Ok(Some(1))
    );
    // The committed ledger is untouched.
    assert_eq!(
        fixture
            .store
            .data_entry(&Recipient::Address(fixture.first), "count"),
        Ok(None)
    );
}

#[test]
fn actions_outside_dapp_context_should_fail() {
    let fixture = fixture();
    let mut environment = environment(&fixture);
    environment.set_this_from_asset_info(AssetInfo {
        id: AssetId::new(Digest::hash(b"asset")),
        quantity: 1,
        decimals: 0,
        issuer: fixture.first,
        issuer_public_key: FIRST_KEY,
        reissuable: false,
        scripted: true,
        sponsored: false,
    });

    assert_eq!(
        environment.apply_actions(LibraryVersion::V5, &[data("key", 1)]),
        Err(Error::NotInDAppContext)
    );
}

#[test]
fn child_should_share_overlay_actions_and_counter() {
    let fixture = fixture();
    let mut parent = environment(&fixture);
    parent
        .apply_actions(LibraryVersion::V5, &[data("parent", 1)])
        .unwrap();

    let payment = AttachedPayment::new(OptionalAsset::Waves, 300);
    let mut child = parent
        .new_child(
            fixture.second,
            nested_invocation(&fixture, vec![payment]),
            LibraryVersion::V5,
        )
        .unwrap();

    assert_eq!(child.this(), Some(&This::Address(fixture.second)));
    assert_eq!(waves(fixture.first, &child), 700);
    assert_eq!(waves(fixture.second, &child), 300);
    assert_eq!(
        child
            .state()
            .integer_entry(&Recipient::Address(fixture.first), "parent"),
        Ok(Some(1))
    );

    child
        .apply_actions(
            LibraryVersion::V5,
            &[ScriptAction::Transfer(TransferAction {
                sender: None,
                recipient: Recipient::Address(fixture.user),
                amount: 100,
                asset: OptionalAsset::Waves,
            })],
        )
        .unwrap();

    assert_eq!(parent.invocation_count(), 1);
    assert_eq!(parent.actions().len(), 2);
    assert_eq!(parent.actions()[1].sender, SECOND_KEY);
    assert_eq!(waves(fixture.second, &parent), 200);
    assert_eq!(waves(fixture.user, &parent), 10_100);

    let result = parent.script_result();
    assert_eq!(result.data_entries.len(), 1);
    assert_eq!(result.transfers.len(), 1);
    assert_eq!(result.transfers[0].0, SECOND_KEY);
}

#[test]
fn child_payments_should_be_validated() {
    let fixture = fixture();
    let mut parent = environment(&fixture);
    let payment = |amount| AttachedPayment::new(OptionalAsset::Waves, amount);

    assert_eq!(
        parent
            .new_child(
                fixture.second,
                nested_invocation(&fixture, vec![payment(1); 11]),
                LibraryVersion::V5,
            )
            .err(),
        Some(Error::TooManyPayments { count: 11, max: 10 })
    );
    assert_eq!(
        parent
            .new_child(
                fixture.second,
                nested_invocation(&fixture, vec![payment(-1)]),
                LibraryVersion::V5,
            )
            .err(),
        Some(Error::NegativePayment(-1))
    );
    assert_matches!(
        parent
            .new_child(
                fixture.second,
                nested_invocation(&fixture, vec![payment(1_001)]),
                LibraryVersion::V5,
            )
            .err(),
        Some(Error::InsufficientPayment {
            available: 1_000,
            required: 1_001,
            ..
        })
    );
}

#[test]
fn self_payment_should_be_banned_from_v4() {
    let fixture = fixture();
    let mut parent = environment(&fixture);
    let payments = vec![AttachedPayment::new(OptionalAsset::Waves, 10)];

    assert_eq!(
        parent
            .new_child(
                fixture.first,
                nested_invocation(&fixture, payments.clone()),
                LibraryVersion::V4,
            )
            .err(),
        Some(Error::SelfPayment(fixture.first))
    );
    let child = parent
        .new_child(
            fixture.first,
            nested_invocation(&fixture, payments),
            LibraryVersion::V3,
        )
        .unwrap();
    assert_eq!(waves(fixture.first, &child), 1_000);
}

#[test]
fn invocation_chain_should_be_bounded() {
    let fixture = fixture();
    let config = EngineConfig {
        max_invocations: 2,
        ..EngineConfig::default()
    };
    let mut environment = Environment::new(SCHEME, HEIGHT, Rc::clone(&fixture.store), config);
    environment.set_this_from_address(fixture.first);

    let mut child = environment
        .new_child(fixture.second, nested_invocation(&fixture, Vec::new()), LibraryVersion::V5)
        .unwrap();
    let mut grandchild = child
        .new_child(fixture.first, nested_invocation(&fixture, Vec::new()), LibraryVersion::V5)
        .unwrap();
    assert_eq!(
        grandchild
            .new_child(fixture.second, nested_invocation(&fixture, Vec::new()), LibraryVersion::V5)
            .err(),
        Some(Error::TooManyInvocations { max: 2 })
    );
    assert_eq!(environment.invocation_count(), 3);
}

#[test]
fn failed_batch_should_keep_earlier_effects_in_overlay_only() {
    let fixture = fixture();
    let mut environment = environment(&fixture);
    let actions = vec![
        data("written", 1),
        ScriptAction::Transfer(TransferAction {
            sender: None,
            recipient: Recipient::Address(fixture.user),
            amount: 5_000,
            asset: OptionalAsset::Waves,
        }),
    ];

    assert_matches!(
        environment.apply_actions(LibraryVersion::V5, &actions),
        Err(Error::Action {
            index: 1,
            kind: ActionKind::Transfer,
            error: ActionError::InsufficientBalance { .. },
        })
    );
    assert!(environment.actions().is_empty());
    assert_eq!(
        environment
            .state()
            .integer_entry(&Recipient::Address(fixture.first), "written"),
        Ok(Some(1))
    );
    assert_eq!(
        fixture
            .store
            .integer_entry(&Recipient::Address(fixture.first), "written"),
        Ok(None)
    );
}

#[test]
fn message_length_should_depend_on_version() {
    let fixture = fixture();
    let mut environment = environment(&fixture);
    let max = environment.config().max_message_length;

    environment.choose_size_check(LibraryVersion::V2);
    assert_eq!(
        environment.message_length_policy(),
        MessageLengthPolicy::Unlimited
    );
    assert!(environment.check_message_length(max * 10));

    environment.choose_size_check(LibraryVersion::V3);
    assert!(environment.check_message_length(max));
    assert!(!environment.check_message_length(max + 1));
}

#[test]
fn transaction_views_should_be_replaced_whole() {
    let fixture = fixture();
    let mut environment = environment(&fixture);
    let transaction = invoke(&fixture, Vec::new()).to_ride_object();
    assert!(transaction.get("proofs").is_some());

    environment.set_transaction_without_proofs(Digest::hash(b"other"), transaction);
    let bound = environment.transaction().unwrap();
    assert_eq!(bound.type_name(), "InvokeScriptTransaction");
    assert!(bound.get("proofs").is_none());
    assert_eq!(environment.transaction_id(), Some(Digest::hash(b"other")));

    let order = Order {
        id: Digest::hash(b"order"),
        sender: fixture.user,
        sender_public_key: USER_KEY,
        matcher_public_key: SECOND_KEY,
        amount_asset: OptionalAsset::Waves,
        price_asset: OptionalAsset::Asset(AssetId::new(Digest::hash(b"usd"))),
        order_type: OrderType::Buy,
        price: 100,
        amount: 10,
        timestamp: 1,
        expiration: 2,
        matcher_fee: 300_000,
        matcher_fee_asset: OptionalAsset::Waves,
        proofs: Vec::new(),
    };
    environment.set_transaction_from_order(&order);
    assert_eq!(environment.transaction().map(RideObject::type_name), Some("Order"));
    assert_eq!(environment.transaction_id(), Some(order.id));

    let validated = environment
        .apply_actions(LibraryVersion::V5, &[data("key", 7)])
        .unwrap();
    environment.set_transaction_from_script_action(&validated[0], Digest::hash(b"invoke"), 42);
    let synthetic = environment.transaction().unwrap();
    assert_eq!(synthetic.type_name(), "DataTransaction");
    assert_eq!(synthetic.get("timestamp"), Some(&RideValue::Int(42)));
    assert_eq!(synthetic.get("senderPublicKey"), Some(&RideValue::from(FIRST_KEY)));
}

#[test]
fn this_should_convert_to_script_values() {
    let fixture = fixture();
    let mut environment = environment(&fixture);
    assert_eq!(
        environment.this().map(This::to_ride_value),
        Some(RideValue::Address(fixture.first))
    );

    let info = AssetInfo {
        id: AssetId::new(Digest::hash(b"asset")),
        quantity: 1_000,
        decimals: 2,
        issuer: fixture.first,
        issuer_public_key: FIRST_KEY,
        reissuable: true,
        scripted: true,
        sponsored: true,
    };
    environment.set_this_from_full_asset_info(FullAssetInfo {
        info,
        name: "token".to_string(),
        description: "test".to_string(),
        sponsorship_cost: 5,
        script: Some(vec![1]),
    });
    let value = environment.this().map(This::to_ride_value);
    let object = match value {
        Some(RideValue::Object(object)) => object,
        other => panic!("unexpected this: {:?}", other),
    };
    assert_eq!(object.type_name(), "Asset");
    assert_eq!(object.get("quantity"), Some(&RideValue::Int(1_000)));
    assert_eq!(object.get("minSponsoredFee"), Some(&RideValue::Int(5)));
    assert_eq!(environment.this().and_then(This::address), None);

    environment.set_new_dapp_address(fixture.second);
    assert_eq!(environment.callee(), Ok(fixture.second));
}

#[test]
fn block_view_should_be_bound() {
    let fixture = fixture();
    let mut environment = environment(&fixture);
    let block = BlockInfo {
        timestamp: 1,
        height: HEIGHT - 1,
        base_target: 100,
        generation_signature: vec![1; 32],
        generator: fixture.user,
        generator_public_key: USER_KEY,
        vrf: None,
    };
    environment.set_last_block(block.clone());
    assert_eq!(environment.block(), Some(&block));
}
