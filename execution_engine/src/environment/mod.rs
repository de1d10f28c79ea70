//! The context a RIDE script is evaluated in.
//!
//! An [`Environment`] is created once per top-level transaction and holds the views a script may
//! read: the chain, the current transaction, block and invocation, and `this`. Ledger reads go
//! through a [`LedgerHandle`] that stays read-only until the first batch of actions is applied or
//! the first nested invocation is entered. From then on every environment derived for the same
//! chain shares one overlay, one list of accumulated actions and one invocation counter.
#[cfg(test)]
mod tests;

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use tracing::debug;

use ride_storage::{LedgerHandle, LedgerReader};
use ride_types::{
    Address, AssetInfo, BlockInfo, Digest, FullAssetInfo, Invocation, InvokeScriptTransaction,
    LibraryVersion, OptionalAsset, Order, Recipient, RideObject, RideValue, Scheme, ScriptAction,
    ScriptResult, ValidatedAction,
};

use crate::{
    action_applier::{ActionApplier, ValidationRestrictions},
    engine_config::EngineConfig,
    execution::Error,
};

/// The value a script sees as `this`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum This {
    /// The account whose script runs.
    Address(Address),
    /// The asset whose script runs.
    AssetInfo(AssetInfo),
    /// The asset whose script runs, with its complete description.
    FullAssetInfo(FullAssetInfo),
}

impl This {
    /// The dApp address, if `this` is an account.
    pub fn address(&self) -> Option<&Address> {
        match self {
            This::Address(address) => Some(address),
            This::AssetInfo(_) | This::FullAssetInfo(_) => None,
        }
    }

    /// Converts to the value exposed to scripts.
    pub fn to_ride_value(&self) -> RideValue {
        match self {
            This::Address(address) => RideValue::Address(*address),
            This::AssetInfo(info) => RideValue::Object(asset_object(info)),
            This::FullAssetInfo(full) => {
                let min_sponsored_fee = (full.sponsorship_cost > 0).then(|| full.sponsorship_cost);
                RideValue::Object(
                    asset_object(&full.info)
                        .with("name", full.name.as_str())
                        .with("description", full.description.as_str())
                        .with("minSponsoredFee", min_sponsored_fee),
                )
            }
        }
    }
}

fn asset_object(info: &AssetInfo) -> RideObject {
    RideObject::new("Asset")
        .with("id", info.id)
        .with("quantity", info.quantity)
        .with("decimals", i64::from(info.decimals))
        .with("issuer", info.issuer)
        .with("issuerPublicKey", info.issuer_public_key)
        .with("reissuable", info.reissuable)
        .with("scripted", info.scripted)
        .with("sponsored", info.sponsored)
}

/// Limit on the length of messages passed to signature and hashing functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageLengthPolicy {
    /// Any length is accepted.
    Unlimited,
    /// Messages up to the given number of bytes are accepted.
    Limited(usize),
}

impl MessageLengthPolicy {
    /// Returns `true` if a message of `length` bytes is accepted.
    pub fn allows(self, length: usize) -> bool {
        match self {
            MessageLengthPolicy::Unlimited => true,
            MessageLengthPolicy::Limited(max) => length <= max,
        }
    }
}

/// Holds the state of one frame of an invocation chain.
#[derive(Clone)]
pub struct Environment<R> {
    scheme: Scheme,
    height: u64,
    ledger: LedgerHandle<R>,
    config: Rc<EngineConfig>,
    actions: Rc<RefCell<Vec<ValidatedAction>>>,
    invocation_count: Rc<Cell<u32>>,
    transaction: Option<RideObject>,
    transaction_id: Option<Digest>,
    this: Option<This>,
    block: Option<BlockInfo>,
    invocation: Option<Invocation>,
    message_length: MessageLengthPolicy,
}

impl<R: LedgerReader + Clone> Environment<R> {
    /// Creates a fresh environment reading the committed ledger through `reader`.
    pub fn new(scheme: Scheme, height: u64, reader: R, config: EngineConfig) -> Self {
        Environment {
            scheme,
            height,
            ledger: LedgerHandle::new(reader),
            config: Rc::new(config),
            actions: Rc::new(RefCell::new(Vec::new())),
            invocation_count: Rc::new(Cell::new(0)),
            transaction: None,
            transaction_id: None,
            this: None,
            block: None,
            invocation: None,
            message_length: MessageLengthPolicy::Unlimited,
        }
    }

    /// Chain identifier.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Height of the block being built.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Protocol limits in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Binds a transaction view.
    pub fn set_transaction(&mut self, id: Digest, transaction: RideObject) {
        self.transaction = Some(transaction);
        self.transaction_id = Some(id);
    }

    /// Binds a transaction view with its proofs stripped.
    pub fn set_transaction_without_proofs(&mut self, id: Digest, mut transaction: RideObject) {
        transaction.remove("proofs");
        self.set_transaction(id, transaction);
    }

    /// Binds an exchange order as the transaction view.
    pub fn set_transaction_from_order(&mut self, order: &Order) {
        self.set_transaction(order.id, order.to_ride_object());
    }

    /// Binds an action of the governing invocation, presented as a transaction, for an asset
    /// script to validate.
    pub fn set_transaction_from_script_action(
        &mut self,
        action: &ValidatedAction,
        transaction_id: Digest,
        timestamp: u64,
    ) {
        let transaction = action.to_ride_object(&transaction_id, timestamp);
        self.set_transaction(transaction_id, transaction);
    }

    /// Binds an invoke transaction: both the transaction view and the invocation of the callable.
    pub fn set_invoke(&mut self, transaction: &InvokeScriptTransaction) {
        self.set_transaction(transaction.id, transaction.to_ride_object());
        self.invocation = Some(transaction.invocation());
    }

    /// Binds the header of the last block.
    pub fn set_last_block(&mut self, block: BlockInfo) {
        self.block = Some(block);
    }

    /// Sets `this` to an account.
    pub fn set_this_from_address(&mut self, address: Address) {
        self.this = Some(This::Address(address));
    }

    /// Sets `this` to an asset.
    pub fn set_this_from_asset_info(&mut self, info: AssetInfo) {
        self.this = Some(This::AssetInfo(info));
    }

    /// Sets `this` to an asset with its complete description.
    pub fn set_this_from_full_asset_info(&mut self, info: FullAssetInfo) {
        self.this = Some(This::FullAssetInfo(info));
    }

    /// Switches to the context of another dApp.
    pub fn set_new_dapp_address(&mut self, address: Address) {
        debug!(%address, "switching dApp context");
        self.this = Some(This::Address(address));
    }

    /// Selects the message length limit for scripts of `version`.
    pub fn choose_size_check(&mut self, version: LibraryVersion) {
        self.message_length = if version >= LibraryVersion::V3 {
            MessageLengthPolicy::Limited(self.config.max_message_length)
        } else {
            MessageLengthPolicy::Unlimited
        };
    }

    /// Counts one more invocation in the chain and returns the new count.
    pub fn increment_invocation_count(&self) -> u32 {
        let count = self.invocation_count.get().saturating_add(1);
        self.invocation_count.set(count);
        count
    }

    /// Number of invocations in the chain so far.
    pub fn invocation_count(&self) -> u32 {
        self.invocation_count.get()
    }

    /// The current transaction view.
    pub fn transaction(&self) -> Option<&RideObject> {
        self.transaction.as_ref()
    }

    /// Id of the governing transaction.
    pub fn transaction_id(&self) -> Option<Digest> {
        self.transaction_id
    }

    /// The current `this`.
    pub fn this(&self) -> Option<&This> {
        self.this.as_ref()
    }

    /// Header of the last block.
    pub fn block(&self) -> Option<&BlockInfo> {
        self.block.as_ref()
    }

    /// The invocation of the running callable.
    pub fn invocation(&self) -> Option<&Invocation> {
        self.invocation.as_ref()
    }

    /// The ledger, merged with the effects of the chain so far.
    pub fn state(&self) -> &LedgerHandle<R> {
        &self.ledger
    }

    /// Message length policy in effect.
    pub fn message_length_policy(&self) -> MessageLengthPolicy {
        self.message_length
    }

    /// Returns `true` if a message of `length` bytes may be processed.
    pub fn check_message_length(&self, length: usize) -> bool {
        self.message_length.allows(length)
    }

    /// Actions accepted in the chain so far, in order.
    pub fn actions(&self) -> Vec<ValidatedAction> {
        self.actions.borrow().clone()
    }

    /// Actions accepted in the chain so far, grouped by kind.
    pub fn script_result(&self) -> ScriptResult {
        ScriptResult::from_actions(self.actions())
    }

    /// The dApp whose script runs in this frame.
    pub fn callee(&self) -> Result<Address, Error> {
        self.this
            .as_ref()
            .and_then(This::address)
            .copied()
            .ok_or(Error::NotInDAppContext)
    }

    /// Validates `actions` of the current dApp written for `version`, applies them to the shared
    /// overlay and appends them to the accumulated actions.
    pub fn apply_actions(
        &mut self,
        version: LibraryVersion,
        actions: &[ScriptAction],
    ) -> Result<Vec<ValidatedAction>, Error> {
        let callee = self.callee()?;
        let overlay = self.ledger.overlay(self.config.generating_balance_depth);
        let mut ledger = overlay.borrow_mut();
        let restrictions = ValidationRestrictions::new(version, self.scheme, callee);
        let validated =
            ActionApplier::new(&mut *ledger, restrictions, &self.config)?.apply(actions)?;
        self.actions.borrow_mut().extend(validated.iter().cloned());
        Ok(validated)
    }

    /// Derives the environment of a nested call of `dapp`, whose script is written for `version`.
    ///
    /// The attached payments move from the current dApp to `dapp` before the nested script runs.
    /// The derived environment shares the overlay, the accumulated actions and the invocation
    /// counter with this one.
    pub fn new_child(
        &mut self,
        dapp: Address,
        invocation: Invocation,
        version: LibraryVersion,
    ) -> Result<Environment<R>, Error> {
        let caller = self.callee()?;
        let payments = &invocation.payments;
        if payments.len() > self.config.max_attached_payments {
            return Err(Error::TooManyPayments {
                count: payments.len(),
                max: self.config.max_attached_payments,
            });
        }
        if version >= LibraryVersion::V4 && caller == dapp && !payments.is_empty() {
            return Err(Error::SelfPayment(dapp));
        }
        if self.increment_invocation_count() > self.config.max_invocations {
            return Err(Error::TooManyInvocations {
                max: self.config.max_invocations,
            });
        }

        let overlay = self.ledger.overlay(self.config.generating_balance_depth);
        {
            let mut ledger = overlay.borrow_mut();
            let payer = Recipient::Address(caller);
            for payment in payments {
                if payment.amount < 0 {
                    return Err(Error::NegativePayment(payment.amount));
                }
                let available = match payment.asset {
                    OptionalAsset::Waves => ledger.full_waves_balance(&payer)?.available,
                    OptionalAsset::Asset(_) => ledger.account_balance(&payer, &payment.asset)?,
                };
                if available < payment.amount {
                    return Err(Error::InsufficientPayment {
                        asset: payment.asset,
                        available,
                        required: payment.amount,
                    });
                }
                ledger.add_balance_delta(caller, payment.asset, -payment.amount)?;
                ledger.add_balance_delta(dapp, payment.asset, payment.amount)?;
            }
        }
        debug!(
            %caller,
            %dapp,
            payments = payments.len(),
            depth = self.invocation_count(),
            "entering nested invocation"
        );

        let mut child = self.clone();
        child.this = Some(This::Address(dapp));
        child.invocation = Some(invocation);
        child.choose_size_check(version);
        Ok(child)
    }
}
