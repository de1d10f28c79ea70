//! Validation of the actions a dApp proposes and their application to the diff ledger.
//!
//! A batch is processed in order. Each accepted action is folded into the [`DiffLedger`] before the
//! next one is validated, so later actions observe the effects of earlier ones. The first rejected
//! action aborts the batch; the effects of the actions before it are left in the overlay and the
//! caller is expected to discard the overlay together with the failed invocation.
mod counters;

use tracing::{debug, trace, warn};

use ride_storage::{
    diff_ledger::{LeaseRecord, NewAsset},
    DiffLedger, LedgerReader,
};
use ride_types::{
    Address, AssetId, AssetInfo, BurnAction, DataEntry, IssueAction, LeaseAction,
    LeaseCancelAction, LibraryVersion, OptionalAsset, PublicKey, Recipient, ReissueAction,
    Scheme, ScriptAction, SponsorshipAction, TransferAction, ValidatedAction,
};

pub use self::counters::ActionCounters;
use crate::{
    engine_config::EngineConfig,
    execution::{ActionError, Error},
};

/// How the length of a data key is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySizeRule {
    /// UTF-16 code units, capped by `max_key_size_utf16`. Empty keys are allowed.
    Utf16,
    /// UTF-8 bytes, capped by `max_key_size_bytes`. Empty keys are rejected.
    Bytes,
}

impl KeySizeRule {
    /// Checks `key` against the rule.
    pub fn check(self, key: &str, config: &EngineConfig) -> Result<(), ActionError> {
        let (length, max) = match self {
            KeySizeRule::Utf16 => (key.encode_utf16().count(), config.max_key_size_utf16),
            KeySizeRule::Bytes => {
                if key.is_empty() {
                    return Err(ActionError::EmptyKey);
                }
                (key.len(), config.max_key_size_bytes)
            }
        };
        if length > max {
            return Err(ActionError::KeyTooLong { length, max });
        }
        Ok(())
    }
}

/// Rules derived from the library version of the dApp whose actions are validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationRestrictions {
    /// Whether a transfer from an account to itself is rejected.
    pub disable_self_transfers: bool,
    /// How data keys are measured.
    pub key_size_rule: KeySizeRule,
    /// Chain the addresses belong to.
    pub scheme: Scheme,
    /// The dApp producing the actions.
    pub callee: Address,
}

impl ValidationRestrictions {
    /// Derives the restrictions for a dApp at `callee` written for `version`.
    pub fn new(version: LibraryVersion, scheme: Scheme, callee: Address) -> Self {
        let modern = version >= LibraryVersion::V4;
        ValidationRestrictions {
            disable_self_transfers: modern,
            key_size_rule: if modern {
                KeySizeRule::Bytes
            } else {
                KeySizeRule::Utf16
            },
            scheme,
            callee,
        }
    }
}

/// Validates actions of one dApp and folds them into a diff ledger.
pub struct ActionApplier<'a, R> {
    ledger: &'a mut DiffLedger<R>,
    restrictions: ValidationRestrictions,
    config: &'a EngineConfig,
    callee_public_key: PublicKey,
}

impl<'a, R: LedgerReader> ActionApplier<'a, R> {
    /// Creates an applier. Fails if the public key of the callee is unknown to the ledger.
    pub fn new(
        ledger: &'a mut DiffLedger<R>,
        restrictions: ValidationRestrictions,
        config: &'a EngineConfig,
    ) -> Result<Self, Error> {
        let callee_public_key = ledger.reader().script_public_key(&restrictions.callee)?;
        Ok(ActionApplier {
            ledger,
            restrictions,
            config,
            callee_public_key,
        })
    }

    /// Validates and applies `actions` in order, returning them with their senders resolved.
    pub fn apply(&mut self, actions: &[ScriptAction]) -> Result<Vec<ValidatedAction>, Error> {
        let mut counters = ActionCounters::default();
        let mut validated = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let (sender, next) = self.apply_action(action, counters).map_err(|error| {
                warn!(index, kind = %action.kind(), %error, "rejected script action");
                Error::Action {
                    index,
                    kind: action.kind(),
                    error,
                }
            })?;
            trace!(index, kind = %action.kind(), %sender, "applied script action");
            counters = next;
            validated.push(ValidatedAction {
                sender,
                action: action.clone(),
            });
        }
        debug!(
            callee = %self.restrictions.callee,
            actions = counters.actions,
            data_entries = counters.data_entries,
            "applied action batch"
        );
        Ok(validated)
    }

    /// Validates and applies one action given the counters of the actions before it. Returns the
    /// resolved sender and the updated counters.
    pub fn apply_action(
        &mut self,
        action: &ScriptAction,
        counters: ActionCounters,
    ) -> Result<(PublicKey, ActionCounters), ActionError> {
        let counters = match action {
            ScriptAction::DataEntry(entry) => counters.count_data_entry(entry, self.config)?,
            _ => counters.count_action(self.config)?,
        };
        let sender = match action {
            ScriptAction::DataEntry(entry) => self.apply_data_entry(entry)?,
            ScriptAction::Transfer(transfer) => self.apply_transfer(transfer)?,
            ScriptAction::Issue(issue) => self.apply_issue(issue)?,
            ScriptAction::Reissue(reissue) => self.apply_reissue(reissue)?,
            ScriptAction::Burn(burn) => self.apply_burn(burn)?,
            ScriptAction::Sponsorship(sponsorship) => self.apply_sponsorship(sponsorship)?,
            ScriptAction::Lease(lease) => self.apply_lease(lease)?,
            ScriptAction::LeaseCancel(cancel) => self.apply_lease_cancel(cancel)?,
        };
        Ok((sender, counters))
    }

    fn callee(&self) -> Address {
        self.restrictions.callee
    }

    fn apply_data_entry(&mut self, entry: &DataEntry) -> Result<PublicKey, ActionError> {
        self.restrictions
            .key_size_rule
            .check(&entry.key, self.config)?;
        self.ledger
            .put_data_entry(self.callee(), &entry.key, entry.value.clone());
        Ok(self.callee_public_key)
    }

    fn apply_transfer(&mut self, transfer: &TransferAction) -> Result<PublicKey, ActionError> {
        if transfer.amount < 0 {
            return Err(ActionError::NegativeAmount(transfer.amount));
        }
        if let OptionalAsset::Asset(asset_id) = &transfer.asset {
            self.existing_asset(asset_id)?;
        }
        let (sender_public_key, sender) = match transfer.sender {
            Some(key) if key != self.callee_public_key => {
                (key, Address::from_public_key(self.restrictions.scheme, &key))
            }
            _ => (self.callee_public_key, self.callee()),
        };
        let recipient = self.resolve(&transfer.recipient)?;
        if self.restrictions.disable_self_transfers && sender == recipient {
            return Err(ActionError::SelfTransfer(sender));
        }

        let available = self.available_balance(sender, &transfer.asset)?;
        if available < transfer.amount {
            return Err(ActionError::InsufficientBalance {
                asset: transfer.asset,
                available,
                required: transfer.amount,
            });
        }
        self.ledger
            .add_balance_delta(sender, transfer.asset, -transfer.amount)?;
        self.ledger
            .add_balance_delta(recipient, transfer.asset, transfer.amount)?;
        Ok(sender_public_key)
    }

    fn apply_issue(&mut self, issue: &IssueAction) -> Result<PublicKey, ActionError> {
        if issue.quantity < 0 {
            return Err(ActionError::NegativeQuantity(issue.quantity));
        }
        if !(0..=self.config.max_decimals).contains(&issue.decimals) {
            return Err(ActionError::InvalidDecimals(issue.decimals));
        }
        let decimals =
            u8::try_from(issue.decimals).map_err(|_| ActionError::InvalidDecimals(issue.decimals))?;
        let name_length = issue.name.len();
        if name_length < self.config.min_asset_name_length
            || name_length > self.config.max_asset_name_length
        {
            return Err(ActionError::InvalidNameLength(name_length));
        }
        if issue.description.len() > self.config.max_asset_description_length {
            return Err(ActionError::DescriptionTooLong(issue.description.len()));
        }
        if self.ledger.new_asset(&issue.id).is_some() {
            return Err(ActionError::DuplicateIssue(issue.id));
        }

        let issuer = self.callee();
        self.ledger.put_new_asset(
            issue.id,
            NewAsset {
                issuer,
                name: issue.name.clone(),
                description: issue.description.clone(),
                quantity: issue.quantity,
                decimals,
                reissuable: issue.reissuable,
                script: issue.script.clone(),
                nonce: issue.nonce,
            },
        );
        self.ledger
            .add_balance_delta(issuer, OptionalAsset::Asset(issue.id), issue.quantity)?;
        Ok(self.callee_public_key)
    }

    fn apply_reissue(&mut self, reissue: &ReissueAction) -> Result<PublicKey, ActionError> {
        if reissue.quantity < 0 {
            return Err(ActionError::NegativeQuantity(reissue.quantity));
        }
        let info = self.existing_asset(&reissue.asset_id)?;
        self.check_issuer(&info)?;
        if !info.reissuable {
            return Err(ActionError::NotReissuable(reissue.asset_id));
        }
        self.ledger
            .reissue(reissue.asset_id, reissue.quantity, reissue.reissuable)?;
        self.ledger.add_balance_delta(
            self.callee(),
            OptionalAsset::Asset(reissue.asset_id),
            reissue.quantity,
        )?;
        Ok(self.callee_public_key)
    }

    fn apply_burn(&mut self, burn: &BurnAction) -> Result<PublicKey, ActionError> {
        if burn.quantity < 0 {
            return Err(ActionError::NegativeQuantity(burn.quantity));
        }
        self.existing_asset(&burn.asset_id)?;
        let asset = OptionalAsset::Asset(burn.asset_id);
        let available = self
            .ledger
            .account_balance(&Recipient::Address(self.callee()), &asset)?;
        if available < burn.quantity {
            return Err(ActionError::InsufficientBalance {
                asset,
                available,
                required: burn.quantity,
            });
        }
        self.ledger.burn(burn.asset_id, burn.quantity)?;
        self.ledger
            .add_balance_delta(self.callee(), asset, -burn.quantity)?;
        Ok(self.callee_public_key)
    }

    fn apply_sponsorship(
        &mut self,
        sponsorship: &SponsorshipAction,
    ) -> Result<PublicKey, ActionError> {
        if sponsorship.min_fee < 0 {
            return Err(ActionError::NegativeMinFee(sponsorship.min_fee));
        }
        let info = self.existing_asset(&sponsorship.asset_id)?;
        self.check_issuer(&info)?;
        self.ledger
            .set_sponsorship(sponsorship.asset_id, sponsorship.min_fee);
        Ok(self.callee_public_key)
    }

    fn apply_lease(&mut self, lease: &LeaseAction) -> Result<PublicKey, ActionError> {
        if lease.amount < 0 {
            return Err(ActionError::NegativeAmount(lease.amount));
        }
        if self.ledger.lease(&lease.id).is_some() {
            return Err(ActionError::DuplicateLease(lease.id));
        }
        if let Some(key) = lease.sender.filter(|key| *key != self.callee_public_key) {
            return Err(ActionError::ForeignLeaseSender(key));
        }
        let sender = self.callee();
        let recipient = self.resolve(&lease.recipient)?;
        if sender == recipient {
            return Err(ActionError::SelfLease(sender));
        }

        let available = self.available_balance(sender, &OptionalAsset::Waves)?;
        if available < lease.amount {
            return Err(ActionError::InsufficientBalance {
                asset: OptionalAsset::Waves,
                available,
                required: lease.amount,
            });
        }
        self.ledger.add_lease_delta(sender, 0, lease.amount)?;
        self.ledger.add_lease_delta(recipient, lease.amount, 0)?;
        self.ledger.put_lease(
            lease.id,
            LeaseRecord {
                sender,
                recipient,
                amount: lease.amount,
            },
        );
        Ok(self.callee_public_key)
    }

    fn apply_lease_cancel(
        &mut self,
        cancel: &LeaseCancelAction,
    ) -> Result<PublicKey, ActionError> {
        let lease = *self
            .ledger
            .lease(&cancel.lease_id)
            .ok_or(ActionError::LeaseNotFound(cancel.lease_id))?;
        if lease.sender != self.callee() {
            return Err(ActionError::LeaseOwnerMismatch {
                lease_id: cancel.lease_id,
                address: self.callee(),
            });
        }
        self.ledger.add_lease_delta(lease.sender, 0, -lease.amount)?;
        self.ledger
            .add_lease_delta(lease.recipient, -lease.amount, 0)?;
        self.ledger.take_lease(&cancel.lease_id);
        Ok(self.callee_public_key)
    }

    fn resolve(&self, recipient: &Recipient) -> Result<Address, ActionError> {
        Ok(self.ledger.reader().resolve_recipient(recipient)?)
    }

    fn existing_asset(&self, asset_id: &AssetId) -> Result<AssetInfo, ActionError> {
        match self.ledger.asset_info(asset_id) {
            Ok(info) => Ok(info),
            Err(error) if self.ledger.reader().is_not_found(&error) => {
                Err(ActionError::InvalidAsset(*asset_id))
            }
            Err(error) => Err(error.into()),
        }
    }

    fn check_issuer(&self, info: &AssetInfo) -> Result<(), ActionError> {
        if info.issuer != self.callee() {
            return Err(ActionError::NotIssuer {
                asset_id: info.id,
                address: self.callee(),
            });
        }
        Ok(())
    }

    fn available_balance(
        &mut self,
        address: Address,
        asset: &OptionalAsset,
    ) -> Result<i64, ActionError> {
        let account = Recipient::Address(address);
        let available = match asset {
            OptionalAsset::Waves => self.ledger.full_waves_balance(&account)?.available,
            OptionalAsset::Asset(_) => self.ledger.account_balance(&account, asset)?,
        };
        Ok(available)
    }
}
