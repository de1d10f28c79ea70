//! Ledger effects proposed by a script.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    AssetId, DataEntry, Digest, LeaseId, OptionalAsset, PublicKey, Recipient, RideObject,
    RideValue,
};

/// Moves `amount` of `asset` to `recipient`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TransferAction {
    /// Sender key set upstream; the dApp's own key when absent.
    pub sender: Option<PublicKey>,
    /// Receiving account.
    pub recipient: Recipient,
    /// Amount in the asset's smallest unit.
    pub amount: i64,
    /// Transferred asset.
    pub asset: OptionalAsset,
}

/// Creates a new asset owned by the dApp.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IssueAction {
    /// Id of the new asset.
    pub id: AssetId,
    /// Asset name.
    pub name: String,
    /// Asset description.
    pub description: String,
    /// Initial quantity.
    pub quantity: i64,
    /// Number of decimal places.
    pub decimals: i32,
    /// Whether more may be issued later.
    pub reissuable: bool,
    /// Asset script.
    pub script: Option<Vec<u8>>,
    /// Disambiguates identical issues within one invocation.
    pub nonce: i64,
}

/// Issues more of an existing asset.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ReissueAction {
    /// Reissued asset.
    pub asset_id: AssetId,
    /// Quantity added.
    pub quantity: i64,
    /// Whether the asset stays reissuable afterwards.
    pub reissuable: bool,
}

/// Destroys some quantity of an asset held by the dApp.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BurnAction {
    /// Burned asset.
    pub asset_id: AssetId,
    /// Quantity removed.
    pub quantity: i64,
}

/// Sets or clears fee sponsorship of an asset.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SponsorshipAction {
    /// Sponsored asset.
    pub asset_id: AssetId,
    /// Minimal fee in the asset; `0` cancels sponsorship.
    pub min_fee: i64,
}

/// Leases native tokens to another account.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LeaseAction {
    /// Id of the new lease.
    pub id: LeaseId,
    /// Sender key set upstream; must be the dApp's own key when present.
    pub sender: Option<PublicKey>,
    /// Lessee.
    pub recipient: Recipient,
    /// Leased amount.
    pub amount: i64,
    /// Disambiguates identical leases within one invocation.
    pub nonce: i64,
}

/// Cancels a lease started earlier in the same invocation chain.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LeaseCancelAction {
    /// Cancelled lease.
    pub lease_id: LeaseId,
}

/// One proposed ledger effect.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ScriptAction {
    /// Data storage write or delete.
    DataEntry(DataEntry),
    /// Token transfer.
    Transfer(TransferAction),
    /// Asset issue.
    Issue(IssueAction),
    /// Asset reissue.
    Reissue(ReissueAction),
    /// Asset burn.
    Burn(BurnAction),
    /// Sponsorship change.
    Sponsorship(SponsorshipAction),
    /// Lease.
    Lease(LeaseAction),
    /// Lease cancel.
    LeaseCancel(LeaseCancelAction),
}

impl ScriptAction {
    /// Returns the variant tag.
    pub fn kind(&self) -> ActionKind {
        match self {
            ScriptAction::DataEntry(_) => ActionKind::DataEntry,
            ScriptAction::Transfer(_) => ActionKind::Transfer,
            ScriptAction::Issue(_) => ActionKind::Issue,
            ScriptAction::Reissue(_) => ActionKind::Reissue,
            ScriptAction::Burn(_) => ActionKind::Burn,
            ScriptAction::Sponsorship(_) => ActionKind::Sponsorship,
            ScriptAction::Lease(_) => ActionKind::Lease,
            ScriptAction::LeaseCancel(_) => ActionKind::LeaseCancel,
        }
    }
}

/// Variant tag of a [`ScriptAction`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ActionKind {
    /// See [`ScriptAction::DataEntry`].
    DataEntry,
    /// See [`ScriptAction::Transfer`].
    Transfer,
    /// See [`ScriptAction::Issue`].
    Issue,
    /// See [`ScriptAction::Reissue`].
    Reissue,
    /// See [`ScriptAction::Burn`].
    Burn,
    /// See [`ScriptAction::Sponsorship`].
    Sponsorship,
    /// See [`ScriptAction::Lease`].
    Lease,
    /// See [`ScriptAction::LeaseCancel`].
    LeaseCancel,
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            ActionKind::DataEntry => "DataEntry",
            ActionKind::Transfer => "ScriptTransfer",
            ActionKind::Issue => "Issue",
            ActionKind::Reissue => "Reissue",
            ActionKind::Burn => "Burn",
            ActionKind::Sponsorship => "SponsorFee",
            ActionKind::Lease => "Lease",
            ActionKind::LeaseCancel => "LeaseCancel",
        };
        write!(f, "{}", name)
    }
}

/// An accepted action together with the key of the account that performs it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ValidatedAction {
    /// Resolved sender.
    pub sender: PublicKey,
    /// The action itself.
    pub action: ScriptAction,
}

impl ValidatedAction {
    /// Presents the action as a synthetic transaction, the form asset scripts validate.
    pub fn to_ride_object(&self, transaction_id: &Digest, timestamp: u64) -> RideObject {
        let object = match &self.action {
            ScriptAction::DataEntry(entry) => RideObject::new("DataTransaction")
                .with("key", entry.key.as_str())
                .with("value", entry.value.clone()),
            ScriptAction::Transfer(transfer) => RideObject::new("TransferTransaction")
                .with("recipient", transfer.recipient.clone())
                .with("amount", transfer.amount)
                .with("assetId", transfer.asset)
                .with("feeAssetId", OptionalAsset::Waves)
                .with("attachment", Vec::<u8>::new()),
            ScriptAction::Issue(issue) => RideObject::new("IssueTransaction")
                .with("quantity", issue.quantity)
                .with("name", issue.name.as_str())
                .with("description", issue.description.as_str())
                .with("reissuable", issue.reissuable)
                .with("decimals", i64::from(issue.decimals))
                .with("script", issue.script.clone()),
            ScriptAction::Reissue(reissue) => RideObject::new("ReissueTransaction")
                .with("assetId", reissue.asset_id)
                .with("quantity", reissue.quantity)
                .with("reissuable", reissue.reissuable),
            ScriptAction::Burn(burn) => RideObject::new("BurnTransaction")
                .with("assetId", burn.asset_id)
                .with("quantity", burn.quantity),
            ScriptAction::Sponsorship(sponsorship) => {
                RideObject::new("SponsorFeeTransaction")
                    .with("assetId", sponsorship.asset_id)
                    .with("minSponsoredAssetFee", sponsorship.min_fee)
            }
            ScriptAction::Lease(lease) => RideObject::new("LeaseTransaction")
                .with("recipient", lease.recipient.clone())
                .with("amount", lease.amount),
            ScriptAction::LeaseCancel(cancel) => RideObject::new("LeaseCancelTransaction")
                .with("leaseId", cancel.lease_id.digest()),
        };
        object
            .with("id", *transaction_id)
            .with("fee", 0i64)
            .with("timestamp", timestamp)
            .with("version", 0i64)
            .with("senderPublicKey", self.sender)
            .with("bodyBytes", Vec::<u8>::new())
            .with("proofs", RideValue::List(Vec::new()))
    }
}
