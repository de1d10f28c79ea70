//! Execution error and supporting code.
use thiserror::Error;

use ride_storage::ledger;
use ride_types::{ActionKind, Address, AssetId, LeaseId, OptionalAsset, PublicKey};

/// Broad classes of action validation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A count or size limit was exceeded.
    LimitExceeded,
    /// A financial or structural rule was broken.
    InvariantViolation,
    /// An address, alias, public key or asset could not be resolved.
    ResolutionFailure,
    /// The merged ledger view became inconsistent.
    ConsistencyFailure,
}

/// Reasons a single action is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    /// Too many non-data actions in the batch.
    #[error("Too many script actions: max {max}")]
    TooManyActions {
        /// The limit.
        max: usize,
    },
    /// Too many data entries in the batch.
    #[error("Too many data entries: max {max}")]
    TooManyDataEntries {
        /// The limit.
        max: usize,
    },
    /// The cumulative data payload is too large.
    #[error("Data payload of {size} bytes exceeds {max}")]
    DataPayloadTooLarge {
        /// Payload size including the rejected entry.
        size: usize,
        /// The limit.
        max: usize,
    },
    /// A data key is too long.
    #[error("Key of length {length} exceeds {max}")]
    KeyTooLong {
        /// Key length under the active counting rule.
        length: usize,
        /// The limit.
        max: usize,
    },
    /// A data key is empty.
    #[error("Empty keys are not allowed")]
    EmptyKey,
    /// A negative amount.
    #[error("Negative amount: {0}")]
    NegativeAmount(i64),
    /// A negative asset quantity.
    #[error("Negative quantity: {0}")]
    NegativeQuantity(i64),
    /// A negative sponsorship fee.
    #[error("Negative minimal sponsored fee: {0}")]
    NegativeMinFee(i64),
    /// Asset decimals out of bounds.
    #[error("Invalid decimals: {0}")]
    InvalidDecimals(i32),
    /// Asset name length out of bounds.
    #[error("Invalid asset name length: {0}")]
    InvalidNameLength(usize),
    /// Asset description too long.
    #[error("Asset description too long: {0}")]
    DescriptionTooLong(usize),
    /// The asset was already issued in this chain.
    #[error("Asset {0} is already issued")]
    DuplicateIssue(AssetId),
    /// The asset does not exist.
    #[error("Invalid asset {0}")]
    InvalidAsset(AssetId),
    /// A transfer to the sender itself.
    #[error("Transfer to self from {0} is not allowed")]
    SelfTransfer(Address),
    /// A lease to the sender itself.
    #[error("Lease to self from {0} is not allowed")]
    SelfLease(Address),
    /// A lease may only be started from the dApp's own account.
    #[error("Lease sender {0} is not the dApp")]
    ForeignLeaseSender(PublicKey),
    /// The sender cannot cover the amount.
    #[error("Insufficient {asset} balance: available {available}, required {required}")]
    InsufficientBalance {
        /// The asset.
        asset: OptionalAsset,
        /// Available balance.
        available: i64,
        /// Required amount.
        required: i64,
    },
    /// Only the issuer may perform this operation.
    #[error("Asset {asset_id} was not issued by {address}")]
    NotIssuer {
        /// The asset.
        asset_id: AssetId,
        /// The acting dApp.
        address: Address,
    },
    /// The asset is not reissuable.
    #[error("Asset {0} is not reissuable")]
    NotReissuable(AssetId),
    /// A lease id is already taken.
    #[error("Lease {0} already exists")]
    DuplicateLease(LeaseId),
    /// The lease was not started in this chain.
    #[error("Lease {0} not found")]
    LeaseNotFound(LeaseId),
    /// The lease belongs to another account.
    #[error("Lease {lease_id} is not owned by {address}")]
    LeaseOwnerMismatch {
        /// The lease.
        lease_id: LeaseId,
        /// The acting dApp.
        address: Address,
    },
    /// A ledger lookup missed.
    #[error("Resolution failed: {0}")]
    Resolution(ledger::Error),
    /// Merging the overlay failed.
    #[error("Inconsistent ledger: {0}")]
    Consistency(ledger::Error),
}

impl ActionError {
    /// Returns the class of the failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::TooManyActions { .. }
            | ActionError::TooManyDataEntries { .. }
            | ActionError::DataPayloadTooLarge { .. }
            | ActionError::KeyTooLong { .. } => ErrorKind::LimitExceeded,
            ActionError::EmptyKey
            | ActionError::NegativeAmount(_)
            | ActionError::NegativeQuantity(_)
            | ActionError::NegativeMinFee(_)
            | ActionError::InvalidDecimals(_)
            | ActionError::InvalidNameLength(_)
            | ActionError::DescriptionTooLong(_)
            | ActionError::DuplicateIssue(_)
            | ActionError::InvalidAsset(_)
            | ActionError::SelfTransfer(_)
            | ActionError::SelfLease(_)
            | ActionError::ForeignLeaseSender(_)
            | ActionError::InsufficientBalance { .. }
            | ActionError::NotIssuer { .. }
            | ActionError::NotReissuable(_)
            | ActionError::DuplicateLease(_)
            | ActionError::LeaseNotFound(_)
            | ActionError::LeaseOwnerMismatch { .. } => ErrorKind::InvariantViolation,
            ActionError::Resolution(_) => ErrorKind::ResolutionFailure,
            ActionError::Consistency(_) => ErrorKind::ConsistencyFailure,
        }
    }
}

impl From<ledger::Error> for ActionError {
    fn from(error: ledger::Error) -> Self {
        if error.is_not_found() {
            ActionError::Resolution(error)
        } else {
            ActionError::Consistency(error)
        }
    }
}

/// Possible execution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Ledger error.
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger::Error),
    /// An action of a batch was rejected; the actions before it stay applied.
    #[error("Action #{index} ({kind}) rejected: {error}")]
    Action {
        /// Position of the action in its batch.
        index: usize,
        /// Variant of the action.
        kind: ActionKind,
        /// Why it was rejected.
        error: ActionError,
    },
    /// The operation needs a dApp address as `this`.
    #[error("Not in a dApp context")]
    NotInDAppContext,
    /// Too many payments attached to an invocation.
    #[error("Too many attached payments: {count}, max {max}")]
    TooManyPayments {
        /// Number of attached payments.
        count: usize,
        /// The limit.
        max: usize,
    },
    /// A payment with a negative amount.
    #[error("Negative payment amount: {0}")]
    NegativePayment(i64),
    /// A dApp attached payments to a call of itself.
    #[error("DApp {0} cannot pay itself")]
    SelfPayment(Address),
    /// The caller cannot cover an attached payment.
    #[error("Insufficient {asset} balance for payment: available {available}, required {required}")]
    InsufficientPayment {
        /// Paid asset.
        asset: OptionalAsset,
        /// Available balance of the caller.
        available: i64,
        /// Payment amount.
        required: i64,
    },
    /// The invocation chain is too long.
    #[error("Too many invocations: max {max}")]
    TooManyInvocations {
        /// The limit.
        max: u32,
    },
}

impl Error {
    /// Class of the underlying action failure, if this is one.
    pub fn action_error_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Action { error, .. } => Some(error.kind()),
            _ => None,
        }
    }
}
