//! Value types shared by the RIDE execution-state layer: identifiers, balances, assets, data
//! entries, script actions and the object views scripts read.

#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]

pub mod action;
mod address;
mod asset;
mod balance;
mod block;
pub mod crypto;
mod data_entry;
mod error;
mod lease;
mod library_version;
mod ride_value;
mod script_result;
pub mod transaction;

pub use action::{
    ActionKind, BurnAction, IssueAction, LeaseAction, LeaseCancelAction, ReissueAction,
    ScriptAction, SponsorshipAction, TransferAction, ValidatedAction,
};
pub use address::{Address, Alias, Recipient, Scheme, ADDRESS_LENGTH};
pub use asset::{AssetId, AssetInfo, FullAssetInfo, OptionalAsset};
pub use balance::FullWavesBalance;
pub use block::BlockInfo;
pub use crypto::{Digest, PublicKey};
pub use data_entry::{DataEntry, DataValue};
pub use error::Error;
pub use lease::LeaseId;
pub use library_version::LibraryVersion;
pub use ride_value::{RideObject, RideValue};
pub use script_result::ScriptResult;
pub use transaction::{AttachedPayment, Invocation, InvokeScriptTransaction, Order, OrderType};
