use serde::{Deserialize, Serialize};

/// Every balance figure of an account in the native token.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FullWavesBalance {
    /// Tokens owned by the account.
    pub regular: i64,
    /// Minimum effective balance over the generating window.
    pub generating: i64,
    /// Tokens spendable right now: regular minus leased out.
    pub available: i64,
    /// Available plus leased in.
    pub effective: i64,
    /// Tokens leased to this account.
    pub lease_in: i64,
    /// Tokens this account leased to others.
    pub lease_out: i64,
}
