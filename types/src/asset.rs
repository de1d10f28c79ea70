//! Asset identifiers and asset descriptions.

use std::fmt::{self, Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Address, Digest, PublicKey};

/// Identifier of an issued asset.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(Digest);

impl AssetId {
    /// Wraps a digest as an asset id.
    pub const fn new(digest: Digest) -> Self {
        AssetId(digest)
    }

    /// Derives the id of an asset issued from a script.
    ///
    /// Every parameter of the issue takes part in the preimage, so two issues in one transaction
    /// only collide if they are identical including their nonce.
    #[allow(clippy::too_many_arguments)]
    pub fn for_issue(
        transaction_id: &Digest,
        name: &str,
        description: &str,
        decimals: i32,
        quantity: i64,
        reissuable: bool,
        nonce: i64,
    ) -> Self {
        let mut preimage = Vec::with_capacity(
            name.len() + description.len() + 4 + 8 + 1 + 8 + transaction_id.as_ref().len(),
        );
        preimage.extend(name.as_bytes());
        preimage.extend(description.as_bytes());
        preimage.extend(&decimals.to_be_bytes());
        preimage.extend(&quantity.to_be_bytes());
        preimage.push(reissuable as u8);
        preimage.extend(&nonce.to_be_bytes());
        preimage.extend(transaction_id.as_ref());
        AssetId(Digest::hash(preimage))
    }

    /// Returns the underlying digest.
    pub fn digest(&self) -> Digest {
        self.0
    }
}

impl AsRef<[u8]> for AssetId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for AssetId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "AssetId({})", self.0)
    }
}

/// Either the native token or an issued asset.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum OptionalAsset {
    /// The native token.
    Waves,
    /// An issued asset.
    Asset(AssetId),
}

impl OptionalAsset {
    /// Returns the asset id, or `None` for the native token.
    pub fn asset_id(&self) -> Option<&AssetId> {
        match self {
            OptionalAsset::Waves => None,
            OptionalAsset::Asset(asset_id) => Some(asset_id),
        }
    }
}

impl From<AssetId> for OptionalAsset {
    fn from(asset_id: AssetId) -> Self {
        OptionalAsset::Asset(asset_id)
    }
}

impl Display for OptionalAsset {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            OptionalAsset::Waves => write!(f, "WAVES"),
            OptionalAsset::Asset(asset_id) => Display::fmt(asset_id, f),
        }
    }
}

/// Summary of an asset as exposed to scripts.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Asset id.
    pub id: AssetId,
    /// Total quantity in circulation.
    pub quantity: i64,
    /// Number of decimal places.
    pub decimals: u8,
    /// Address of the issuer.
    pub issuer: Address,
    /// Public key of the issuer.
    pub issuer_public_key: PublicKey,
    /// Whether more of the asset may be issued.
    pub reissuable: bool,
    /// Whether the asset carries a script.
    pub scripted: bool,
    /// Whether fees may be paid in this asset.
    pub sponsored: bool,
}

/// Complete description of an asset.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FullAssetInfo {
    /// Summary fields.
    pub info: AssetInfo,
    /// Asset name.
    pub name: String,
    /// Asset description.
    pub description: String,
    /// Minimal fee in this asset when sponsored, otherwise `0`.
    pub sponsorship_cost: i64,
    /// Asset script, if any.
    pub script: Option<Vec<u8>>,
}
