//! Account addresses, aliases and transfer recipients.

use std::fmt::{self, Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{crypto, Error, PublicKey};

/// The chain id byte mixed into every address and alias.
pub type Scheme = u8;

/// The number of bytes in an [`Address`].
pub const ADDRESS_LENGTH: usize = 26;

const ADDRESS_VERSION: u8 = 1;
const HASH_LENGTH: usize = 20;
const CHECKSUM_LENGTH: usize = 4;
const BODY_LENGTH: usize = ADDRESS_LENGTH - CHECKSUM_LENGTH;

/// Minimum number of characters in an alias name.
pub const ALIAS_MIN_LENGTH: usize = 4;
/// Maximum number of characters in an alias name.
pub const ALIAS_MAX_LENGTH: usize = 30;
const ALIAS_ALPHABET: &str = "-.0123456789@_abcdefghijklmnopqrstuvwxyz";

/// An account address: version byte, scheme byte, public key hash and checksum.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Derives the address owned by `public_key` on the chain identified by `scheme`.
    pub fn from_public_key(scheme: Scheme, public_key: &PublicKey) -> Self {
        let key_hash = crypto::secure_hash(public_key);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = ADDRESS_VERSION;
        bytes[1] = scheme;
        bytes[2..BODY_LENGTH].copy_from_slice(&key_hash[..HASH_LENGTH]);
        let checksum = crypto::secure_hash(&bytes[..BODY_LENGTH]);
        bytes[BODY_LENGTH..].copy_from_slice(&checksum[..CHECKSUM_LENGTH]);
        Address(bytes)
    }

    /// Returns the chain id this address belongs to.
    pub fn scheme(&self) -> Scheme {
        self.0[1]
    }

    /// Returns the raw bytes.
    pub fn value(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes =
            <[u8; ADDRESS_LENGTH]>::try_from(bytes).map_err(|_| Error::InvalidLength {
                expected: ADDRESS_LENGTH,
                actual: bytes.len(),
            })?;
        if bytes[0] != ADDRESS_VERSION {
            return Err(Error::InvalidAddressVersion(bytes[0]));
        }
        let checksum = crypto::secure_hash(&bytes[..BODY_LENGTH]);
        if bytes[BODY_LENGTH..] != checksum[..CHECKSUM_LENGTH] {
            return Err(Error::InvalidAddressChecksum);
        }
        Ok(Address(bytes))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", base16::encode_lower(&self.0))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Address({})", base16::encode_lower(&self.0))
    }
}

/// A human-readable name registered for an address.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Alias {
    scheme: Scheme,
    name: String,
}

impl Alias {
    /// Constructs an alias, checking the name's length and alphabet.
    pub fn new(scheme: Scheme, name: &str) -> Result<Self, Error> {
        let length = name.chars().count();
        if !(ALIAS_MIN_LENGTH..=ALIAS_MAX_LENGTH).contains(&length)
            || !name.chars().all(|c| ALIAS_ALPHABET.contains(c))
        {
            return Err(Error::InvalidAlias(name.to_string()));
        }
        Ok(Alias {
            scheme,
            name: name.to_string(),
        })
    }

    /// Returns the chain id.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the alias name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "alias:{}:{}", self.scheme as char, self.name)
    }
}

/// The receiving side of a transfer, lease or payment.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Recipient {
    /// A plain address.
    Address(Address),
    /// An alias that must be resolved against the ledger.
    Alias(Alias),
}

impl Recipient {
    /// Returns the address if no resolution is needed.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Recipient::Address(address) => Some(address),
            Recipient::Alias(_) => None,
        }
    }
}

impl From<Address> for Recipient {
    fn from(address: Address) -> Self {
        Recipient::Address(address)
    }
}

impl From<Alias> for Recipient {
    fn from(alias: Alias) -> Self {
        Recipient::Alias(alias)
    }
}

impl Display for Recipient {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Recipient::Address(address) => Display::fmt(address, f),
            Recipient::Alias(alias) => Display::fmt(alias, f),
        }
    }
}
