//! Hashing primitives and key material.

use std::fmt::{self, Debug, Display, Formatter};

use blake2::{
    digest::{Update, VariableOutput},
    VarBlake2b,
};
use serde::{Deserialize, Serialize};
use sha3::{Digest as _, Keccak256};

use crate::Error;

/// The number of bytes in a [`Digest`].
pub const DIGEST_LENGTH: usize = 32;

/// The number of bytes in a [`PublicKey`].
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Hashes `data` with blake2b-256.
pub fn blake2b<T: AsRef<[u8]>>(data: T) -> [u8; DIGEST_LENGTH] {
    let mut result = [0; DIGEST_LENGTH];
    // NOTE: Assumed safe as `DIGEST_LENGTH` is a valid value for a hasher
    let mut hasher = VarBlake2b::new(DIGEST_LENGTH).expect("should create hasher");

    hasher.update(data);
    hasher.finalize_variable(|slice| {
        result.copy_from_slice(slice);
    });
    result
}

/// Hashes `data` with keccak-256 over blake2b-256, as used for address derivation.
pub fn secure_hash<T: AsRef<[u8]>>(data: T) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Keccak256::new();
    hasher.update(blake2b(data));
    hasher.finalize().into()
}

/// A blake2b-256 digest, used for transaction, asset and lease identifiers.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    /// Constructs a `Digest` from raw bytes.
    pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Digest(bytes)
    }

    /// Hashes `data` into a new `Digest`.
    pub fn hash<T: AsRef<[u8]>>(data: T) -> Self {
        Digest(blake2b(data))
    }

    /// Returns the raw bytes.
    pub fn value(&self) -> [u8; DIGEST_LENGTH] {
        self.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; DIGEST_LENGTH]>::try_from(bytes)
            .map(Digest)
            .map_err(|_| Error::InvalidLength {
                expected: DIGEST_LENGTH,
                actual: bytes.len(),
            })
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", base16::encode_lower(&self.0))
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Digest({})", base16::encode_lower(&self.0))
    }
}

/// An account public key.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Constructs a `PublicKey` from raw bytes.
    pub const fn new(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        PublicKey(bytes)
    }

    /// Returns the raw bytes.
    pub fn value(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes)
            .map(PublicKey)
            .map_err(|_| Error::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            })
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", base16::encode_lower(&self.0))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "PublicKey({})", base16::encode_lower(&self.0))
    }
}
