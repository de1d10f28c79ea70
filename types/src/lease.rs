use std::fmt::{self, Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Digest, Recipient};

/// Identifier of a lease.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeaseId(Digest);

impl LeaseId {
    /// Wraps a digest as a lease id.
    pub const fn new(digest: Digest) -> Self {
        LeaseId(digest)
    }

    /// Derives the id of a lease started from a script.
    pub fn for_lease(
        transaction_id: &Digest,
        recipient: &Recipient,
        amount: i64,
        nonce: i64,
    ) -> Self {
        let mut preimage = Vec::new();
        preimage.extend(transaction_id.as_ref());
        match recipient {
            Recipient::Address(address) => preimage.extend(address.as_ref()),
            Recipient::Alias(alias) => preimage.extend(alias.name().as_bytes()),
        }
        preimage.extend(&amount.to_be_bytes());
        preimage.extend(&nonce.to_be_bytes());
        LeaseId(Digest::hash(preimage))
    }

    /// Returns the underlying digest.
    pub fn digest(&self) -> Digest {
        self.0
    }
}

impl Display for LeaseId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for LeaseId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "LeaseId({})", self.0)
    }
}
