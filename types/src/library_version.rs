use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Version of the RIDE standard library a script was compiled against.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum LibraryVersion {
    /// Version 1.
    V1 = 1,
    /// Version 2.
    V2 = 2,
    /// Version 3, the first with dApps.
    V3 = 3,
    /// Version 4.
    V4 = 4,
    /// Version 5.
    V5 = 5,
    /// Version 6.
    V6 = 6,
}

impl LibraryVersion {
    /// The newest supported version.
    pub const LATEST: LibraryVersion = LibraryVersion::V6;

    /// Returns the numeric version.
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for LibraryVersion {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LibraryVersion::V1),
            2 => Ok(LibraryVersion::V2),
            3 => Ok(LibraryVersion::V3),
            4 => Ok(LibraryVersion::V4),
            5 => Ok(LibraryVersion::V5),
            6 => Ok(LibraryVersion::V6),
            other => Err(Error::UnsupportedLibraryVersion(other)),
        }
    }
}

impl Display for LibraryVersion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "V{}", self.value())
    }
}
