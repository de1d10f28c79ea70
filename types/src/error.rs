use thiserror::Error;

/// Errors raised while constructing or parsing value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A byte slice had the wrong length for the target type.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// An address had an unsupported version byte.
    #[error("Invalid address version: {0}")]
    InvalidAddressVersion(u8),
    /// An address checksum did not match its body.
    #[error("Invalid address checksum")]
    InvalidAddressChecksum,
    /// An alias name was outside the permitted character set or length.
    #[error("Invalid alias: {0}")]
    InvalidAlias(String),
    /// An unknown RIDE library version.
    #[error("Unsupported library version: {0}")]
    UnsupportedLibraryVersion(u8),
}
