//! Execution errors.
mod error;

pub use self::error::{ActionError, Error, ErrorKind};
