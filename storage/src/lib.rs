//! Ledger access for the RIDE execution layer: the read-only query capability over the committed
//! ledger and the overlay that collects the effects of an invocation chain.

#![warn(missing_docs)]

/// Overlay of not-yet-committed effects.
pub mod diff_ledger;
/// Read-only ledger queries.
pub mod ledger;
/// Read-only or overlaid ledger, behind one interface.
pub mod ledger_handle;

pub use diff_ledger::DiffLedger;
pub use ledger::{InMemoryLedger, LedgerReader, LedgerReaderExt};
pub use ledger_handle::LedgerHandle;
