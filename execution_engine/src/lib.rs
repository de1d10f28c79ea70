//! The execution-state layer of the RIDE virtual machine.
//!
//! Scripts read the ledger through an [`Environment`](environment::Environment) and propose
//! actions; the [`ActionApplier`](action_applier::ActionApplier) enforces the protocol limits on
//! them and folds the accepted ones into the diff ledger shared by the whole invocation chain.

#![doc(html_root_url = "https://docs.rs/ride-execution-engine/0.1.0")]
#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]

pub mod action_applier;
pub mod config;
pub mod engine_config;
pub mod environment;
pub mod execution;
pub mod logging;

pub use action_applier::{ActionApplier, ActionCounters, KeySizeRule, ValidationRestrictions};
pub use config::Config;
pub use engine_config::EngineConfig;
pub use environment::{Environment, MessageLengthPolicy, This};
pub use execution::{ActionError, Error, ErrorKind};
