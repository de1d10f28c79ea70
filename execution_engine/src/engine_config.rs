//! Support for runtime configuration of the execution layer: the protocol limits enforced while
//! actions are validated and invocations are chained.
use datasize::DataSize;
use serde::{Deserialize, Serialize};

/// Default maximum number of non-data actions in one batch.
pub const DEFAULT_MAX_SCRIPT_ACTIONS: usize = 10;
/// Default maximum number of data entries in one batch.
pub const DEFAULT_MAX_DATA_ENTRIES: usize = 100;
/// Default maximum cumulative size in bytes of the data entries of one batch.
pub const DEFAULT_MAX_DATA_PAYLOAD_SIZE: usize = 5 * 1024;
/// Default maximum data key length in UTF-16 code units, used before library version 4.
pub const DEFAULT_MAX_KEY_SIZE_UTF16: usize = 100;
/// Default maximum data key length in bytes, used from library version 4.
pub const DEFAULT_MAX_KEY_SIZE_BYTES: usize = 400;
/// Default minimum asset name length in bytes.
pub const DEFAULT_MIN_ASSET_NAME_LENGTH: usize = 4;
/// Default maximum asset name length in bytes.
pub const DEFAULT_MAX_ASSET_NAME_LENGTH: usize = 16;
/// Default maximum asset description length in bytes.
pub const DEFAULT_MAX_ASSET_DESCRIPTION_LENGTH: usize = 1000;
/// Default maximum number of asset decimals.
pub const DEFAULT_MAX_DECIMALS: i32 = 8;
/// Default maximum number of payments attached to one invocation.
pub const DEFAULT_MAX_ATTACHED_PAYMENTS: usize = 10;
/// Default message length limit in bytes, applied from library version 3.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 32 * 1024;
/// Default number of effective balance samples retained per account.
pub const DEFAULT_GENERATING_BALANCE_DEPTH: usize = 1000;
/// Default maximum number of dApp invocations in one chain.
pub const DEFAULT_MAX_INVOCATIONS: u32 = 100;

/// The runtime configuration of the execution layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DataSize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of non-data actions in one batch.
    pub max_script_actions: usize,
    /// Maximum number of data entries in one batch.
    pub max_data_entries: usize,
    /// Maximum cumulative size in bytes of the data entries of one batch.
    pub max_data_payload_size: usize,
    /// Maximum data key length in UTF-16 code units.
    pub max_key_size_utf16: usize,
    /// Maximum data key length in bytes.
    pub max_key_size_bytes: usize,
    /// Minimum asset name length in bytes.
    pub min_asset_name_length: usize,
    /// Maximum asset name length in bytes.
    pub max_asset_name_length: usize,
    /// Maximum asset description length in bytes.
    pub max_asset_description_length: usize,
    /// Maximum number of asset decimals.
    pub max_decimals: i32,
    /// Maximum number of payments attached to one invocation.
    pub max_attached_payments: usize,
    /// Message length limit in bytes for scripts of library version 3 and later.
    pub max_message_length: usize,
    /// Number of effective balance samples retained per account.
    pub generating_balance_depth: usize,
    /// Maximum number of dApp invocations in one chain.
    pub max_invocations: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_script_actions: DEFAULT_MAX_SCRIPT_ACTIONS,
            max_data_entries: DEFAULT_MAX_DATA_ENTRIES,
            max_data_payload_size: DEFAULT_MAX_DATA_PAYLOAD_SIZE,
            max_key_size_utf16: DEFAULT_MAX_KEY_SIZE_UTF16,
            max_key_size_bytes: DEFAULT_MAX_KEY_SIZE_BYTES,
            min_asset_name_length: DEFAULT_MIN_ASSET_NAME_LENGTH,
            max_asset_name_length: DEFAULT_MAX_ASSET_NAME_LENGTH,
            max_asset_description_length: DEFAULT_MAX_ASSET_DESCRIPTION_LENGTH,
            max_decimals: DEFAULT_MAX_DECIMALS,
            max_attached_payments: DEFAULT_MAX_ATTACHED_PAYMENTS,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            generating_balance_depth: DEFAULT_GENERATING_BALANCE_DEPTH,
            max_invocations: DEFAULT_MAX_INVOCATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_should_take_defaults() {
        let config: EngineConfig = toml::from_str("max_script_actions = 30").unwrap();
        assert_eq!(config.max_script_actions, 30);
        assert_eq!(config.max_data_entries, DEFAULT_MAX_DATA_ENTRIES);
        assert_eq!(config.max_message_length, DEFAULT_MAX_MESSAGE_LENGTH);
        assert_eq!(config.generating_balance_depth, 1000);
    }

    #[test]
    fn unknown_fields_should_be_rejected() {
        assert!(toml::from_str::<EngineConfig>("max_gas = 1").is_err());
    }
}
