use ride_types::DataEntry;

use crate::{engine_config::EngineConfig, execution::ActionError};

/// Running totals of one action batch, checked against the configured limits.
///
/// Counters are plain values: each step consumes the totals so far and returns the next ones, so a
/// rejected action leaves the caller's totals untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionCounters {
    /// Number of non-data actions.
    pub actions: usize,
    /// Number of data entries.
    pub data_entries: usize,
    /// Cumulative payload size of the data entries in bytes.
    pub data_size: usize,
}

impl ActionCounters {
    /// Counts one non-data action.
    pub fn count_action(self, config: &EngineConfig) -> Result<Self, ActionError> {
        let actions = self.actions + 1;
        if actions > config.max_script_actions {
            return Err(ActionError::TooManyActions {
                max: config.max_script_actions,
            });
        }
        Ok(ActionCounters { actions, ..self })
    }

    /// Counts one data entry and its payload.
    pub fn count_data_entry(
        self,
        entry: &DataEntry,
        config: &EngineConfig,
    ) -> Result<Self, ActionError> {
        let data_entries = self.data_entries + 1;
        if data_entries > config.max_data_entries {
            return Err(ActionError::TooManyDataEntries {
                max: config.max_data_entries,
            });
        }
        let data_size = self.data_size.saturating_add(entry.payload_size());
        if data_size > config.max_data_payload_size {
            return Err(ActionError::DataPayloadTooLarge {
                size: data_size,
                max: config.max_data_payload_size,
            });
        }
        Ok(ActionCounters {
            data_entries,
            data_size,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use ride_types::DataValue;

    use super::*;

    #[test]
    fn should_stop_at_action_limit() {
        let config = EngineConfig {
            max_script_actions: 2,
            ..EngineConfig::default()
        };
        let counters = ActionCounters::default()
            .count_action(&config)
            .and_then(|counters| counters.count_action(&config))
            .unwrap();
        assert_eq!(counters.actions, 2);
        assert_eq!(
            counters.count_action(&config),
            Err(ActionError::TooManyActions { max: 2 })
        );
    }

    #[test]
    fn data_entries_should_not_count_as_actions() {
        let config = EngineConfig::default();
        let entry = DataEntry::new("key", DataValue::Integer(1));
        let counters = ActionCounters::default()
            .count_data_entry(&entry, &config)
            .unwrap();
        assert_eq!(
            counters,
            ActionCounters {
                actions: 0,
                data_entries: 1,
                data_size: 11,
            }
        );
    }

    #[test]
    fn should_reject_oversized_payload() {
        let config = EngineConfig {
            max_data_payload_size: 20,
            ..EngineConfig::default()
        };
        let entry = DataEntry::new("key", DataValue::Binary(vec![0; 10]));
        let counters = ActionCounters::default()
            .count_data_entry(&entry, &config)
            .unwrap();
        assert_eq!(
            counters.count_data_entry(&entry, &config),
            Err(ActionError::DataPayloadTooLarge { size: 26, max: 20 })
        );
    }
}
