use crate::{
    BurnAction, DataEntry, IssueAction, LeaseAction, LeaseCancelAction, PublicKey,
    ReissueAction, ScriptAction, SponsorshipAction, TransferAction, ValidatedAction,
};

/// The outcome of a successful invocation, grouped by action kind.
///
/// Each group keeps the order in which its actions were produced; transfers and leases keep their
/// resolved sender since it may differ from the dApp.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct ScriptResult {
    /// Data storage writes.
    pub data_entries: Vec<DataEntry>,
    /// Transfers with their senders.
    pub transfers: Vec<(PublicKey, TransferAction)>,
    /// Issues.
    pub issues: Vec<IssueAction>,
    /// Reissues.
    pub reissues: Vec<ReissueAction>,
    /// Burns.
    pub burns: Vec<BurnAction>,
    /// Sponsorship changes.
    pub sponsorships: Vec<SponsorshipAction>,
    /// Leases with their senders.
    pub leases: Vec<(PublicKey, LeaseAction)>,
    /// Lease cancels.
    pub lease_cancels: Vec<LeaseCancelAction>,
}

impl ScriptResult {
    /// Groups validated actions by kind.
    pub fn from_actions<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = ValidatedAction>,
    {
        let mut result = ScriptResult::default();
        for ValidatedAction { sender, action } in actions {
            match action {
                ScriptAction::DataEntry(entry) => result.data_entries.push(entry),
                ScriptAction::Transfer(transfer) => result.transfers.push((sender, transfer)),
                ScriptAction::Issue(issue) => result.issues.push(issue),
                ScriptAction::Reissue(reissue) => result.reissues.push(reissue),
                ScriptAction::Burn(burn) => result.burns.push(burn),
                ScriptAction::Sponsorship(sponsorship) => result.sponsorships.push(sponsorship),
                ScriptAction::Lease(lease) => result.leases.push((sender, lease)),
                ScriptAction::LeaseCancel(cancel) => result.lease_cancels.push(cancel),
            }
        }
        result
    }

    /// Total number of actions.
    pub fn len(&self) -> usize {
        self.data_entries.len()
            + self.transfers.len()
            + self.issues.len()
            + self.reissues.len()
            + self.burns.len()
            + self.sponsorships.len()
            + self.leases.len()
            + self.lease_cancels.len()
    }

    /// Returns `true` if no actions were produced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetId, DataValue, Digest};

    #[test]
    fn should_group_actions_preserving_order() {
        let sender = PublicKey::new([3; 32]);
        let asset_id = AssetId::new(Digest::hash(b"asset"));
        let actions = vec![
            ScriptAction::DataEntry(DataEntry::new("a", DataValue::Integer(1))),
            ScriptAction::Burn(BurnAction {
                asset_id,
                quantity: 5,
            }),
            ScriptAction::DataEntry(DataEntry::delete("b")),
        ]
        .into_iter()
        .map(|action| ValidatedAction { sender, action });

        let result = ScriptResult::from_actions(actions);

        assert_eq!(result.len(), 3);
        assert_eq!(
            result.data_entries,
            vec![
                DataEntry::new("a", DataValue::Integer(1)),
                DataEntry::delete("b")
            ]
        );
        assert_eq!(result.burns.len(), 1);
        assert!(result.transfers.is_empty());
    }
}
