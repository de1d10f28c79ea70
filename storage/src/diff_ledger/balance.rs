use std::collections::VecDeque;

use crate::ledger::Error;

/// Not-yet-committed changes to one balance of one account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceDiff {
    regular: i64,
    lease_in: i64,
    lease_out: i64,
    effective_history: VecDeque<i64>,
}

impl BalanceDiff {
    /// Delta of the owned balance.
    pub fn regular(&self) -> i64 {
        self.regular
    }

    /// Delta of tokens leased to the account.
    pub fn lease_in(&self) -> i64 {
        self.lease_in
    }

    /// Delta of tokens the account leased out.
    pub fn lease_out(&self) -> i64 {
        self.lease_out
    }

    /// Effective balances observed while the diff was alive, oldest first.
    pub fn effective_history(&self) -> impl Iterator<Item = &i64> {
        self.effective_history.iter()
    }

    pub(super) fn add_regular(&mut self, delta: i64) -> Result<(), Error> {
        self.regular = checked_add(self.regular, delta, "regular balance")?;
        Ok(())
    }

    pub(super) fn add_lease(&mut self, lease_in: i64, lease_out: i64) -> Result<(), Error> {
        let new_lease_in = checked_add(self.lease_in, lease_in, "lease in")?;
        let new_lease_out = checked_add(self.lease_out, lease_out, "lease out")?;
        self.lease_in = new_lease_in;
        self.lease_out = new_lease_out;
        Ok(())
    }

    /// Appends an effective balance sample, dropping the oldest ones beyond `depth`.
    pub(super) fn record_effective(&mut self, effective: i64, depth: usize) {
        self.effective_history.push_back(effective);
        while self.effective_history.len() > depth.max(1) {
            self.effective_history.pop_front();
        }
    }

    /// Minimum of the retained effective balance samples.
    pub(super) fn min_effective(&self) -> Option<i64> {
        self.effective_history.iter().copied().min()
    }
}

pub(super) fn checked_add(lhs: i64, rhs: i64, what: &'static str) -> Result<i64, Error> {
    lhs.checked_add(rhs).ok_or(Error::Overflow(what))
}
