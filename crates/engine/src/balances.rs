//! Net balance accumulation.
//!
//! Replays a list of expenses over a [`Roster`] and produces the net position
//! of every participant: positive when the group owes them money, negative
//! when they owe the group.
//!
//! Ids outside the roster never create entries. An expense whose payer (or
//! settlement receiver) is unknown is skipped entirely, and unknown ids in an
//! explicit split are dropped from the group, so the balances always sum to
//! zero.

use indexmap::IndexMap;

use crate::{Amount, Expense, ExpenseKind, ParticipantId, Roster, SplitGroup, Transfer};

/// Roster-ordered map from participant id to net balance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Balances {
    entries: IndexMap<ParticipantId, Amount>,
}

impl Balances {
    /// Zero balance for every roster participant.
    pub fn new(roster: &Roster) -> Self {
        Self {
            entries: roster.ids().map(|id| (id.clone(), Amount::ZERO)).collect(),
        }
    }

    /// Computes net balances from scratch, applying expenses in input order.
    pub fn accumulate(roster: &Roster, expenses: &[Expense]) -> Self {
        let mut balances = Self::new(roster);
        for expense in expenses {
            balances.record(expense);
        }
        balances
    }

    /// Applies a single expense. Returns `false` when the expense was skipped.
    ///
    /// The split group is drawn from the participants these balances were
    /// built for, so every debit has a matching credit.
    pub fn record(&mut self, expense: &Expense) -> bool {
        let payer = expense.payer();
        let amount = expense.amount();

        match expense.kind() {
            ExpenseKind::Personal => false,
            ExpenseKind::Settlement { receiver } => {
                if !self.entries.contains_key(payer) || !self.entries.contains_key(receiver) {
                    tracing::warn!(
                        payer = %payer,
                        receiver = %receiver,
                        "skipping settlement between unknown participants"
                    );
                    return false;
                }
                self.adjust(payer, amount);
                self.adjust(receiver, -amount);
                true
            }
            ExpenseKind::Shared { split } => {
                if !self.entries.contains_key(payer) {
                    tracing::warn!(payer = %payer, "skipping shared expense with unknown payer");
                    return false;
                }

                if let SplitGroup::Members(members) = split {
                    for member in members.iter().filter(|id| !self.entries.contains_key(*id)) {
                        tracing::warn!(member = %member, "ignoring unknown split member");
                    }
                }

                let group: Vec<ParticipantId> = self
                    .entries
                    .keys()
                    .filter(|id| split.includes(id))
                    .cloned()
                    .collect();
                if group.is_empty() {
                    tracing::warn!(payer = %payer, "skipping shared expense with empty split group");
                    return false;
                }

                let share = amount.split(group.len());
                self.adjust(payer, amount);
                for member in &group {
                    self.adjust(member, -share);
                }
                true
            }
        }
    }

    /// Applies a completed transfer: the debtor pays the creditor.
    pub fn apply(&mut self, transfer: &Transfer) {
        self.adjust(&transfer.from, transfer.amount);
        self.adjust(&transfer.to, -transfer.amount);
    }

    fn adjust(&mut self, id: &ParticipantId, delta: Amount) {
        if let Some(balance) = self.entries.get_mut(id) {
            *balance += delta;
        }
    }

    pub fn get(&self, id: &ParticipantId) -> Option<Amount> {
        self.entries.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Amount)> + '_ {
        self.entries.iter().map(|(id, amount)| (id, *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero, up to float drift, for any ledger.
    pub fn total(&self) -> Amount {
        self.entries.values().copied().sum()
    }
}

impl FromIterator<(ParticipantId, Amount)> for Balances {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Amount)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
