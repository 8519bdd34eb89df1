//! Expense primitives.
//!
//! An [`Expense`] is a single financial event fronted by one participant. What
//! it does to balances depends on its [`ExpenseKind`]:
//!
//! - `Shared`: the cost is split evenly across a [`SplitGroup`].
//! - `Personal`: the payer's own cost, never part of the settlement.
//! - `Settlement`: a payment already made from the payer to one receiver.
//!
//! Amounts must already be normalized to the trip's base currency.

use serde::{Deserialize, Serialize};

use crate::{Amount, ParticipantId, ResultEngine, util::validate_expense_amount};

/// Participants a shared expense is divided among.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitGroup {
    /// Every participant in the roster, payer included.
    #[default]
    Everyone,
    /// An explicit subset of the roster.
    Members(Vec<ParticipantId>),
}

impl SplitGroup {
    /// Builds a group from an optional id list: missing or empty means everyone.
    pub fn from_ids(ids: Option<Vec<ParticipantId>>) -> Self {
        match ids {
            Some(ids) if !ids.is_empty() => SplitGroup::Members(ids),
            _ => SplitGroup::Everyone,
        }
    }

    pub fn includes(&self, id: &ParticipantId) -> bool {
        match self {
            SplitGroup::Everyone => true,
            SplitGroup::Members(members) => members.contains(id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpenseKind {
    Shared { split: SplitGroup },
    Personal,
    Settlement { receiver: ParticipantId },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    payer: ParticipantId,
    amount: Amount,
    kind: ExpenseKind,
}

impl Expense {
    /// Builds an expense, rejecting negative or non-finite amounts.
    pub fn new(
        payer: impl Into<ParticipantId>,
        amount: impl Into<Amount>,
        kind: ExpenseKind,
    ) -> ResultEngine<Self> {
        Ok(Self {
            payer: payer.into(),
            amount: validate_expense_amount(amount.into())?,
            kind,
        })
    }

    pub fn shared(
        payer: impl Into<ParticipantId>,
        amount: impl Into<Amount>,
        split: SplitGroup,
    ) -> ResultEngine<Self> {
        Self::new(payer, amount, ExpenseKind::Shared { split })
    }

    pub fn personal(payer: impl Into<ParticipantId>, amount: impl Into<Amount>) -> ResultEngine<Self> {
        Self::new(payer, amount, ExpenseKind::Personal)
    }

    pub fn settlement(
        payer: impl Into<ParticipantId>,
        receiver: impl Into<ParticipantId>,
        amount: impl Into<Amount>,
    ) -> ResultEngine<Self> {
        Self::new(
            payer,
            amount,
            ExpenseKind::Settlement {
                receiver: receiver.into(),
            },
        )
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn kind(&self) -> &ExpenseKind {
        &self.kind
    }
}
