//! Debt settlement.
//!
//! Turns net [`Balances`] into a list of [`Transfer`]s that brings every
//! participant back to (approximately) zero.
//!
//! The algorithm is the classic greedy two-pointer walk: debtors sorted from
//! the largest debt, creditors from the largest credit, each step settling
//! `min(debt, credit)` between the current pair. It produces at most
//! `debtors + creditors - 1` transfers. Finding the true minimum number of
//! transfers is NP-hard; the greedy walk can emit an extra hop where two
//! debts happen to match exactly across pairs.

use serde::{Deserialize, Serialize};

use crate::{
    Amount, Balances, Currency, Expense, ParticipantId, ResultEngine, Roster,
    util::validate_epsilon,
};

/// Default tolerance: balances within one unit of zero count as settled.
pub const SETTLEMENT_EPSILON: Amount = Amount::new(1.0);

/// "`from` pays `to` `amount`", in the trip's base currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Amount,
}

/// Net balances together with the transfers that settle them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettlementPlan {
    pub balances: Balances,
    pub transfers: Vec<Transfer>,
}

impl SettlementPlan {
    pub fn is_balanced(&self) -> bool {
        self.transfers.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settler {
    epsilon: Amount,
}

impl Default for Settler {
    fn default() -> Self {
        Self {
            epsilon: SETTLEMENT_EPSILON,
        }
    }
}

impl Settler {
    /// Return a builder for `Settler`.
    pub fn builder() -> SettlerBuilder {
        SettlerBuilder::default()
    }

    /// Settler whose tolerance is the smallest payable amount of `currency`.
    pub fn for_currency(currency: Currency) -> Self {
        Self {
            epsilon: currency.minimum_unit(),
        }
    }

    pub fn epsilon(&self) -> Amount {
        self.epsilon
    }

    /// Accumulates balances and settles them in one go.
    pub fn plan(&self, roster: &Roster, expenses: &[Expense]) -> SettlementPlan {
        let balances = Balances::accumulate(roster, expenses);
        let transfers = self.settle(&balances);
        tracing::debug!(
            participants = balances.len(),
            expenses = expenses.len(),
            transfers = transfers.len(),
            "settlement plan computed"
        );
        SettlementPlan {
            balances,
            transfers,
        }
    }

    /// Computes the transfers that settle `balances`.
    ///
    /// Participants within `epsilon` of zero take no part. Never fails: an
    /// empty or already balanced map yields no transfers.
    pub fn settle(&self, balances: &Balances) -> Vec<Transfer> {
        let epsilon = self.epsilon;

        let mut debtors: Vec<(ParticipantId, Amount)> = balances
            .iter()
            .filter(|(_, amount)| amount.value() < -epsilon.value())
            .map(|(id, amount)| (id.clone(), amount))
            .collect();
        let mut creditors: Vec<(ParticipantId, Amount)> = balances
            .iter()
            .filter(|(_, amount)| amount.value() > epsilon.value())
            .map(|(id, amount)| (id.clone(), amount))
            .collect();

        // Stable sorts: roster order breaks ties.
        debtors.sort_by(|a, b| a.1.total_cmp(&b.1));
        creditors.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut transfers = Vec::new();
        let mut i = 0;
        let mut j = 0;

        while i < debtors.len() && j < creditors.len() {
            let (debtor, debt) = &mut debtors[i];
            let (creditor, credit) = &mut creditors[j];

            let amount = debt.abs().min(*credit);
            if amount.value() > epsilon.value() {
                transfers.push(Transfer {
                    from: debtor.clone(),
                    to: creditor.clone(),
                    amount,
                });
            }

            *debt += amount;
            *credit -= amount;

            if debt.is_settled(epsilon) {
                i += 1;
            }
            if credit.is_settled(epsilon) {
                j += 1;
            }
        }

        transfers
    }
}

#[derive(Debug, Default)]
pub struct SettlerBuilder {
    epsilon: Option<Amount>,
}

impl SettlerBuilder {
    /// Tolerance under which a balance counts as settled.
    pub fn epsilon(mut self, epsilon: impl Into<Amount>) -> SettlerBuilder {
        self.epsilon = Some(epsilon.into());
        self
    }

    /// Tolerance matching the smallest payable amount of `currency`.
    pub fn currency(mut self, currency: Currency) -> SettlerBuilder {
        self.epsilon = Some(currency.minimum_unit());
        self
    }

    /// Construct `Settler`
    pub fn build(self) -> ResultEngine<Settler> {
        let epsilon = match self.epsilon {
            Some(epsilon) => validate_epsilon(epsilon)?,
            None => SETTLEMENT_EPSILON,
        };
        Ok(Settler { epsilon })
    }
}

/// Transfers settling `expenses` over `roster`, with the default tolerance.
pub fn calculate_debts(roster: &Roster, expenses: &[Expense]) -> Vec<Transfer> {
    Settler::default().plan(roster, expenses).transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    fn balances(entries: &[(&str, f64)]) -> Balances {
        entries
            .iter()
            .map(|(id, amount)| (ParticipantId::from(*id), Amount::new(*amount)))
            .collect()
    }

    fn transfer(from: &str, to: &str, amount: f64) -> Transfer {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount: Amount::new(amount),
        }
    }

    #[test]
    fn empty_balances_need_no_transfers() {
        assert!(Settler::default().settle(&Balances::default()).is_empty());
    }

    #[test]
    fn only_creditors_or_only_debtors_need_no_transfers() {
        let settler = Settler::default();
        assert!(settler.settle(&balances(&[("a", 10.0), ("b", 0.0)])).is_empty());
        assert!(settler.settle(&balances(&[("a", -10.0)])).is_empty());
    }

    #[test]
    fn largest_debt_pays_largest_credit_first() {
        let transfers = Settler::default().settle(&balances(&[
            ("a", -10.0),
            ("b", 70.0),
            ("c", -60.0),
            ("d", 0.0),
        ]));
        assert_eq!(
            transfers,
            vec![transfer("c", "b", 60.0), transfer("a", "b", 10.0)]
        );
    }

    #[test]
    fn one_debtor_spreads_over_creditors() {
        let transfers = Settler::default().settle(&balances(&[
            ("a", 30.0),
            ("b", 50.0),
            ("c", -80.0),
        ]));
        assert_eq!(
            transfers,
            vec![transfer("c", "b", 50.0), transfer("c", "a", 30.0)]
        );
    }

    #[test]
    fn ties_keep_roster_order() {
        let transfers = Settler::default().settle(&balances(&[
            ("x", -25.0),
            ("a", 50.0),
            ("y", -25.0),
        ]));
        assert_eq!(
            transfers,
            vec![transfer("x", "a", 25.0), transfer("y", "a", 25.0)]
        );
    }

    #[test]
    fn balances_inside_the_band_are_ignored() {
        let transfers = Settler::default().settle(&balances(&[
            ("a", 0.8),
            ("b", -0.8),
            ("c", 1.0),
            ("d", -1.0),
        ]));
        assert!(transfers.is_empty());
    }

    #[test]
    fn residual_drift_does_not_emit_dust() {
        // 100 / 3 leaves float drift; nothing under one unit is emitted.
        let transfers = Settler::default().settle(&balances(&[
            ("a", 66.666_666_666_666_67),
            ("b", -33.333_333_333_333_33),
            ("c", -33.333_333_333_333_34),
        ]));
        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|t| t.amount.value() > 1.0));
        assert!(transfers.iter().all(|t| t.to.as_str() == "a"));
    }

    #[test]
    fn smaller_epsilon_settles_small_amounts() {
        let entries = balances(&[("a", 0.5), ("b", -0.5)]);
        assert!(Settler::default().settle(&entries).is_empty());

        let settler = Settler::for_currency(Currency::Usd);
        assert_eq!(settler.settle(&entries), vec![transfer("b", "a", 0.5)]);
    }

    #[test]
    fn builder_validates_epsilon() {
        assert_eq!(Settler::builder().build().unwrap(), Settler::default());
        assert_eq!(
            Settler::builder().epsilon(0.01).build().unwrap().epsilon(),
            Amount::new(0.01)
        );
        assert_eq!(
            Settler::builder().currency(Currency::Vnd).build().unwrap(),
            Settler::default()
        );
        assert!(matches!(
            Settler::builder().epsilon(-1.0).build(),
            Err(EngineError::InvalidEpsilon(_))
        ));
        assert!(matches!(
            Settler::builder().epsilon(f64::NAN).build(),
            Err(EngineError::InvalidEpsilon(_))
        ));
    }

    #[test]
    fn zero_epsilon_still_terminates() {
        let settler = Settler::builder().epsilon(0.0).build().unwrap();
        let transfers = settler.settle(&balances(&[("a", 10.0), ("b", -4.0), ("c", -6.0)]));
        assert_eq!(
            transfers,
            vec![transfer("c", "a", 6.0), transfer("b", "a", 4.0)]
        );
    }
}
