//! Spending summary of a ledger.
//!
//! Totals per category, per payer and per calendar day, plus the overall total
//! and the average per day. Every amount is expressed in one display currency.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::{
    Amount, Category, Currency, ExpenseType, Ledger, LedgerEntry, ParticipantId, ResultEngine,
};

/// Which records a summary covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SummaryFilter {
    /// Every record, settlements included.
    #[default]
    All,
    Shared,
    Personal,
}

impl SummaryFilter {
    pub fn matches(self, kind: ExpenseType) -> bool {
        match self {
            SummaryFilter::All => true,
            SummaryFilter::Shared => kind == ExpenseType::Shared,
            SummaryFilter::Personal => kind == ExpenseType::Personal,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LedgerSummary {
    pub currency: Currency,
    pub total: Amount,
    /// In order of first appearance.
    pub by_category: IndexMap<Category, Amount>,
    /// Roster members first (starting at zero), then unknown payers as they
    /// appear.
    pub by_payer: IndexMap<ParticipantId, Amount>,
    /// Undated records count towards the totals above but not here.
    pub daily: BTreeMap<NaiveDate, Amount>,
}

impl LedgerSummary {
    fn new(ledger: &Ledger, currency: Currency) -> Self {
        Self {
            currency,
            total: Amount::ZERO,
            by_category: IndexMap::new(),
            by_payer: ledger
                .users
                .iter()
                .map(|user| (user.id.clone(), Amount::ZERO))
                .collect(),
            daily: BTreeMap::new(),
        }
    }

    fn add(&mut self, entry: &LedgerEntry, amount: Amount) {
        self.total += amount;
        *self.by_category.entry(entry.category).or_default() += amount;
        *self.by_payer.entry(entry.payer_id.clone()).or_default() += amount;
        if let Some(date) = entry.date {
            *self.daily.entry(date.date_naive()).or_default() += amount;
        }
    }

    /// Daily spending averaged over the days that have at least one record.
    pub fn average_per_day(&self) -> Amount {
        if self.daily.is_empty() {
            return Amount::ZERO;
        }
        self.daily.values().copied().sum::<Amount>().split(self.daily.len())
    }
}

impl Ledger {
    /// Summarizes the records selected by `filter`, converted into `currency`.
    pub fn summary(&self, filter: SummaryFilter, currency: Currency) -> ResultEngine<LedgerSummary> {
        let mut summary = LedgerSummary::new(self, currency);
        for entry in self.expenses.iter().filter(|entry| filter.matches(entry.kind)) {
            let amount = self.exchange_rates.convert(
                entry.amount,
                entry.currency.unwrap_or(self.base_currency),
                currency,
                self.base_currency,
            )?;
            summary.add(entry, amount);
        }
        tracing::debug!(
            filter = ?filter,
            days = summary.daily.len(),
            total = %summary.total,
            "ledger summarized"
        );
        Ok(summary)
    }
}
