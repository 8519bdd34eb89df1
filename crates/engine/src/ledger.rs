//! Stored trip ledger.
//!
//! The ledger is the loosely typed shape a trip is persisted in: every expense
//! record carries an optional `split_to` list whose meaning depends on the
//! record `type`. [`Ledger::expenses`] turns those records into typed
//! [`Expense`]s in the trip's base currency, which is what the settlement
//! engine consumes.
//!
//! Settlement records without a receiver are skipped with a warning; they
//! never make the whole ledger unusable.

use std::io::Read;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Amount, Currency, ExchangeRates, Expense, ExpenseKind, Participant, ParticipantId,
    ResultEngine, Roster, SettlementPlan, Settler, SplitGroup,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpenseType {
    Shared,
    Personal,
    Settlement,
}

impl ExpenseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "SHARED",
            Self::Personal => "PERSONAL",
            Self::Settlement => "SETTLEMENT",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Hotel,
    Fun,
    #[default]
    Misc,
    Shopping,
    Nightlife,
    Massage,
    Tours,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Hotel => "Hotel",
            Self::Fun => "Fun",
            Self::Misc => "Misc",
            Self::Shopping => "Shopping",
            Self::Nightlife => "Nightlife",
            Self::Massage => "Massage",
            Self::Tours => "Tours",
        }
    }
}

/// A single expense record as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(default)]
    pub id: String,
    pub payer_id: ParticipantId,
    /// Amount in `currency` (the base currency when absent).
    pub amount: Amount,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(rename = "type")]
    pub kind: ExpenseType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Split members for `SHARED` (absent or empty means everyone), receiver
    /// for `SETTLEMENT` (first id).
    #[serde(default)]
    pub split_to: Option<Vec<ParticipantId>>,
}

impl LedgerEntry {
    /// Typed expense for this record, or `None` for a settlement without a
    /// receiver.
    fn to_expense(&self, amount: Amount) -> ResultEngine<Option<Expense>> {
        let kind = match self.kind {
            ExpenseType::Personal => ExpenseKind::Personal,
            ExpenseType::Shared => ExpenseKind::Shared {
                split: SplitGroup::from_ids(self.split_to.clone()),
            },
            ExpenseType::Settlement => {
                let Some(receiver) = self.split_to.as_ref().and_then(|ids| ids.first()) else {
                    return Ok(None);
                };
                ExpenseKind::Settlement {
                    receiver: receiver.clone(),
                }
            }
        };
        Expense::new(self.payer_id.clone(), amount, kind).map(Some)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_currency: Currency,
    #[serde(default)]
    pub exchange_rates: ExchangeRates,
    #[serde(default)]
    pub users: Vec<Participant>,
    #[serde(default)]
    pub expenses: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn from_json(json: &str) -> ResultEngine<Self> {
        let ledger: Ledger = serde_json::from_str(json)?;
        ledger.exchange_rates.validate()?;
        Ok(ledger)
    }

    pub fn from_reader<R: Read>(reader: R) -> ResultEngine<Self> {
        let ledger: Ledger = serde_json::from_reader(reader)?;
        ledger.exchange_rates.validate()?;
        Ok(ledger)
    }

    pub fn roster(&self) -> ResultEngine<Roster> {
        Roster::new(self.users.clone())
    }

    /// Amount of `entry` converted into the base currency.
    pub fn normalized_amount(&self, entry: &LedgerEntry) -> ResultEngine<Amount> {
        let currency = entry.currency.unwrap_or(self.base_currency);
        self.exchange_rates
            .normalize(entry.amount, currency, self.base_currency)
    }

    /// Typed expenses in the base currency, in ledger order.
    pub fn expenses(&self) -> ResultEngine<Vec<Expense>> {
        let mut expenses = Vec::with_capacity(self.expenses.len());
        for entry in &self.expenses {
            let amount = self.normalized_amount(entry)?;
            match entry.to_expense(amount)? {
                Some(expense) => expenses.push(expense),
                None => tracing::warn!(
                    expense_id = %entry.id,
                    payer = %entry.payer_id,
                    "skipping settlement without receiver"
                ),
            }
        }
        Ok(expenses)
    }

    /// Settles the whole ledger with `settler`.
    pub fn settle(&self, settler: &Settler) -> ResultEngine<SettlementPlan> {
        let roster = self.roster()?;
        let expenses = self.expenses()?;
        Ok(settler.plan(&roster, &expenses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    const TRIP: &str = r#"{
        "name": "Bangkok",
        "base_currency": "VND",
        "exchange_rates": { "THB": 700.0 },
        "users": [
            { "id": "u1", "name": "An" },
            { "id": "u2", "name": "Binh" }
        ],
        "expenses": [
            {
                "id": "e1",
                "payer_id": "u1",
                "amount": 100.0,
                "currency": "THB",
                "type": "SHARED",
                "description": "Street food",
                "category": "Food",
                "date": "2025-03-01T19:30:00Z"
            },
            { "id": "e2", "payer_id": "u2", "amount": 5000.0, "type": "PERSONAL" },
            { "id": "e3", "payer_id": "u2", "amount": 10000.0, "type": "SETTLEMENT", "split_to": ["u1"] },
            { "id": "e4", "payer_id": "u2", "amount": 99999.0, "type": "SETTLEMENT", "split_to": [] }
        ]
    }"#;

    #[test]
    fn parses_stored_trip() {
        let ledger = Ledger::from_json(TRIP).unwrap();
        assert_eq!(ledger.name, "Bangkok");
        assert_eq!(ledger.users.len(), 2);
        assert_eq!(ledger.expenses[0].category, Category::Food);
        assert_eq!(ledger.expenses[1].category, Category::Misc);
        assert_eq!(ledger.expenses[1].currency, None);
        assert!(ledger.expenses[0].date.is_some());
    }

    #[test]
    fn converts_records_into_base_currency() {
        let ledger = Ledger::from_json(TRIP).unwrap();
        let expenses = ledger.expenses().unwrap();

        // The settlement without receiver is dropped.
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[0].amount(), Amount::new(70_000.0));
        assert_eq!(
            expenses[0].kind(),
            &ExpenseKind::Shared {
                split: SplitGroup::Everyone
            }
        );
        assert_eq!(expenses[1].kind(), &ExpenseKind::Personal);
        assert_eq!(
            expenses[2].kind(),
            &ExpenseKind::Settlement {
                receiver: "u1".into()
            }
        );
    }

    #[test]
    fn settles_the_whole_trip() {
        let ledger = Ledger::from_json(TRIP).unwrap();
        let plan = ledger.settle(&Settler::default()).unwrap();

        assert_eq!(plan.balances.get(&"u1".into()), Some(Amount::new(25_000.0)));
        assert_eq!(plan.balances.get(&"u2".into()), Some(Amount::new(-25_000.0)));
        assert_eq!(plan.transfers.len(), 1);
        assert_eq!(plan.transfers[0].from.as_str(), "u2");
        assert_eq!(plan.transfers[0].amount, Amount::new(25_000.0));
    }

    #[test]
    fn missing_rate_is_an_error() {
        let json = r#"{
            "users": [{ "id": "u1" }],
            "expenses": [{ "payer_id": "u1", "amount": 1.0, "currency": "USD", "type": "SHARED" }]
        }"#;
        let ledger = Ledger::from_json(json).unwrap();
        assert!(matches!(
            ledger.expenses(),
            Err(EngineError::CurrencyMismatch(_))
        ));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Ledger::from_json("{ not json"),
            Err(EngineError::InvalidLedger(_))
        ));
        assert!(matches!(
            Ledger::from_json(r#"{ "exchange_rates": { "THB": -1.0 } }"#),
            Err(EngineError::CurrencyMismatch(_))
        ));

        let negative = r#"{
            "users": [{ "id": "u1" }],
            "expenses": [{ "payer_id": "u1", "amount": -5.0, "type": "PERSONAL" }]
        }"#;
        let ledger = Ledger::from_json(negative).unwrap();
        assert!(matches!(
            ledger.expenses(),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn duplicate_users_are_rejected() {
        let json = r#"{ "users": [{ "id": "u1" }, { "id": "u1" }] }"#;
        let ledger = Ledger::from_json(json).unwrap();
        assert_eq!(
            ledger.roster().unwrap_err(),
            EngineError::ExistingKey("u1".to_string())
        );
    }

    #[test]
    fn reads_from_any_reader() {
        let ledger = Ledger::from_reader(TRIP.as_bytes()).unwrap();
        assert_eq!(ledger.base_currency, Currency::Vnd);
        assert_eq!(ledger.exchange_rates.rate(Currency::Thb), Some(700.0));
    }
}
