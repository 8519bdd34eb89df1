//! Group expense settlement engine.
//!
//! Given a trip [`Roster`] and the list of [`Expense`]s recorded by its
//! participants, the engine computes everyone's net [`Balances`] and the
//! pairwise [`Transfer`]s that settle them.
//!
//! ```rust
//! use engine::{Expense, Roster, SplitGroup, calculate_debts};
//!
//! let roster = Roster::from_ids(["x", "y"]).unwrap();
//! let expenses = [Expense::shared("x", 100.0, SplitGroup::Everyone).unwrap()];
//!
//! let transfers = calculate_debts(&roster, &expenses);
//! assert_eq!(transfers.len(), 1);
//! assert_eq!(transfers[0].from.as_str(), "y");
//! assert_eq!(transfers[0].amount.value(), 50.0);
//! ```
//!
//! Everything here is pure: no I/O, no shared state. Recompute whenever the
//! ledger changes.

pub use amount::Amount;
pub use balances::Balances;
pub use currency::{Currency, ExchangeRates};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseKind, SplitGroup};
pub use ledger::{Category, ExpenseType, Ledger, LedgerEntry};
pub use participants::{Participant, ParticipantId, Roster};
pub use settlement::{
    SETTLEMENT_EPSILON, SettlementPlan, Settler, SettlerBuilder, Transfer, calculate_debts,
};
pub use summary::{LedgerSummary, SummaryFilter};

mod amount;
mod balances;
mod currency;
mod error;
mod expenses;
mod ledger;
mod participants;
mod settlement;
mod summary;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
