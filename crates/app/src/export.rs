//! CSV export of a trip: the raw expense list and the settlement.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use engine::{Ledger, Roster, Transfer};
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Serialize)]
struct ExpenseRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Payer")]
    payer: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Currency")]
    currency: &'static str,
    #[serde(rename = "Amount (base)")]
    base_amount: f64,
}

#[derive(Debug, Serialize)]
struct TransferRow<'a> {
    #[serde(rename = "From")]
    from: &'a str,
    #[serde(rename = "To")]
    to: &'a str,
    #[serde(rename = "Amount")]
    amount: f64,
}

fn payer_name<'a>(roster: &'a Roster, id: &engine::ParticipantId) -> &'a str {
    roster
        .get(id)
        .map(|p| p.display_name())
        .unwrap_or("Unknown")
}

/// Writes every ledger entry, including personal ones, in ledger order.
pub fn write_expenses<W: Write>(writer: W, ledger: &Ledger, roster: &Roster) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in &ledger.expenses {
        let currency = entry.currency.unwrap_or(ledger.base_currency);
        csv.serialize(ExpenseRow {
            date: entry
                .date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            payer: payer_name(roster, &entry.payer_id),
            description: &entry.description,
            category: entry.category.as_str(),
            kind: entry.kind.as_str(),
            amount: entry.amount.value(),
            currency: currency.code(),
            base_amount: ledger.normalized_amount(entry)?.value(),
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_transfers<W: Write>(writer: W, roster: &Roster, transfers: &[Transfer]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for transfer in transfers {
        csv.serialize(TransferRow {
            from: payer_name(roster, &transfer.from),
            to: payer_name(roster, &transfer.to),
            amount: transfer.amount.value(),
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `trip_expenses_<date>.csv` and `trip_settlement_<date>.csv` into `dir`.
pub fn export(
    dir: &Path,
    date: NaiveDate,
    ledger: &Ledger,
    roster: &Roster,
    transfers: &[Transfer],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let stamp = date.format("%Y-%m-%d");

    let expenses_path = dir.join(format!("trip_expenses_{stamp}.csv"));
    write_expenses(File::create(&expenses_path)?, ledger, roster)?;
    tracing::info!(path = %expenses_path.display(), "expenses exported");

    let settlement_path = dir.join(format!("trip_settlement_{stamp}.csv"));
    write_transfers(File::create(&settlement_path)?, roster, transfers)?;
    tracing::info!(path = %settlement_path.display(), "settlement exported");

    Ok(vec![expenses_path, settlement_path])
}
