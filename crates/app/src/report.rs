//! Plain-text rendering of balances, transfers and spending summaries.

use engine::{Amount, Balances, Currency, LedgerSummary, ParticipantId, Roster, Transfer};

fn name<'a>(roster: &'a Roster, id: &'a ParticipantId) -> &'a str {
    roster
        .get(id)
        .map(|p| p.display_name())
        .unwrap_or(id.as_str())
}

fn signed(amount: Amount, currency: Currency) -> String {
    let sign = if amount.value() > 0.0 { "+" } else { "" };
    format!("{sign}{}", currency.format(amount))
}

pub fn balances(roster: &Roster, balances: &Balances, currency: Currency) -> String {
    balances
        .iter()
        .map(|(id, amount)| format!("{}: {}\n", name(roster, id), signed(amount, currency)))
        .collect()
}

pub fn transfers(roster: &Roster, transfers: &[Transfer], currency: Currency) -> String {
    if transfers.is_empty() {
        return "Everyone is settled up.\n".to_string();
    }

    transfers
        .iter()
        .map(|transfer| {
            format!(
                "{} pays {} {}\n",
                name(roster, &transfer.from),
                name(roster, &transfer.to),
                currency.format(transfer.amount)
            )
        })
        .collect()
}

/// Totals first, then one section per grouping. Days are listed most recent
/// first.
pub fn summary(roster: &Roster, summary: &LedgerSummary) -> String {
    let currency = summary.currency;
    let mut lines = vec![
        format!("Total: {}", currency.format(summary.total)),
        format!("Average per day: {}", currency.format(summary.average_per_day())),
        "By category:".to_string(),
    ];
    let row = |label: &str, amount: Amount| format!("  {label}: {}", currency.format(amount));

    lines.extend(
        summary
            .by_category
            .iter()
            .map(|(category, amount)| row(category.as_str(), *amount)),
    );
    lines.push("By payer:".to_string());
    lines.extend(
        summary
            .by_payer
            .iter()
            .map(|(id, amount)| row(name(roster, id), *amount)),
    );
    lines.push("By day:".to_string());
    lines.extend(
        summary
            .daily
            .iter()
            .rev()
            .map(|(date, amount)| row(&date.format("%Y-%m-%d").to_string(), *amount)),
    );

    lines.iter().map(|line| format!("{line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Ledger, Participant, SummaryFilter};

    fn roster() -> Roster {
        Roster::new(vec![
            Participant::new("u1", "An"),
            Participant::new("u2", "Binh"),
            Participant::new("u3", ""),
        ])
        .unwrap()
    }

    #[test]
    fn renders_signed_balances_in_roster_order() {
        let entries: Balances = [
            (ParticipantId::from("u1"), Amount::new(25_000.0)),
            (ParticipantId::from("u2"), Amount::new(-25_000.0)),
            (ParticipantId::from("u3"), Amount::ZERO),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            balances(&roster(), &entries, Currency::Vnd),
            "An: +25000 VND\nBinh: -25000 VND\nu3: 0 VND\n"
        );
    }

    #[test]
    fn renders_transfers() {
        let pending = [Transfer {
            from: "u2".into(),
            to: "u1".into(),
            amount: Amount::new(12.5),
        }];
        assert_eq!(
            transfers(&roster(), &pending, Currency::Thb),
            "Binh pays An 12.50 THB\n"
        );
        assert_eq!(
            transfers(&roster(), &[], Currency::Thb),
            "Everyone is settled up.\n"
        );
    }

    #[test]
    fn unknown_ids_render_as_is() {
        let pending = [Transfer {
            from: "ghost".into(),
            to: "u1".into(),
            amount: Amount::new(3.0),
        }];
        assert_eq!(
            transfers(&roster(), &pending, Currency::Vnd),
            "ghost pays An 3 VND\n"
        );
    }

    #[test]
    fn renders_summary_sections() {
        let ledger = Ledger::from_json(
            r#"{
                "base_currency": "VND",
                "users": [{ "id": "u1", "name": "An" }, { "id": "u2", "name": "Binh" }],
                "expenses": [
                    {
                        "payer_id": "u1", "amount": 60000.0, "type": "SHARED",
                        "category": "Hotel", "date": "2025-03-01T12:00:00Z"
                    },
                    {
                        "payer_id": "u1", "amount": 20000.0, "type": "SHARED",
                        "category": "Food", "date": "2025-03-02T12:00:00Z"
                    }
                ]
            }"#,
        )
        .unwrap();
        let totals = ledger.summary(SummaryFilter::All, Currency::Vnd).unwrap();

        assert_eq!(
            summary(&roster(), &totals),
            "Total: 80000 VND\n\
             Average per day: 40000 VND\n\
             By category:\n  Hotel: 60000 VND\n  Food: 20000 VND\n\
             By payer:\n  An: 80000 VND\n  Binh: 0 VND\n\
             By day:\n  2025-03-02: 20000 VND\n  2025-03-01: 60000 VND\n"
        );
    }
}
