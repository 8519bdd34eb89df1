use std::{fs::File, io::BufReader, path::PathBuf};

use engine::Ledger;
use settings::Command;

use crate::error::Result;

mod error;
mod export;
mod report;
mod settings;

fn main() -> Result<()> {
    let (settings, command) = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tripsplit={level},engine={level}",
            level = settings.level
        ))
        .init();

    tracing::debug!(ledger = %settings.ledger, "loading ledger");
    let ledger = Ledger::from_reader(BufReader::new(File::open(&settings.ledger)?))?;
    let roster = ledger.roster()?;
    let settler = settings.settler(ledger.base_currency)?;
    let plan = ledger.settle(&settler)?;
    let currency = ledger.base_currency;

    match command {
        Command::Balances => print!("{}", report::balances(&roster, &plan.balances, currency)),
        Command::Settle => print!("{}", report::transfers(&roster, &plan.transfers, currency)),
        Command::Export { out } => {
            let dir = PathBuf::from(out.unwrap_or(settings.export_dir));
            let today = chrono::Local::now().date_naive();
            for path in export::export(&dir, today, &ledger, &roster, &plan.transfers)? {
                println!("{}", path.display());
            }
        }
        Command::Summary { scope, currency: display } => {
            let summary = ledger.summary(scope.into(), display.unwrap_or(currency))?;
            print!("{}", report::summary(&roster, &summary));
        }
    }

    Ok(())
}
