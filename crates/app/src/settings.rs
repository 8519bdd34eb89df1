//! Settings for the `tripsplit` CLI.
//!
//! Values are layered: defaults, then the optional TOML file
//! (`config/tripsplit.toml` unless `--config` says otherwise), then
//! `TRIPSPLIT_*` environment variables, then command line flags.

use clap::{Parser, Subcommand, ValueEnum};
use engine::{Amount, Currency, Settler, SummaryFilter};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tripsplit.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for the `tripsplit` and `engine` targets.
    pub level: String,
    /// Path of the trip ledger (JSON).
    pub ledger: String,
    /// Settlement tolerance; the base currency's smallest unit when absent.
    pub epsilon: Option<Amount>,
    /// Directory exports are written to.
    pub export_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ledger: "trip.json".to_string(),
            epsilon: None,
            export_dir: ".".to_string(),
        }
    }
}

impl Settings {
    /// Settler configured for a trip in `base_currency`.
    pub fn settler(&self, base_currency: Currency) -> Result<Settler> {
        let builder = match self.epsilon {
            Some(epsilon) => Settler::builder().epsilon(epsilon),
            None => Settler::builder().currency(base_currency),
        };
        Ok(builder.build()?)
    }

    fn apply(&mut self, args: &Args) {
        if let Some(ledger) = &args.ledger {
            self.ledger = ledger.clone();
        }
        if let Some(epsilon) = args.epsilon {
            self.epsilon = Some(epsilon);
        }
        if let Some(level) = &args.level {
            self.level = level.clone();
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tripsplit")]
#[command(about = "Settle shared trip expenses")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the ledger path.
    #[arg(long)]
    ledger: Option<String>,
    /// Override the settlement tolerance (e.g. 0.5 or 0,5).
    #[arg(long, value_parser = parse_amount)]
    epsilon: Option<Amount>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Print every participant's net balance.
    Balances,
    /// Print who pays whom.
    Settle,
    /// Write the expenses and the settlement as CSV files.
    Export {
        /// Output directory (defaults to `export_dir`).
        #[arg(long)]
        out: Option<String>,
    },
    /// Print spending totals per category, payer and day.
    Summary {
        #[arg(long, value_enum, default_value_t = Scope::All)]
        scope: Scope,
        /// Display currency (defaults to the trip's base currency).
        #[arg(long, value_parser = parse_currency)]
        currency: Option<Currency>,
    },
}

/// Records covered by `summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    All,
    Shared,
    Personal,
}

impl From<Scope> for SummaryFilter {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => SummaryFilter::All,
            Scope::Shared => SummaryFilter::Shared,
            Scope::Personal => SummaryFilter::Personal,
        }
    }
}

fn parse_amount(s: &str) -> std::result::Result<Amount, String> {
    s.parse::<Amount>().map_err(|err| err.to_string())
}

fn parse_currency(s: &str) -> std::result::Result<Currency, String> {
    Currency::try_from(s).map_err(|err| err.to_string())
}

pub fn load() -> Result<(Settings, Command)> {
    let args = Args::parse();
    let settings = resolve(&args)?;
    Ok((settings, args.command))
}

fn resolve(args: &Args) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TRIPSPLIT"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    settings.apply(args);
    Ok(settings)
}
