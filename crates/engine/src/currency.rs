use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Amount, EngineError, ResultEngine};

/// ISO currency code of a trip and of the amounts recorded in its ledger.
///
/// A trip has one **base** currency. Entries recorded in another currency are
/// converted with [`ExchangeRates`] before they reach the settlement engine.
///
/// ## Minor units
///
/// `minor_units()` returns how many decimal digits the currency uses. The
/// smallest payable amount, `10^-minor_units`, is the natural settlement
/// tolerance for a trip in that currency (see
/// [`Settler::for_currency`](crate::Settler::for_currency)).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Vnd,
    Thb,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Vnd => "VND",
            Currency::Thb => "THB",
            Currency::Usd => "USD",
        }
    }

    /// Number of fraction digits used when formatting amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Vnd => 0,
            Currency::Thb | Currency::Usd => 2,
        }
    }

    /// Smallest payable amount in this currency.
    #[must_use]
    pub fn minimum_unit(self) -> Amount {
        match self {
            Currency::Vnd => Amount::new(1.0),
            Currency::Thb | Currency::Usd => Amount::new(0.01),
        }
    }

    /// Formats an amount with the currency's precision, e.g. `50000 VND`.
    #[must_use]
    pub fn format(self, amount: Amount) -> String {
        format!(
            "{:.*} {}",
            usize::from(self.minor_units()),
            amount,
            self.code()
        )
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "VND" => Ok(Currency::Vnd),
            "THB" => Ok(Currency::Thb),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

/// Conversion table into a trip's base currency.
///
/// Each rate is the number of base units one unit of the keyed currency is
/// worth (e.g. `THB -> 720.0` for a VND trip).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRates(HashMap<Currency, f64>);

impl ExchangeRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rate. Rates must be finite and strictly positive.
    pub fn with_rate(mut self, currency: Currency, rate: f64) -> ResultEngine<Self> {
        validate_rate(currency, rate)?;
        self.0.insert(currency, rate);
        Ok(self)
    }

    pub fn rate(&self, currency: Currency) -> Option<f64> {
        self.0.get(&currency).copied()
    }

    /// Validates every stored rate; used after deserialization.
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        for (currency, rate) in &self.0 {
            validate_rate(*currency, *rate)?;
        }
        Ok(())
    }

    /// Converts `amount`, expressed in `from`, into `base`.
    pub fn normalize(&self, amount: Amount, from: Currency, base: Currency) -> ResultEngine<Amount> {
        if from == base {
            return Ok(amount);
        }
        let rate = self.rate(from).ok_or_else(|| missing_rate(from, base))?;
        Ok(amount.scale(rate))
    }

    /// Converts `amount` from `from` into `to`, going through `base`.
    pub fn convert(
        &self,
        amount: Amount,
        from: Currency,
        to: Currency,
        base: Currency,
    ) -> ResultEngine<Amount> {
        let in_base = self.normalize(amount, from, base)?;
        if to == base {
            return Ok(in_base);
        }
        let rate = self.rate(to).ok_or_else(|| missing_rate(to, base))?;
        Ok(Amount::new(in_base.value() / rate))
    }
}

fn missing_rate(from: Currency, base: Currency) -> EngineError {
    EngineError::CurrencyMismatch(format!(
        "missing exchange rate from {} to {}",
        from.code(),
        base.code()
    ))
}

fn validate_rate(currency: Currency, rate: f64) -> ResultEngine<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(EngineError::CurrencyMismatch(format!(
            "invalid exchange rate for {}: {rate}",
            currency.code()
        )));
    }
    Ok(())
}
