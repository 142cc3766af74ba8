// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currency catalog, fixed rate table and the pure conversion/formatting engine.
//!
//! Nothing in here touches storage. Unknown currency codes never fail: they
//! convert at parity with the reference currency and render with the raw
//! code standing in for a symbol.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl Currency {
    fn new(code: &str, name: &str, symbol: &str) -> Self {
        Currency {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// The supported currencies, in display order.
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    currencies: Vec<Currency>,
}

impl CurrencyCatalog {
    pub fn new(currencies: Vec<Currency>) -> Self {
        CurrencyCatalog { currencies }
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn find(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }

    pub fn symbol_of<'a>(&'a self, code: &'a str) -> &'a str {
        self.find(code).map(|c| c.symbol.as_str()).unwrap_or(code)
    }

    pub fn name_of<'a>(&'a self, code: &'a str) -> &'a str {
        self.find(code).map(|c| c.name.as_str()).unwrap_or(code)
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.find(code).is_some()
    }
}

impl Default for CurrencyCatalog {
    fn default() -> Self {
        CurrencyCatalog::new(vec![
            Currency::new("USD", "US Dollar", "$"),
            Currency::new("EUR", "Euro", "€"),
            Currency::new("GBP", "British Pound", "£"),
            Currency::new("JPY", "Japanese Yen", "¥"),
            Currency::new("CAD", "Canadian Dollar", "C$"),
            Currency::new("AUD", "Australian Dollar", "A$"),
            Currency::new("CHF", "Swiss Franc", "CHF"),
            Currency::new("CNY", "Chinese Yuan", "¥"),
            Currency::new("SEK", "Swedish Krona", "kr"),
            Currency::new("NZD", "New Zealand Dollar", "NZ$"),
        ])
    }
}

#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("Failed to read rate table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid rate table JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rate for {code} must be positive, got {rate}")]
    NonPositive { code: String, rate: Decimal },
}

/// Units of each currency per one unit of the reference currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    reference: String,
    rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    pub fn new(
        reference: impl Into<String>,
        rates: BTreeMap<String, Decimal>,
    ) -> Result<Self, RateTableError> {
        let table = RateTable {
            reference: reference.into(),
            rates,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn from_json(text: &str) -> Result<Self, RateTableError> {
        let table: RateTable = serde_json::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, RateTableError> {
        let text = std::fs::read_to_string(path).map_err(|source| RateTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), RateTableError> {
        // Division by a rate must never panic.
        for (code, rate) in &self.rates {
            if *rate <= Decimal::ZERO {
                return Err(RateTableError::NonPositive {
                    code: code.clone(),
                    rate: *rate,
                });
            }
        }
        Ok(())
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    /// Rate for `code`, or parity when the table has no entry.
    pub fn rate_of(&self, code: &str) -> Decimal {
        self.get(code).unwrap_or(Decimal::ONE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.rates.iter().map(|(c, r)| (c.as_str(), *r))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let rates = [
            ("USD", Decimal::new(100, 2)),
            ("EUR", Decimal::new(91, 2)),
            ("GBP", Decimal::new(80, 2)),
            ("JPY", Decimal::new(14950, 2)),
            ("CAD", Decimal::new(135, 2)),
            ("AUD", Decimal::new(154, 2)),
            ("CHF", Decimal::new(89, 2)),
            ("CNY", Decimal::new(725, 2)),
            ("SEK", Decimal::new(1085, 2)),
            ("NZD", Decimal::new(165, 2)),
        ]
        .into_iter()
        .map(|(c, r)| (c.to_string(), r))
        .collect();
        RateTable {
            reference: "USD".to_string(),
            rates,
        }
    }
}

/// Result of an exchange preview, with display strings ready to print.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResult {
    pub original_amount: Decimal,
    pub converted_amount: Decimal,
    pub rate: Decimal,
    pub from_currency: String,
    pub to_currency: String,
    pub formatted_original: String,
    pub formatted_converted: String,
    pub formatted_rate: String,
}

/// Conversion and formatting over an injected catalog and rate table.
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    catalog: CurrencyCatalog,
    rates: RateTable,
}

impl Exchange {
    pub fn new(catalog: CurrencyCatalog, rates: RateTable) -> Self {
        Exchange { catalog, rates }
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Normalizes through the reference currency: `amount / rate(from) * rate(to)`.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Decimal {
        if from == to {
            return amount;
        }
        let from_rate = self.rates.rate_of(from);
        let to_rate = self.rates.rate_of(to);
        amount
            .checked_div(from_rate)
            .and_then(|v| v.checked_mul(to_rate))
            .unwrap_or_else(|| saturate(amount))
    }

    /// Units of `to` bought by one unit of `from`.
    pub fn exchange_rate(&self, from: &str, to: &str) -> Decimal {
        // Same arithmetic as convert so the two can never disagree.
        self.convert(Decimal::ONE, from, to)
    }

    pub fn format(&self, amount: Decimal, code: &str) -> String {
        let symbol = self.catalog.symbol_of(code);
        let sign = if amount < Decimal::ZERO { "-" } else { "" };
        let magnitude = amount.abs();
        match code {
            "JPY" => format!("{}{}{}", sign, symbol, group_digits(magnitude, 0)),
            "EUR" => format!("{}{} {}", sign, group_digits(magnitude, 2), symbol),
            _ => format!("{}{}{}", sign, symbol, group_digits(magnitude, 2)),
        }
    }

    pub fn format_exchange_rate(&self, from: &str, to: &str, rate: Option<Decimal>) -> String {
        let rate = rate.unwrap_or_else(|| self.exchange_rate(from, to));
        let rate = rate.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
        format!("1 {} = {:.4} {}", from, rate, to)
    }

    pub fn calculate_exchange_amount(&self, amount: Decimal, from: &str, to: &str) -> ExchangeResult {
        let converted = self.convert(amount, from, to);
        let rate = self.exchange_rate(from, to);
        ExchangeResult {
            original_amount: amount,
            converted_amount: converted,
            rate,
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            formatted_original: self.format(amount, from),
            formatted_converted: self.format(converted, to),
            formatted_rate: self.format_exchange_rate(from, to, Some(rate)),
        }
    }

    /// Formats free-form user input, e.g. `"$1,200.5"`, in `code`.
    pub fn format_input(&self, text: &str, code: &str) -> String {
        self.format(parse_amount(text), code)
    }
}

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.\-]").unwrap());
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(-?)(\d*)\.?(\d*)").unwrap());

// Digits a Decimal mantissa always holds.
const MAX_DIGITS: usize = 28;

/// Strips everything but digits, `.` and `-`, then reads the longest numeric
/// prefix of what is left (`"12-"` is 12, `"1.2.3"` is 1.2). No digits at all
/// reads as zero; magnitudes past the Decimal range saturate.
pub fn parse_amount(text: &str) -> Decimal {
    let cleaned = NON_NUMERIC.replace_all(text, "");
    let Some(caps) = NUMERIC_PREFIX.captures(&cleaned) else {
        return Decimal::ZERO;
    };
    let negative = !caps[1].is_empty();
    let int_part = caps[2].trim_start_matches('0');
    let frac_part = &caps[3];
    if caps[2].is_empty() && frac_part.is_empty() {
        return Decimal::ZERO;
    }

    let overflow = saturate(if negative { -Decimal::ONE } else { Decimal::ONE });
    if int_part.len() > MAX_DIGITS + 1 {
        return overflow;
    }
    let keep = frac_part.len().min(MAX_DIGITS.saturating_sub(int_part.len()));
    let mut literal = String::with_capacity(MAX_DIGITS + 3);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_part.is_empty() { "0" } else { int_part });
    if keep > 0 {
        literal.push('.');
        literal.push_str(&frac_part[..keep]);
    }
    // Only a 29-digit integer part can still overshoot the mantissa here.
    literal.parse::<Decimal>().map(|v| v.normalize()).unwrap_or(overflow)
}

/// `a + b`, clamped to the Decimal range instead of panicking.
pub fn add_saturating(a: Decimal, b: Decimal) -> Decimal {
    // Overflow needs both operands on the same side of zero.
    a.checked_add(b).unwrap_or_else(|| saturate(b))
}

fn saturate(amount: Decimal) -> Decimal {
    if amount < Decimal::ZERO {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// en-US digit grouping of a non-negative value with `dp` fixed decimals.
fn group_digits(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", dp as usize, rounded);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}
