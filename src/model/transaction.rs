//! External transaction records and their conversion into typed form.
//!
//! Upstream collaborators hand the engine transactions with every numeric field
//! encoded as a decimal string. [`RawTransaction`] is that wire shape;
//! [`RawTransaction::parse`] converts one row into a [`Transaction`], surfacing
//! per-field errors instead of silently zeroing malformed input.

use crate::errors::{ParseError, ParseErrors};
use crate::model::amount::{AssetAmount, FiatAmount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TxType {
    Deposit,
    Buy,
    Sell,
    /// Any type the engine does not account for (withdrawals, transfers, ...).
    Other,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TxCategory {
    Normal,
    Lost,
    Gift,
    Donation,
    /// Unrecognized categories are treated as taxable, like `Normal`.
    Other,
}

impl From<&str> for TxType {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "deposit" => Self::Deposit,
            "buy" => Self::Buy,
            "sell" => Self::Sell,
            _ => Self::Other,
        }
    }
}

impl From<&str> for TxCategory {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Self::Normal,
            "lost" => Self::Lost,
            "gift" => Self::Gift,
            "donation" => Self::Donation,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

/// One transaction as materialized by the external transaction history.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub date: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub category: String,
    pub currency_pair: CurrencyPair,
    pub quantity: String,
    pub total: String,
    pub fiat_quantity: String,
    pub fiat_price: String,
    pub quote_fiat_price: String,
    pub fiat_total: String,
}

/// A fully parsed transaction. Immutable once read.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub date: DateTime<Utc>,
    pub tx_type: TxType,
    pub category: TxCategory,
    pub currency_pair: CurrencyPair,
    pub quantity: AssetAmount,
    pub total: AssetAmount,
    pub fiat_quantity: FiatAmount,
    pub fiat_price: FiatAmount,
    pub quote_fiat_price: FiatAmount,
    pub fiat_total: FiatAmount,
}

impl RawTransaction {
    /// Parse every string-encoded field. `row` is carried into errors so a
    /// caller can point at the offending record.
    pub fn parse(&self, row: usize) -> Result<Transaction, ParseError> {
        let date = DateTime::parse_from_rfc3339(&self.date)
            .map(|date| date.with_timezone(&Utc))
            .map_err(|source| ParseError::Date {
                row,
                value: self.date.clone(),
                source,
            })?;

        Ok(Transaction {
            date,
            tx_type: TxType::from(self.tx_type.as_str()),
            category: TxCategory::from(self.category.as_str()),
            currency_pair: self.currency_pair.clone(),
            quantity: parse_amount(row, "quantity", &self.quantity)?,
            total: parse_amount(row, "total", &self.total)?,
            fiat_quantity: parse_amount(row, "fiatQuantity", &self.fiat_quantity)?,
            fiat_price: parse_amount(row, "fiatPrice", &self.fiat_price)?,
            quote_fiat_price: parse_amount(row, "quoteFiatPrice", &self.quote_fiat_price)?,
            fiat_total: parse_amount(row, "fiatTotal", &self.fiat_total)?,
        })
    }
}

fn parse_amount<T>(row: usize, field: &'static str, value: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = rust_decimal::Error>,
{
    value.parse().map_err(|source| ParseError::Amount {
        row,
        field,
        value: value.to_string(),
        source,
    })
}

/// Parse a batch of raw transactions, preserving input order.
///
/// Fails the whole batch if any row is malformed, reporting every offending
/// field at once.
pub fn parse_all<I>(rows: I) -> Result<Vec<Transaction>, ParseErrors>
where
    I: IntoIterator<Item = RawTransaction>,
{
    let (parsed, errors): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .enumerate()
        .map(|(row, raw)| raw.parse(row))
        .partition(|res| res.is_ok());

    if errors.is_empty() {
        Ok(parsed.into_iter().map(|res| res.unwrap()).collect())
    } else {
        Err(ParseErrors {
            errors: errors.into_iter().map(|res| res.unwrap_err()).collect(),
        })
    }
}
