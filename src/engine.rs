//! The FIFO capital-gains engine.
//!
//! [`run`] consumes an already-materialized, date-ordered transaction history
//! and a report window end, and returns a [`Report`] of short- and long-term
//! line items plus matcher diagnostics. The engine performs no I/O; currencies
//! are matched in parallel because their queues are fully independent.

pub use self::classify::FiatSet;
use self::classify::LotBook;
use self::matching::match_currency;
use crate::model::report::{HoldTerm, Report};
use crate::model::transaction::Transaction;
use chrono::{DateTime, Utc};
use rayon::prelude::*;

pub mod classify;
mod matching;

/// Which cost-basis formula produces a line item's gain.
///
/// The two formulas disagree whenever a lot's recorded cost basis differs from
/// its unit price times its quantity. Both are kept as named strategies; the
/// default is canonical.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum GainStrategy {
    /// Basis is the sum of consumed lots' recorded cost bases, prorated on a
    /// split. Conserves total basis across a lot's lifetime.
    #[default]
    SummedCostBasis,

    /// Basis is each consumed lot's unit price times the consumed quantity.
    UnitPriceBasis,
}

/// Caller-supplied engine configuration.
#[derive(Clone, Debug, Default)]
pub struct GainConfig {
    pub fiat: FiatSet,
    pub strategy: GainStrategy,
}

/// Run the engine over a date-ordered transaction history.
///
/// Only transactions dated at or before `window_end` are considered; no lower
/// bound is applied, since all prior history feeds the FIFO queues. The result
/// is deterministic: equal inputs yield byte-identical serialized reports.
pub fn run(
    transactions: &[Transaction],
    window_end: DateTime<Utc>,
    config: &GainConfig,
) -> Report {
    let mut book = LotBook::build(transactions, window_end, &config.fiat);

    // Sorted currency list, queues moved out per currency. Collecting the
    // parallel results preserves this order, so the fold below is stable.
    let queues: Vec<_> = book
        .currencies()
        .into_iter()
        .map(|currency| {
            let acquisitions = book.acquisitions.remove(&currency).unwrap_or_default();
            let disposals = book.disposals.remove(&currency).unwrap_or_default();
            (currency, acquisitions, disposals)
        })
        .collect();

    let matches: Vec<_> = queues
        .into_par_iter()
        .map(|(currency, acquisitions, disposals)| {
            match_currency(&currency, acquisitions, disposals, config.strategy)
        })
        .collect();

    let mut report = Report::default();
    for matched in matches {
        for (term, item) in matched.items {
            match term {
                HoldTerm::Short => report.short_term_holds.push(item),
                HoldTerm::Long => report.long_term_holds.push(item),
            }
        }
        report.warnings.extend(matched.warnings);
    }

    report.sort();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::transaction::{CurrencyPair, TxCategory, TxType};
    use chrono::{Duration, TimeZone as _};
    use rust_decimal_macros::dec;
    use similar_asserts::assert_eq;
    use tracing_test::traced_test;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn deposit(n: i64, base: &str, quantity: &str, fiat_total: &str) -> Transaction {
        let quantity: crate::model::AssetAmount = quantity.parse().unwrap();
        let fiat_total: crate::model::FiatAmount = fiat_total.parse().unwrap();
        Transaction {
            date: day(n),
            tx_type: TxType::Deposit,
            category: TxCategory::Normal,
            currency_pair: CurrencyPair {
                base: base.to_string(),
                quote: "USD".to_string(),
            },
            quantity,
            total: quantity,
            fiat_quantity: fiat_total,
            fiat_price: fiat_total,
            quote_fiat_price: dec!(1).into(),
            fiat_total,
        }
    }

    fn sell(n: i64, base: &str, quantity: &str, unit_price: &str, proceeds: &str) -> Transaction {
        Transaction {
            date: day(n),
            tx_type: TxType::Sell,
            category: TxCategory::Normal,
            currency_pair: CurrencyPair {
                base: base.to_string(),
                quote: "USD".to_string(),
            },
            quantity: quantity.parse().unwrap(),
            total: proceeds.parse().unwrap(),
            fiat_quantity: proceeds.parse().unwrap(),
            fiat_price: unit_price.parse().unwrap(),
            quote_fiat_price: unit_price.parse().unwrap(),
            fiat_total: proceeds.parse().unwrap(),
        }
    }

    #[test]
    #[traced_test]
    fn deposit_and_sell_produce_one_short_term_item() {
        let transactions = vec![
            deposit(0, "BTC", "1", "10000"),
            sell(10, "BTC", "1", "12000", "12000"),
        ];

        let report = run(&transactions, day(30), &GainConfig::default());

        assert!(report.warnings.is_empty());
        assert!(report.long_term_holds.is_empty());
        assert_eq!(report.short_term_holds.len(), 1);

        let item = &report.short_term_holds[0];
        assert_eq!(item.proceeds.to_string(), "12000.00");
        assert_eq!(item.cost_basis.to_string(), "10000.00");
        assert_eq!(item.gain_or_loss.to_string(), "2000.00");
    }

    #[test]
    fn sale_after_a_year_lands_in_long_term() {
        let transactions = vec![
            deposit(0, "BTC", "1", "10000"),
            sell(365, "BTC", "1", "12000", "12000"),
        ];

        let report = run(&transactions, day(400), &GainConfig::default());
        assert!(report.short_term_holds.is_empty());
        assert_eq!(report.long_term_holds.len(), 1);
    }

    #[test]
    fn window_end_excludes_later_sales() {
        let transactions = vec![
            deposit(0, "BTC", "1", "10000"),
            sell(50, "BTC", "1", "12000", "12000"),
        ];

        let report = run(&transactions, day(30), &GainConfig::default());
        assert!(report.short_term_holds.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn unmatched_disposal_surfaces_as_warning() {
        let transactions = vec![sell(10, "BTC", "1", "12000", "12000")];

        let report = run(&transactions, day(30), &GainConfig::default());
        assert!(report.short_term_holds.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0]
            .to_string()
            .contains("no acquisition lots"));
    }

    #[test]
    fn report_is_byte_identical_across_runs() {
        let transactions = vec![
            deposit(0, "BTC", "1", "10000"),
            deposit(1, "ETH", "10", "15000"),
            sell(5, "ETH", "4", "2000", "8000"),
            sell(10, "BTC", "0.25", "12000", "3000"),
            sell(12, "ETH", "8", "2500", "20000"),
        ];
        let config = GainConfig::default();

        let first = run(&transactions, day(30), &config);
        let second = run(&transactions, day(30), &config);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn raw_transactions_flow_end_to_end() {
        let raw = |date: &str, tx_type: &str| crate::model::RawTransaction {
            date: date.to_string(),
            tx_type: tx_type.to_string(),
            category: "normal".to_string(),
            currency_pair: CurrencyPair {
                base: "BTC".to_string(),
                quote: "USD".to_string(),
            },
            quantity: "1".to_string(),
            total: "12000".to_string(),
            fiat_quantity: "12000".to_string(),
            fiat_price: "10000".to_string(),
            quote_fiat_price: "12000".to_string(),
            fiat_total: "12000".to_string(),
        };

        let transactions = crate::model::parse_all(vec![
            raw("2023-01-01T00:00:00Z", "deposit"),
            raw("2023-01-11T00:00:00Z", "sell"),
        ])
        .unwrap();

        let report = run(&transactions, day(30), &GainConfig::default());
        assert_eq!(report.short_term_holds.len(), 1);
        assert_eq!(report.short_term_holds[0].proceeds.to_string(), "12000.00");
    }

    #[test]
    fn buckets_sort_by_date_sold_with_currency_tiebreak() {
        let transactions = vec![
            deposit(0, "BTC", "1", "10000"),
            deposit(0, "ETH", "10", "15000"),
            sell(10, "ETH", "10", "2000", "20000"),
            sell(10, "BTC", "1", "12000", "12000"),
        ];

        let report = run(&transactions, day(30), &GainConfig::default());
        let order: Vec<_> = report
            .short_term_holds
            .iter()
            .map(|item| item.currency.as_str())
            .collect();
        assert_eq!(order, vec!["BTC", "ETH"]);
    }
}
