//! Transaction classification: turning each transaction into zero, one, or two
//! lot events on the per-currency FIFO queues.

use crate::model::lot::{AcquisitionLot, DisposalLot};
use crate::model::transaction::{Transaction, TxCategory, TxType};
use crate::util::fifo::FIFO;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::trace;

/// Capability check for "is this symbol a recognized fiat currency?".
///
/// Supplied by the caller; the default set covers the majors. Symbols compare
/// case-insensitively.
#[derive(Clone, Debug)]
pub struct FiatSet {
    codes: HashSet<String>,
}

/// Non-taxable categories (lost, gift, donation) are skipped; unrecognized
/// categories are taxable, like `Normal`.
fn is_taxable(category: TxCategory) -> bool {
    !matches!(
        category,
        TxCategory::Lost | TxCategory::Gift | TxCategory::Donation
    )
}

impl Default for FiatSet {
    fn default() -> Self {
        Self::new(["USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD"])
    }
}

impl FiatSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|code| code.as_ref().to_ascii_uppercase())
                .collect(),
        }
    }

    pub fn is_fiat(&self, symbol: &str) -> bool {
        self.codes.contains(&symbol.to_ascii_uppercase())
    }
}

/// Per-currency acquisition and disposal queues, populated in transaction
/// date order. Each currency's queues are independent of every other's.
#[derive(Debug, Default)]
pub(crate) struct LotBook {
    pub(crate) acquisitions: HashMap<String, FIFO<AcquisitionLot>>,
    pub(crate) disposals: HashMap<String, FIFO<DisposalLot>>,
}

impl LotBook {
    /// Classify a date-ordered transaction stream into lot queues.
    ///
    /// Transactions after `window_end` are skipped; there is no lower bound,
    /// because all history feeds the FIFO queues. Non-taxable categories
    /// (lost, gift, donation) and unrecognized types are skipped.
    pub(crate) fn build(
        transactions: &[Transaction],
        window_end: DateTime<Utc>,
        fiat: &FiatSet,
    ) -> Self {
        let mut book = Self::default();

        for tx in transactions {
            if tx.date > window_end {
                trace!(date = %tx.date, "skipping transaction after report window");
                continue;
            }
            if !is_taxable(tx.category) {
                trace!(category = ?tx.category, date = %tx.date, "skipping non-taxable transaction");
                continue;
            }

            let base = tx.currency_pair.base.as_str();
            let quote = tx.currency_pair.quote.as_str();

            match tx.tx_type {
                TxType::Deposit => {
                    book.acquire(AcquisitionLot {
                        date: tx.date,
                        currency: base.to_string(),
                        quantity: tx.quantity,
                        unit_price: tx.fiat_price,
                        cost_basis: tx.fiat_total,
                        remainder: false,
                    });
                }
                TxType::Buy => {
                    book.acquire(AcquisitionLot {
                        date: tx.date,
                        currency: base.to_string(),
                        quantity: tx.quantity,
                        unit_price: tx.quote_fiat_price,
                        cost_basis: tx.fiat_total,
                        remainder: false,
                    });

                    // A buy paid with another cryptocurrency also disposes of
                    // the quote asset.
                    if !fiat.is_fiat(quote) {
                        book.dispose(DisposalLot {
                            date: tx.date,
                            currency: quote.to_string(),
                            quantity: tx.total,
                            unit_price: tx.quote_fiat_price,
                            sale_price: tx.fiat_quantity,
                            cost_basis: tx.fiat_total,
                        });
                    }
                }
                TxType::Sell => {
                    book.dispose(DisposalLot {
                        date: tx.date,
                        currency: base.to_string(),
                        quantity: tx.quantity,
                        unit_price: tx.quote_fiat_price,
                        sale_price: tx.fiat_quantity,
                        cost_basis: tx.fiat_total,
                    });

                    // A sell simultaneously acquires the quote asset.
                    book.acquire(AcquisitionLot {
                        date: tx.date,
                        currency: quote.to_string(),
                        quantity: tx.total,
                        unit_price: tx.quote_fiat_price.times(tx.total),
                        cost_basis: tx.fiat_total,
                        remainder: false,
                    });
                }
                TxType::Other => {
                    trace!(date = %tx.date, "skipping unrecognized transaction type");
                }
            }
        }

        book
    }

    fn acquire(&mut self, lot: AcquisitionLot) {
        if !lot.quantity.is_positive() {
            trace!(currency = %lot.currency, date = %lot.date, "dropping empty acquisition lot");
            return;
        }
        self.acquisitions
            .entry(lot.currency.clone())
            .or_default()
            .append_back(lot);
    }

    fn dispose(&mut self, lot: DisposalLot) {
        if !lot.quantity.is_positive() {
            trace!(currency = %lot.currency, date = %lot.date, "dropping empty disposal lot");
            return;
        }
        self.disposals
            .entry(lot.currency.clone())
            .or_default()
            .append_back(lot);
    }

    /// Every currency with at least one lot on either side, in sorted order
    /// so downstream processing is deterministic.
    pub(crate) fn currencies(&self) -> Vec<String> {
        self.acquisitions
            .keys()
            .chain(self.disposals.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
