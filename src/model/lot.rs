//! Tax lots: discrete quantities of one currency acquired or disposed of at a
//! specific date and price.

use crate::model::amount::{AssetAmount, FiatAmount};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The two halves of a partially consumed lot.
#[derive(Clone, Debug)]
pub struct Split<T> {
    pub take: T,
    pub leave: T,
}

/// A quantity acquired at a date and price, waiting in its currency's FIFO.
///
/// Quantity is strictly positive for as long as the lot sits in a queue; a
/// fully consumed lot is removed, never left behind at zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AcquisitionLot {
    pub date: DateTime<Utc>,
    pub currency: String,
    pub quantity: AssetAmount,
    /// Fiat per unit at acquisition.
    pub unit_price: FiatAmount,
    /// Fiat total recorded for the whole lot.
    pub cost_basis: FiatAmount,
    /// True when this lot is the unconsumed remainder of an earlier split
    /// (the "carry"). It sits at the head of its queue.
    pub remainder: bool,
}

/// A quantity disposed of, to be matched against acquisition lots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisposalLot {
    pub date: DateTime<Utc>,
    pub currency: String,
    pub quantity: AssetAmount,
    /// Fiat per unit at disposal.
    pub unit_price: FiatAmount,
    /// Fiat proceeds for the lot's full quantity.
    pub sale_price: FiatAmount,
    pub cost_basis: FiatAmount,
}

impl AcquisitionLot {
    /// Split off `take_quantity` units, leaving the rest as a flagged
    /// remainder. Cost basis is divided quantity-proportionally; the leave
    /// side is computed by subtraction so no basis is lost to rounding.
    ///
    /// `take_quantity` must be positive and strictly less than this lot's
    /// quantity; the matcher only splits when the head lot overshoots.
    pub fn split(self, take_quantity: AssetAmount) -> Split<Self> {
        debug_assert!(take_quantity.is_positive());
        debug_assert!(take_quantity < self.quantity);

        let take_basis = self.cost_basis.prorate(take_quantity, self.quantity);

        let take = Self {
            quantity: take_quantity,
            cost_basis: take_basis,
            currency: self.currency.clone(),
            ..self
        };
        let leave = Self {
            quantity: self.quantity - take_quantity,
            cost_basis: self.cost_basis - take_basis,
            remainder: true,
            ..self
        };

        Split { take, leave }
    }
}

impl DisposalLot {
    /// Proceeds attributable to `quantity` units of this disposal.
    ///
    /// The recorded sale price covers the full lot; a partial segment is
    /// valued at the disposal's unit price.
    pub fn proceeds_for(&self, quantity: AssetAmount) -> FiatAmount {
        if quantity == self.quantity {
            self.sale_price
        } else {
            self.unit_price.times(quantity)
        }
    }
}
