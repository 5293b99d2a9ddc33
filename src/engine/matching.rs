//! FIFO lot matching: walking one currency's disposal queue against its
//! acquisition queue, oldest lots first.

use crate::engine::GainStrategy;
use crate::errors::MatchWarning;
use crate::model::amount::AssetAmount;
use crate::model::lot::{AcquisitionLot, DisposalLot};
use crate::model::report::{HoldTerm, LineItem};
use crate::util::fifo::FIFO;
use tracing::debug;

/// One currency's matching output, with line items in emission order.
#[derive(Debug, Default)]
pub(crate) struct CurrencyMatch {
    pub(crate) items: Vec<(HoldTerm, LineItem)>,
    pub(crate) warnings: Vec<MatchWarning>,
}

/// Match every disposal for `currency` against the acquisition queue.
///
/// Disposals are processed strictly in input (date) order. Acquisition lots
/// are consumed from the head; when the head lot overshoots, it is split and
/// the flagged remainder is pushed back to the head, making the carry an
/// ordinary queue entry for the next disposal.
pub(crate) fn match_currency(
    currency: &str,
    mut acquisitions: FIFO<AcquisitionLot>,
    disposals: FIFO<DisposalLot>,
    strategy: GainStrategy,
) -> CurrencyMatch {
    let mut result = CurrencyMatch::default();

    for disposal in disposals {
        let mut outstanding = disposal.quantity;
        let mut segments = Vec::new();

        while outstanding.is_positive() {
            let Some(head) = acquisitions.pop_front() else {
                break;
            };

            if head.quantity <= outstanding {
                outstanding = outstanding - head.quantity;
                segments.push(head);
            } else {
                let split = head.split(outstanding);
                segments.push(split.take);
                acquisitions.push_front(split.leave);
                outstanding = AssetAmount::ZERO;
            }
        }

        if segments.is_empty() {
            debug!(currency, date = %disposal.date, quantity = %disposal.quantity,
                "out of acquisition lots, disposal unmatched");
            result.warnings.push(MatchWarning::Unmatched {
                currency: currency.to_string(),
                date_sold: disposal.date,
                disposed: disposal.quantity,
            });
            continue;
        }

        // A disposal that drains a carried remainder and then reaches into
        // fresh lots reports the two portions as separate line items.
        let split_at = if segments[0].remainder && segments.len() > 1 {
            1
        } else {
            segments.len()
        };
        let (carry_part, fresh_part) = segments.split_at(split_at);

        for group in [carry_part, fresh_part] {
            if group.is_empty() {
                continue;
            }
            result
                .items
                .push(line_item(currency, &disposal, group, strategy));
        }

        if outstanding.is_positive() {
            debug!(currency, date = %disposal.date, unmatched = %outstanding,
                "acquisition queue exhausted mid-disposal");
            result.warnings.push(MatchWarning::PartiallyMatched {
                currency: currency.to_string(),
                date_sold: disposal.date,
                disposed: disposal.quantity,
                unmatched: outstanding,
            });
        }
    }

    result
}

/// Build one line item from a contiguous run of consumed acquisition lots.
///
/// The acquired date is the first consumed lot's date; proceeds are the
/// disposal's recorded sale price when the run covers the whole disposal,
/// otherwise the disposal's unit price times the covered quantity.
fn line_item(
    currency: &str,
    disposal: &DisposalLot,
    consumed: &[AcquisitionLot],
    strategy: GainStrategy,
) -> (HoldTerm, LineItem) {
    let quantity: AssetAmount = consumed.iter().map(|lot| lot.quantity).sum();
    let date_acquired = consumed[0].date;

    let cost_basis = match strategy {
        GainStrategy::SummedCostBasis => consumed.iter().map(|lot| lot.cost_basis).sum(),
        GainStrategy::UnitPriceBasis => consumed
            .iter()
            .map(|lot| lot.unit_price.times(lot.quantity))
            .sum(),
    };

    let proceeds = disposal.proceeds_for(quantity);
    let term = HoldTerm::classify(date_acquired, disposal.date);

    let item = LineItem {
        currency: currency.to_string(),
        description: format!("{quantity} {currency}"),
        date_acquired,
        date_sold: disposal.date,
        proceeds,
        cost_basis,
        gain_or_loss: proceeds - cost_basis,
        adjustment_code: String::new(),
        adjustment_amount: String::new(),
    };

    (term, item)
}
