//! Capital gains line items and the assembled report.

use crate::errors::MatchWarning;
use crate::model::amount::FiatAmount;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;

/// Holding-period classification with a 365-day boundary.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum HoldTerm {
    Short,
    Long,
}

impl HoldTerm {
    /// Short term iff the holding period is under 365 whole days.
    ///
    /// The duration is truncated to whole days, so a lot sold 364 days and 23
    /// hours after acquisition is still short term.
    pub fn classify(acquired: DateTime<Utc>, sold: DateTime<Utc>) -> Self {
        if (sold - acquired).num_days() < 365 {
            Self::Short
        } else {
            Self::Long
        }
    }
}

/// One taxable event, shaped like a Form 8949 row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineItem {
    pub currency: String,
    /// Human readable, e.g. `"0.5 BTC"`.
    pub description: String,
    pub date_acquired: DateTime<Utc>,
    pub date_sold: DateTime<Utc>,
    pub proceeds: FiatAmount,
    pub cost_basis: FiatAmount,
    pub gain_or_loss: FiatAmount,
    /// Reserved for form adjustments; always empty in this engine.
    pub adjustment_code: String,
    pub adjustment_amount: String,
}

impl Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            r#""{description}","{date_acquired}","{date_sold}","{proceeds}","{cost_basis}","{adjustment_code}","{adjustment_amount}","{gain_or_loss}""#,
            description = self.description,
            date_acquired = self.date_acquired.format("%F"),
            date_sold = self.date_sold.format("%F"),
            proceeds = self.proceeds,
            cost_basis = self.cost_basis,
            adjustment_code = self.adjustment_code,
            adjustment_amount = self.adjustment_amount,
            gain_or_loss = self.gain_or_loss,
        )
    }
}

/// Final report: short- and long-term lines plus matcher diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    pub short_term_holds: Vec<LineItem>,
    pub long_term_holds: Vec<LineItem>,
    pub warnings: Vec<MatchWarning>,
}

impl Report {
    /// Sort both buckets into the report's total order: date sold ascending,
    /// then currency, then date acquired. The sort is stable, so reports are
    /// reproducible run over run.
    pub(crate) fn sort(&mut self) {
        for bucket in [&mut self.short_term_holds, &mut self.long_term_holds] {
            bucket.sort_by(|a, b| {
                (a.date_sold, &a.currency, a.date_acquired)
                    .cmp(&(b.date_sold, &b.currency, b.date_acquired))
            });
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (header, bucket) in [
            ("Short-Term Holds", &self.short_term_holds),
            ("Long-Term Holds", &self.long_term_holds),
        ] {
            writeln!(f, "{header}")?;
            writeln!(
                f,
                concat!(
                    r#""Description","Date Acquired","Date Sold","Proceeds","#,
                    r#""Cost Basis","Adjustment Code","Adjustment Amount","Gain or Loss""#,
                )
            )?;
            for item in bucket {
                writeln!(f, "{item}")?;
            }
        }

        for warning in &self.warnings {
            writeln!(f, "Warning: {warning}")?;
        }

        Ok(())
    }
}
