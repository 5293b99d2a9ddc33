use chrono::{DateTime, Utc};
use error_iter::ErrorIter as _;
use std::fmt::Write as _;
use thiserror::Error;

use crate::model::amount::AssetAmount;

/// A single transaction field that could not be converted into the exact
/// internal type. The engine never substitutes zero for a malformed field.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("transaction {row}: field `{field}` is not a valid decimal: `{value}`")]
    Amount {
        row: usize,
        field: &'static str,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("transaction {row}: date is not valid RFC 3339: `{value}`")]
    Date {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Every malformed field found while converting a batch of raw transactions.
///
/// The whole run fails when any row is malformed; all offending fields are
/// reported at once rather than stopping at the first.
#[derive(Debug, Error)]
#[error("{count} malformed transaction field(s):{}", print_parse_errors(.errors), count = .errors.len())]
pub struct ParseErrors {
    pub errors: Vec<ParseError>,
}

fn print_parse_errors(errors: &[ParseError]) -> String {
    let mut output = String::new();

    for err in errors {
        write!(&mut output, "\n  - {err}").unwrap();
        for source in err.sources().skip(1) {
            write!(&mut output, "\n    Caused by {source}").unwrap();
        }
    }

    output
}

/// A disposal that the FIFO matcher could not fully satisfy because its
/// currency's acquisition queue ran dry. Attached to the report as a
/// diagnostic, never silently dropped.
#[derive(Clone, Debug, Error, PartialEq, serde::Serialize)]
pub enum MatchWarning {
    #[error("{currency}: no acquisition lots to match disposal of {disposed} on {date_sold}")]
    Unmatched {
        currency: String,
        date_sold: DateTime<Utc>,
        disposed: AssetAmount,
    },

    #[error("{currency}: disposal of {disposed} on {date_sold} left {unmatched} unmatched")]
    PartiallyMatched {
        currency: String,
        date_sold: DateTime<Utc>,
        disposed: AssetAmount,
        unmatched: AssetAmount,
    },
}
