//! Normalization of provider-supplied text fields.
//!
//! Upstream feeds deliver amounts as decimal text and dates as ISO strings,
//! and omit either for pending transactions. Blank text normalizes to a
//! defined fallback (zero amount, absent date) rather than an error; text
//! that is present but undecodable fails the record, which aborts the
//! current account's run as a malformed page.

use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("invalid amount {text:?}: {source}")]
    Amount {
        text: String,
        source: rust_decimal::Error,
    },

    #[error("invalid date {text:?}: {source}")]
    Date {
        text: String,
        source: chrono::ParseError,
    },
}

/// Parse decimal amount text. Blank text normalizes to zero; anything else
/// must parse exactly (no floating point on the way in, so repeated syncs
/// cannot drift).
pub fn parse_amount(raw: &str) -> Result<Decimal, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    trimmed.parse::<Decimal>().map_err(|source| NormalizeError::Amount {
        text: raw.to_string(),
        source,
    })
}

/// Parse ISO date text. Blank text normalizes to an absent date.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|source| NormalizeError::Date {
            text: raw.to_string(),
            source,
        })
}

/// Blank-to-absent normalization for free text fields.
pub fn empty_to_none(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
