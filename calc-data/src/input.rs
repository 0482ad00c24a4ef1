//! Form field parsing.
//!
//! Amounts arrive as text typed into a page in either English (`1,234.56`)
//! or Turkish (`1.234,56`) notation. Everything here normalizes that text,
//! turns it into a [`Decimal`] and range-checks it before an engine sees it.

use calc_core::calculations::common::round_half_up;
use calc_core::{LoanCategory, MaritalStatus};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl Locale {
    fn separators(self) -> (char, char) {
        // (thousands, decimal)
        match self {
            Locale::En => (',', '.'),
            Locale::Tr => ('.', ','),
        }
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field}: '{input}' is not a number")]
    InvalidAmount {
        field: &'static str,
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("{field}: '{input}' is not a whole number")]
    InvalidCount { field: &'static str, input: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("{field}: unknown choice '{input}'")]
    UnknownChoice { field: &'static str, input: String },
}

/// Strips whitespace and thousands separators and swaps the decimal
/// separator for `.`.
fn normalize_amount(
    s: &str,
    locale: Locale,
) -> String {
    let (thousands, decimal) = locale.separators();
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != thousands)
        .map(|c| if c == decimal { '.' } else { c })
        .collect()
}

/// Parses a required amount.
pub fn parse_amount(
    field: &'static str,
    s: &str,
    locale: Locale,
) -> Result<Decimal, InputError> {
    parse_optional_amount(field, s, locale)?.ok_or(InputError::Required { field })
}

/// Parses an optional amount; blank input is `None`.
pub fn parse_optional_amount(
    field: &'static str,
    s: &str,
    locale: Locale,
) -> Result<Option<Decimal>, InputError> {
    let normalized = normalize_amount(s, locale);
    if normalized.is_empty() {
        return Ok(None);
    }
    normalized.parse().map(Some).map_err(|source| {
        tracing::warn!(field, input = %s, "invalid amount");
        InputError::InvalidAmount {
            field,
            input: s.to_string(),
            source,
        }
    })
}

/// Parses a non-negative whole number such as a term in months.
pub fn parse_count(
    field: &'static str,
    s: &str,
) -> Result<u32, InputError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(InputError::Required { field });
    }
    trimmed.parse().map_err(|_| InputError::InvalidCount {
        field,
        input: s.to_string(),
    })
}

/// Returns `value` if it lies in `[min, max]`.
pub fn ensure_range(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<Decimal, InputError> {
    if value < min || value > max {
        return Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

pub fn parse_marital_status(
    field: &'static str,
    s: &str,
) -> Result<MaritalStatus, InputError> {
    MaritalStatus::parse(s).ok_or_else(|| InputError::UnknownChoice {
        field,
        input: s.to_string(),
    })
}

pub fn parse_loan_category(
    field: &'static str,
    s: &str,
) -> Result<LoanCategory, InputError> {
    LoanCategory::parse(s).ok_or_else(|| InputError::UnknownChoice {
        field,
        input: s.to_string(),
    })
}

/// Formats an amount to two decimals with the locale's separators.
pub fn format_amount(
    value: Decimal,
    locale: Locale,
) -> String {
    let (thousands, decimal) = locale.separators();
    let rounded = round_half_up(value);
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}{decimal}{cents}")
}
