//! Progressive bracket tax.
//!
//! Income is sliced across the bracket table in ascending order; each slice
//! is taxed at its bracket's marginal rate and the slices are summed.
//!
//! | Bracket            | Rate | Tax on 500,000 |
//! |--------------------|------|----------------|
//! | 0 – 190,000        | 15%  | 28,500         |
//! | 190,000 – 400,000  | 20%  | 42,000         |
//! | 400,000 – 1,500,000| 27%  | 27,000         |
//! | total              |      | 97,500 (19.50%)|
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::calculations::compute_tax;
//! use calc_core::RateTables;
//!
//! let tables = RateTables::default_2026();
//! let result = compute_tax(dec!(500000), &tables.income_tax_brackets).unwrap();
//!
//! assert_eq!(result.total_tax, dec!(97500.00));
//! assert_eq!(result.effective_rate_percent, dec!(19.50));
//! assert_eq!(result.breakdown.len(), 3);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::TaxBracket;
use crate::calculations::common::{percent_of, round_half_up};

/// Errors that can occur during bracket tax calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// No tax brackets were provided for the calculation.
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    #[error("bracket {index} has rate {rate}, expected a fraction between 0 and 1")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} is empty or inverted")]
    EmptyBracket { index: usize },

    /// `brackets[index].max_income` does not meet the next bracket's minimum.
    #[error("bracket {index} does not meet the next bracket")]
    Gap { index: usize },

    #[error("bracket {index} is open-ended but is not the last bracket")]
    OpenBracketNotLast { index: usize },

    #[error("the last bracket must be open-ended")]
    MissingOpenBracket,

    #[error("income must not be negative, got {0}")]
    NegativeIncome(Decimal),

    #[error("cumulative income base overflowed")]
    Overflow,
}

/// Tax attributed to one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownLine {
    pub bracket: TaxBracket,
    /// Portion of income falling inside this bracket.
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

/// Result of a bracket tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    pub total_tax: Decimal,
    /// Total tax as a percentage of income, two decimal places.
    pub effective_rate_percent: Decimal,
    /// One line per bracket that received income; empty for zero income.
    pub breakdown: Vec<TaxBreakdownLine>,
}

impl TaxComputation {
    fn zero() -> Self {
        Self {
            total_tax: Decimal::ZERO,
            effective_rate_percent: Decimal::ZERO,
            breakdown: Vec::new(),
        }
    }
}

/// Checks the ordering invariant of a bracket table.
///
/// Brackets must be ascending and contiguous (`max_income` of one bracket is
/// the `min_income` of the next), with exactly one open-ended bracket at the
/// end.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), TaxError> {
    let Some(last_index) = brackets.len().checked_sub(1) else {
        return Err(TaxError::NoTaxBrackets);
    };

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(TaxError::InvalidRate {
                index,
                rate: bracket.rate,
            });
        }

        match bracket.max_income {
            None if index != last_index => return Err(TaxError::OpenBracketNotLast { index }),
            None => {}
            Some(max) => {
                if max <= bracket.min_income {
                    return Err(TaxError::EmptyBracket { index });
                }
                match brackets.get(index + 1) {
                    Some(next) if next.min_income != max => {
                        return Err(TaxError::Gap { index });
                    }
                    Some(_) => {}
                    None => return Err(TaxError::MissingOpenBracket),
                }
            }
        }
    }

    Ok(())
}

/// Convenience wrapper around [`BracketTaxCalculator::calculate`].
pub fn compute_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Result<TaxComputation, TaxError> {
    BracketTaxCalculator::new(brackets).calculate(income)
}

/// Convenience wrapper around [`BracketTaxCalculator::calculate_cumulative`].
pub fn compute_tax_cumulative(
    prior_base: Decimal,
    month_base: Decimal,
    brackets: &[TaxBracket],
) -> Result<Decimal, TaxError> {
    BracketTaxCalculator::new(brackets).calculate_cumulative(prior_base, month_base)
}

/// Calculator for progressive bracket tax.
#[derive(Debug, Clone)]
pub struct BracketTaxCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketTaxCalculator<'a> {
    /// Brackets should be sorted by `min_income` and end with an open bracket;
    /// [`calculate`](Self::calculate) rejects tables that are not.
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Lowest marginal rate in the table, or zero for an empty table.
    pub fn lowest_rate(&self) -> Decimal {
        self.brackets
            .first()
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Calculates tax on `income` with a per-bracket breakdown.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError`] if the bracket table is malformed or the income
    /// is negative.
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> Result<TaxComputation, TaxError> {
        validate_brackets(self.brackets)?;

        if income < Decimal::ZERO {
            return Err(TaxError::NegativeIncome(income));
        }
        if income.is_zero() {
            return Ok(TaxComputation::zero());
        }

        let slices = self.slices(income);
        let exact_total: Decimal = slices.iter().map(|(_, _, tax)| *tax).sum();

        let breakdown = slices
            .into_iter()
            .map(|(bracket, taxable_amount, tax)| TaxBreakdownLine {
                bracket: bracket.clone(),
                taxable_amount: round_half_up(taxable_amount),
                tax: round_half_up(tax),
            })
            .collect();

        let total_tax = round_half_up(exact_total);
        let effective_rate_percent = round_half_up(percent_of(exact_total, income));

        debug!(
            income = %income,
            total_tax = %total_tax,
            effective_rate_percent = %effective_rate_percent,
            "computed bracket tax"
        );

        Ok(TaxComputation {
            total_tax,
            effective_rate_percent,
            breakdown,
        })
    }

    /// Tax due on `period_base` when `prior_base` has already been taxed
    /// earlier in the same year.
    ///
    /// The income tax base accumulates across payroll months, so later
    /// months slide into higher brackets. The result is
    /// `tax(prior + period) - tax(prior)`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError`] if the table is malformed, either base is
    /// negative, or their sum does not fit in a `Decimal`.
    pub fn calculate_cumulative(
        &self,
        prior_base: Decimal,
        period_base: Decimal,
    ) -> Result<Decimal, TaxError> {
        validate_brackets(self.brackets)?;

        if prior_base < Decimal::ZERO {
            return Err(TaxError::NegativeIncome(prior_base));
        }
        if period_base < Decimal::ZERO {
            return Err(TaxError::NegativeIncome(period_base));
        }

        let cumulative_base = prior_base
            .checked_add(period_base)
            .ok_or(TaxError::Overflow)?;
        let before = self.exact_tax(prior_base);
        let after = self.exact_tax(cumulative_base);

        Ok(round_half_up(after - before))
    }

    fn exact_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.slices(income).iter().map(|(_, _, tax)| *tax).sum()
    }

    /// Splits income across brackets. Stops at the first bracket the income
    /// does not reach.
    fn slices(
        &self,
        income: Decimal,
    ) -> Vec<(&'a TaxBracket, Decimal, Decimal)> {
        let mut slices = Vec::new();

        for bracket in self.brackets {
            if income <= bracket.min_income {
                break;
            }

            let upper = bracket.max_income.map_or(income, |max| income.min(max));
            let taxable_amount = upper - bracket.min_income;
            slices.push((bracket, taxable_amount, taxable_amount * bracket.rate));
        }

        slices
    }
}
