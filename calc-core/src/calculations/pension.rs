//! Voluntary pension state contribution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PensionRules;
use crate::calculations::common::round_half_up;

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PensionError {
    #[error("monthly contribution must not be negative, got {0}")]
    NegativeContribution(Decimal),

    #[error("contribution period must be at least one month")]
    ZeroMonths,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateContribution {
    pub total_contributions: Decimal,
    pub state_contribution: Decimal,
    /// True when the cap, not the rate, set the state contribution.
    pub capped: bool,
}

/// State top-up on `months` of contributions.
///
/// The top-up is `rate × contributions`, limited to the yearly cap prorated
/// over `months / 12`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::compute_state_contribution;
/// use calc_core::RateTables;
///
/// let tables = RateTables::default_2026();
/// let result = compute_state_contribution(dec!(1000), 12, &tables.pension).unwrap();
///
/// assert_eq!(result.state_contribution, dec!(3600.00));
/// assert!(!result.capped);
/// ```
pub fn compute_state_contribution(
    monthly_contribution: Decimal,
    months: u32,
    rules: &PensionRules,
) -> Result<StateContribution, PensionError> {
    if monthly_contribution < Decimal::ZERO {
        return Err(PensionError::NegativeContribution(monthly_contribution));
    }
    if months == 0 {
        return Err(PensionError::ZeroMonths);
    }

    let total_contributions = monthly_contribution * Decimal::from(months);
    let uncapped = total_contributions * rules.state_contribution_rate;
    let cap = rules.annual_cap * Decimal::from(months) / Decimal::from(MONTHS_PER_YEAR);
    let capped = uncapped > cap;

    Ok(StateContribution {
        total_contributions: round_half_up(total_contributions),
        state_contribution: round_half_up(uncapped.min(cap)),
        capped,
    })
}
