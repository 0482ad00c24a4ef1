//! Fixed-payment loan cost and amortization schedule.
//!
//! The effective annual rate is the nominal rate plus the contribution of
//! every surcharge that applies to the loan's category. Surcharges charged on
//! interest (KKDF, BSMV) scale with the nominal rate; surcharges charged on
//! principal are one-off fees outside the annuity.
//!
//! | Step              | Formula                                        |
//! |-------------------|------------------------------------------------|
//! | Effective rate    | nominal + Σ applicable surcharge contributions |
//! | Monthly rate      | effective / 100 / 12                           |
//! | Monthly payment   | P · r · (1+r)^n / ((1+r)^n − 1)                |
//! | Zero-rate payment | P / n                                          |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::calculations::{LoanCalculator, LoanTerms};
//! use calc_core::{LoanCategory, RateTables};
//!
//! let tables = RateTables::default_2026();
//! let calculator = LoanCalculator::new(&tables.loan_surcharges);
//!
//! let terms = LoanTerms {
//!     principal: dec!(100000),
//!     nominal_rate_percent: dec!(36),
//!     term_months: 12,
//!     category: LoanCategory::Mortgage,
//! };
//! let cost = calculator.compute_loan_cost(&terms).unwrap();
//!
//! // Mortgages are exempt from KKDF and BSMV.
//! assert_eq!(cost.effective_rate_percent, dec!(36));
//! ```

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::{LoanCategory, Surcharge, SurchargeBase};

/// Errors that can occur during loan calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoanError {
    #[error("principal must be positive, got {0}")]
    NonPositivePrincipal(Decimal),

    #[error("loan term must be at least one month")]
    ZeroTerm,

    #[error("interest rate must not be negative, got {0}")]
    NegativeRate(Decimal),

    #[error("loan amounts overflowed for {rate_percent}% over {term_months} months")]
    Overflow {
        rate_percent: Decimal,
        term_months: u32,
    },
}

/// Loan request as entered on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Decimal,
    /// Annual nominal rate before surcharges, in percent.
    pub nominal_rate_percent: Decimal,
    pub term_months: u32,
    pub category: LoanCategory,
}

/// Share of the loan cost attributed to one surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeAmount {
    pub name: String,
    pub base: SurchargeBase,
    pub rate_percent: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCost {
    pub monthly_payment: Decimal,
    pub total_payment: Decimal,
    /// Everything paid above principal through the installments, surcharges
    /// on interest included.
    pub total_interest: Decimal,
    pub effective_rate_percent: Decimal,
    pub surcharges: Vec<SurchargeAmount>,
    /// Sum of principal-based fees, paid once at disbursement.
    pub upfront_fees: Decimal,
    /// `total_payment + upfront_fees`.
    pub total_cost: Decimal,
}

/// One installment of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Decimal,
    pub principal: Decimal,
    pub interest: Decimal,
    /// Balance remaining after this installment.
    pub balance: Decimal,
}

/// Calculator for loan costs under a surcharge table.
#[derive(Debug, Clone)]
pub struct LoanCalculator<'a> {
    surcharges: &'a [Surcharge],
}

impl<'a> LoanCalculator<'a> {
    pub fn new(surcharges: &'a [Surcharge]) -> Self {
        Self { surcharges }
    }

    /// Surcharges that apply to `category`, in table order.
    pub fn applicable_surcharges(
        &self,
        category: LoanCategory,
    ) -> impl Iterator<Item = &'a Surcharge> + use<'a> {
        self.surcharges
            .iter()
            .filter(move |s| s.applies(category))
    }

    /// Nominal rate plus every applicable surcharge contribution.
    pub fn effective_rate_percent(
        &self,
        nominal_rate_percent: Decimal,
        category: LoanCategory,
    ) -> Decimal {
        nominal_rate_percent
            + self
                .applicable_surcharges(category)
                .map(|s| s.rate_contribution(nominal_rate_percent))
                .sum::<Decimal>()
    }

    /// Calculates the payment, totals, and surcharge split for a loan.
    ///
    /// Rate-bearing surcharges receive
    /// `total_interest × contribution / effective_rate`; principal-based
    /// surcharges receive `principal × rate_percent / 100`.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError`] for a non-positive principal, a zero term, a
    /// negative rate, or amounts too large to represent.
    pub fn compute_loan_cost(
        &self,
        terms: &LoanTerms,
    ) -> Result<LoanCost, LoanError> {
        if terms.nominal_rate_percent < Decimal::ZERO {
            return Err(LoanError::NegativeRate(terms.nominal_rate_percent));
        }

        let effective_rate_percent =
            self.effective_rate_percent(terms.nominal_rate_percent, terms.category);
        let payment = monthly_payment(terms.principal, effective_rate_percent, terms.term_months)?;
        let overflow = || LoanError::Overflow {
            rate_percent: effective_rate_percent,
            term_months: terms.term_months,
        };

        let total_payment = payment
            .checked_mul(Decimal::from(terms.term_months))
            .ok_or_else(overflow)?;
        let total_interest = total_payment - terms.principal;

        let surcharges = self
            .applicable_surcharges(terms.category)
            .map(|s| -> Result<SurchargeAmount, LoanError> {
                let amount = match s.base {
                    SurchargeBase::Principal => terms
                        .principal
                        .checked_mul(s.rate_percent / Decimal::ONE_HUNDRED),
                    SurchargeBase::RatePoints | SurchargeBase::Interest
                        if effective_rate_percent.is_zero() =>
                    {
                        Some(Decimal::ZERO)
                    }
                    SurchargeBase::RatePoints | SurchargeBase::Interest => total_interest
                        .checked_mul(s.rate_contribution(terms.nominal_rate_percent))
                        .and_then(|v| v.checked_div(effective_rate_percent)),
                };
                Ok(SurchargeAmount {
                    name: s.name.clone(),
                    base: s.base,
                    rate_percent: s.rate_percent,
                    amount: round_half_up(amount.ok_or_else(overflow)?),
                })
            })
            .collect::<Result<Vec<_>, LoanError>>()?;

        let upfront_fees = surcharges
            .iter()
            .filter(|s| s.base == SurchargeBase::Principal)
            .try_fold(Decimal::ZERO, |sum, s| sum.checked_add(s.amount))
            .ok_or_else(overflow)?;

        let total_payment = round_half_up(total_payment);
        let total_cost = total_payment
            .checked_add(upfront_fees)
            .ok_or_else(overflow)?;

        debug!(
            category = terms.category.as_str(),
            effective_rate_percent = %effective_rate_percent,
            monthly_payment = %payment,
            "computed loan cost"
        );

        Ok(LoanCost {
            monthly_payment: round_half_up(payment),
            total_payment,
            total_interest: round_half_up(total_interest),
            effective_rate_percent,
            surcharges,
            upfront_fees,
            total_cost,
        })
    }

    /// Cost plus the full schedule at the effective rate.
    pub fn compute_with_schedule(
        &self,
        terms: &LoanTerms,
    ) -> Result<(LoanCost, Vec<AmortizationRow>), LoanError> {
        let cost = self.compute_loan_cost(terms)?;
        let schedule = generate_schedule(
            terms.principal,
            cost.effective_rate_percent,
            terms.term_months,
            cost.monthly_payment,
        )?;
        Ok((cost, schedule))
    }
}

fn validate_principal_and_term(
    principal: Decimal,
    term_months: u32,
) -> Result<(), LoanError> {
    if principal <= Decimal::ZERO {
        return Err(LoanError::NonPositivePrincipal(principal));
    }
    if term_months == 0 {
        return Err(LoanError::ZeroTerm);
    }
    Ok(())
}

/// Standard annuity payment, unrounded.
///
/// A zero rate splits the principal evenly across the term.
///
/// # Errors
///
/// Returns [`LoanError`] for invalid inputs, or [`LoanError::Overflow`] when
/// `(1 + r)^n` or the payment itself does not fit in a `Decimal`.
pub fn monthly_payment(
    principal: Decimal,
    effective_rate_percent: Decimal,
    term_months: u32,
) -> Result<Decimal, LoanError> {
    validate_principal_and_term(principal, term_months)?;
    if effective_rate_percent < Decimal::ZERO {
        return Err(LoanError::NegativeRate(effective_rate_percent));
    }

    let monthly_rate = monthly_rate(effective_rate_percent);
    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let overflow = || LoanError::Overflow {
        rate_percent: effective_rate_percent,
        term_months,
    };

    let factor = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(term_months))
        .ok_or_else(overflow)?;

    // (1+r)^n / ((1+r)^n - 1) tends to 1 for steep rates, so it is taken
    // before scaling by principal.
    factor
        .checked_div(factor - Decimal::ONE)
        .and_then(|annuity| principal.checked_mul(monthly_rate)?.checked_mul(annuity))
        .ok_or_else(overflow)
}

/// Builds the month-by-month schedule in whole cents.
///
/// Each month's interest is rounded to the cent and the rest of the payment
/// retires principal. The final installment pays off whatever balance is
/// left, so principal portions sum to `principal` exactly and the last
/// balance is zero.
///
/// # Errors
///
/// Returns [`LoanError`] for a non-positive principal, a zero term, a
/// negative rate, or an installment too large to represent.
pub fn generate_schedule(
    principal: Decimal,
    effective_rate_percent: Decimal,
    term_months: u32,
    monthly_payment: Decimal,
) -> Result<Vec<AmortizationRow>, LoanError> {
    validate_principal_and_term(principal, term_months)?;
    if effective_rate_percent < Decimal::ZERO {
        return Err(LoanError::NegativeRate(effective_rate_percent));
    }

    let monthly_rate = monthly_rate(effective_rate_percent);
    let overflow = || LoanError::Overflow {
        rate_percent: effective_rate_percent,
        term_months,
    };
    let payment = round_half_up(monthly_payment);
    let mut balance = round_half_up(principal);
    let mut rows = Vec::with_capacity(term_months as usize);

    for month in 1..=term_months {
        let interest = round_half_up(balance.checked_mul(monthly_rate).ok_or_else(overflow)?);

        let principal_part = if month == term_months {
            balance
        } else {
            if payment < interest {
                warn!(
                    month,
                    payment = %payment,
                    interest = %interest,
                    "payment does not cover interest; principal portion set to zero"
                );
            }
            (payment - interest).max(Decimal::ZERO).min(balance)
        };

        balance = (balance - principal_part).max(Decimal::ZERO);

        rows.push(AmortizationRow {
            month,
            payment: principal_part.checked_add(interest).ok_or_else(overflow)?,
            principal: principal_part,
            interest,
            balance,
        });
    }

    Ok(rows)
}

fn monthly_rate(effective_rate_percent: Decimal) -> Decimal {
    effective_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(12)
}
