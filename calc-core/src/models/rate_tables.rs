//! Versioned reference data consumed by the calculation engines.
//!
//! A [`RateTables`] value is loaded once per process (see the `calc-data`
//! crate) and handed to the engines by reference. Nothing in this crate
//! mutates it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::calculations::tax::{TaxError, validate_brackets};
use crate::{LoanCategory, MaritalStatus, Surcharge, SurchargeBase, TaxBracket};

/// Errors raised when a rate table fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("minimum wage must be positive, got {0}")]
    InvalidMinimumWage(Decimal),

    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    #[error("contribution ceiling multiplier must be at least 1, got {0}")]
    InvalidCeilingMultiplier(Decimal),

    #[error("tax credit percent {field} must be between 0 and 100, got {value}")]
    CreditPercentOutOfRange { field: &'static str, value: Decimal },

    #[error("surcharge '{0}' has a negative rate")]
    NegativeSurcharge(String),

    #[error("pension annual cap must be non-negative, got {0}")]
    InvalidPensionCap(Decimal),

    #[error("income tax brackets: {0}")]
    Brackets(#[from] TaxError),
}

/// Payroll withholding parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRates {
    /// Gross statutory minimum wage (monthly). Also the contribution floor.
    pub minimum_wage: Decimal,
    pub employee_social_security_rate: Decimal,
    pub employee_unemployment_rate: Decimal,
    pub employer_social_security_rate: Decimal,
    pub employer_unemployment_rate: Decimal,
    /// Contribution ceiling expressed as a multiple of the minimum wage.
    pub ceiling_multiplier: Decimal,
    pub stamp_tax_rate: Decimal,
}

impl PayrollRates {
    pub fn contribution_floor(&self) -> Decimal {
        self.minimum_wage
    }

    pub fn contribution_ceiling(&self) -> Decimal {
        self.minimum_wage * self.ceiling_multiplier
    }
}

/// Percentages of the minimum wage granted as a tax credit.
///
/// All values are percentages (`50` means 50%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCreditRules {
    pub single_percent: Decimal,
    pub spouse_working_percent: Decimal,
    pub spouse_not_working_percent: Decimal,
    /// Increments for the first dependents, in order.
    pub dependent_percents: Vec<Decimal>,
    /// Increment for every dependent past `dependent_percents`.
    pub additional_dependent_percent: Decimal,
    pub max_percent: Decimal,
}

impl TaxCreditRules {
    pub fn credit_percent(
        &self,
        marital: MaritalStatus,
        dependents: u32,
    ) -> Decimal {
        let base = match marital {
            MaritalStatus::Single => self.single_percent,
            MaritalStatus::MarriedSpouseWorking => self.spouse_working_percent,
            MaritalStatus::MarriedSpouseNotWorking => self.spouse_not_working_percent,
        };

        let listed = self
            .dependent_percents
            .iter()
            .take(dependents as usize)
            .copied()
            .sum::<Decimal>();
        let extra = dependents.saturating_sub(self.dependent_percents.len() as u32);
        let for_dependents = listed + Decimal::from(extra) * self.additional_dependent_percent;

        (base + for_dependents).min(self.max_percent)
    }
}

/// Voluntary pension state contribution rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionRules {
    pub state_contribution_rate: Decimal,
    /// Maximum state contribution for a full year.
    pub annual_cap: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTables {
    pub year: i32,
    pub payroll: PayrollRates,
    pub income_tax_brackets: Vec<TaxBracket>,
    pub tax_credit: TaxCreditRules,
    pub loan_surcharges: Vec<Surcharge>,
    pub pension: PensionRules,
}

impl RateTables {
    /// Built-in 2026 tables.
    pub fn default_2026() -> Self {
        let minimum_wage = dec!(33030.00);

        Self {
            year: 2026,
            payroll: PayrollRates {
                minimum_wage,
                employee_social_security_rate: dec!(0.14),
                employee_unemployment_rate: dec!(0.01),
                // Includes the five-point employer incentive.
                employer_social_security_rate: dec!(0.1575),
                employer_unemployment_rate: dec!(0.02),
                ceiling_multiplier: dec!(7.5),
                stamp_tax_rate: dec!(0.00759),
            },
            income_tax_brackets: vec![
                TaxBracket {
                    min_income: dec!(0),
                    max_income: Some(dec!(190000)),
                    rate: dec!(0.15),
                },
                TaxBracket {
                    min_income: dec!(190000),
                    max_income: Some(dec!(400000)),
                    rate: dec!(0.20),
                },
                TaxBracket {
                    min_income: dec!(400000),
                    max_income: Some(dec!(1500000)),
                    rate: dec!(0.27),
                },
                TaxBracket {
                    min_income: dec!(1500000),
                    max_income: Some(dec!(5300000)),
                    rate: dec!(0.35),
                },
                TaxBracket {
                    min_income: dec!(5300000),
                    max_income: None,
                    rate: dec!(0.40),
                },
            ],
            tax_credit: TaxCreditRules {
                single_percent: dec!(50),
                spouse_working_percent: dec!(50),
                spouse_not_working_percent: dec!(60),
                dependent_percents: vec![dec!(7.5), dec!(7.5), dec!(10)],
                additional_dependent_percent: dec!(5),
                max_percent: dec!(85),
            },
            loan_surcharges: vec![
                Surcharge {
                    name: "KKDF".to_string(),
                    base: SurchargeBase::Interest,
                    rate_percent: dec!(15),
                    applies_to: vec![LoanCategory::Consumer, LoanCategory::Vehicle],
                },
                Surcharge {
                    name: "BSMV".to_string(),
                    base: SurchargeBase::Interest,
                    rate_percent: dec!(15),
                    applies_to: vec![LoanCategory::Consumer, LoanCategory::Vehicle],
                },
                Surcharge {
                    name: "BSMV".to_string(),
                    base: SurchargeBase::Interest,
                    rate_percent: dec!(5),
                    applies_to: vec![LoanCategory::Commercial],
                },
                Surcharge {
                    name: "Allocation fee".to_string(),
                    base: SurchargeBase::Principal,
                    rate_percent: dec!(0.5),
                    applies_to: vec![
                        LoanCategory::Consumer,
                        LoanCategory::Vehicle,
                        LoanCategory::Mortgage,
                        LoanCategory::Commercial,
                    ],
                },
            ],
            pension: PensionRules {
                state_contribution_rate: dec!(0.30),
                annual_cap: round_half_up(minimum_wage * dec!(12) * dec!(0.30)),
            },
        }
    }

    /// Checks every table for values the engines cannot work with.
    pub fn validate(&self) -> Result<(), RateTableError> {
        let payroll = &self.payroll;
        if payroll.minimum_wage <= Decimal::ZERO {
            return Err(RateTableError::InvalidMinimumWage(payroll.minimum_wage));
        }

        for (field, value) in [
            (
                "employee_social_security_rate",
                payroll.employee_social_security_rate,
            ),
            (
                "employee_unemployment_rate",
                payroll.employee_unemployment_rate,
            ),
            (
                "employer_social_security_rate",
                payroll.employer_social_security_rate,
            ),
            (
                "employer_unemployment_rate",
                payroll.employer_unemployment_rate,
            ),
            ("stamp_tax_rate", payroll.stamp_tax_rate),
            (
                "state_contribution_rate",
                self.pension.state_contribution_rate,
            ),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(RateTableError::RateOutOfRange { field, value });
            }
        }

        if payroll.ceiling_multiplier < Decimal::ONE {
            return Err(RateTableError::InvalidCeilingMultiplier(
                payroll.ceiling_multiplier,
            ));
        }

        let credit = &self.tax_credit;
        let mut credit_fields = vec![
            ("single_percent", credit.single_percent),
            ("spouse_working_percent", credit.spouse_working_percent),
            ("spouse_not_working_percent", credit.spouse_not_working_percent),
            (
                "additional_dependent_percent",
                credit.additional_dependent_percent,
            ),
            ("max_percent", credit.max_percent),
        ];
        credit_fields.extend(
            credit
                .dependent_percents
                .iter()
                .map(|p| ("dependent_percents", *p)),
        );
        for (field, value) in credit_fields {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(RateTableError::CreditPercentOutOfRange { field, value });
            }
        }

        if let Some(s) = self
            .loan_surcharges
            .iter()
            .find(|s| s.rate_percent < Decimal::ZERO)
        {
            return Err(RateTableError::NegativeSurcharge(s.name.clone()));
        }

        if self.pension.annual_cap < Decimal::ZERO {
            return Err(RateTableError::InvalidPensionCap(self.pension.annual_cap));
        }

        validate_brackets(&self.income_tax_brackets)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // RateTables::validate tests
    // =========================================================================

    #[test]
    fn default_tables_are_valid() {
        let tables = RateTables::default_2026();

        assert_eq!(tables.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_minimum_wage() {
        let mut tables = RateTables::default_2026();
        tables.payroll.minimum_wage = dec!(0);

        assert_eq!(
            tables.validate(),
            Err(RateTableError::InvalidMinimumWage(dec!(0)))
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut tables = RateTables::default_2026();
        tables.payroll.stamp_tax_rate = dec!(1.5);

        assert_eq!(
            tables.validate(),
            Err(RateTableError::RateOutOfRange {
                field: "stamp_tax_rate",
                value: dec!(1.5),
            })
        );
    }

    #[test]
    fn validate_rejects_ceiling_below_floor() {
        let mut tables = RateTables::default_2026();
        tables.payroll.ceiling_multiplier = dec!(0.5);

        assert_eq!(
            tables.validate(),
            Err(RateTableError::InvalidCeilingMultiplier(dec!(0.5)))
        );
    }

    #[test]
    fn validate_rejects_negative_surcharge() {
        let mut tables = RateTables::default_2026();
        tables.loan_surcharges[0].rate_percent = dec!(-1);

        assert_eq!(
            tables.validate(),
            Err(RateTableError::NegativeSurcharge("KKDF".to_string()))
        );
    }

    #[test]
    fn validate_rejects_broken_brackets() {
        let mut tables = RateTables::default_2026();
        tables.income_tax_brackets.clear();

        assert_eq!(
            tables.validate(),
            Err(RateTableError::Brackets(TaxError::NoTaxBrackets))
        );
    }

    // =========================================================================
    // PayrollRates tests
    // =========================================================================

    #[test]
    fn contribution_ceiling_is_multiple_of_minimum_wage() {
        let tables = RateTables::default_2026();

        assert_eq!(tables.payroll.contribution_floor(), dec!(33030.00));
        assert_eq!(tables.payroll.contribution_ceiling(), dec!(247725.00));
    }

    #[test]
    fn pension_cap_is_thirty_percent_of_annual_minimum_wage() {
        let tables = RateTables::default_2026();

        assert_eq!(tables.pension.annual_cap, dec!(118908.00));
    }

    // =========================================================================
    // TaxCreditRules::credit_percent tests
    // =========================================================================

    #[test]
    fn credit_percent_single_without_dependents() {
        let rules = RateTables::default_2026().tax_credit;

        assert_eq!(rules.credit_percent(MaritalStatus::Single, 0), dec!(50));
    }

    #[test]
    fn credit_percent_uses_higher_base_when_spouse_not_working() {
        let rules = RateTables::default_2026().tax_credit;

        assert_eq!(
            rules.credit_percent(MaritalStatus::MarriedSpouseNotWorking, 0),
            dec!(60)
        );
        assert_eq!(
            rules.credit_percent(MaritalStatus::MarriedSpouseWorking, 0),
            dec!(50)
        );
    }

    #[test]
    fn credit_percent_adds_per_dependent_increments() {
        let rules = RateTables::default_2026().tax_credit;

        // 50 + 7.5 + 7.5 + 10 + 5
        assert_eq!(rules.credit_percent(MaritalStatus::Single, 4), dec!(80));
    }

    #[test]
    fn credit_percent_counts_dependents_past_the_list() {
        let rules = RateTables::default_2026().tax_credit;

        // 50 + 7.5 + 7.5 + 10 + 5 * 2, under the cap
        assert_eq!(rules.credit_percent(MaritalStatus::Single, 5), dec!(85));
        assert_eq!(rules.credit_percent(MaritalStatus::Single, 2), dec!(65));
    }

    #[test]
    fn credit_percent_with_huge_dependent_count_is_capped() {
        let rules = RateTables::default_2026().tax_credit;

        assert_eq!(rules.credit_percent(MaritalStatus::Single, u32::MAX), dec!(85));
    }

    #[test]
    fn credit_percent_is_capped() {
        let rules = RateTables::default_2026().tax_credit;

        // 60 + 7.5 + 7.5 + 10 + 5 + 5 = 95, capped at 85
        assert_eq!(
            rules.credit_percent(MaritalStatus::MarriedSpouseNotWorking, 5),
            dec!(85)
        );
    }
}
