//! Gross-to-net payroll.
//!
//! A month is computed in this order:
//!
//! 1. Clamp gross to the contribution floor and ceiling.
//! 2. Withhold employee social security and unemployment on the clamped base.
//! 3. Run `gross − contributions` through the bracket engine on a base that
//!    accumulates across the year.
//! 4. Subtract the tax credit from that tax, flooring at zero.
//! 5. Charge stamp tax on gross.
//!
//! A gross of exactly the minimum wage is exempt from both income tax and
//! stamp tax, so its net is the minimum wage less contributions.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::calculations::SalaryCalculator;
//! use calc_core::{MaritalStatus, RateTables};
//!
//! let tables = RateTables::default_2026();
//! let calculator = SalaryCalculator::new(&tables);
//!
//! let month = calculator
//!     .compute_net_salary(dec!(50000), MaritalStatus::Single, 0)
//!     .unwrap();
//!
//! assert_eq!(month.deductions.social_security, dec!(7000.00));
//! assert_eq!(month.deductions.stamp_tax, dec!(379.50));
//! assert_eq!(month.net, dec!(38222.75));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{clamp, round_half_up};
use crate::calculations::tax::{BracketTaxCalculator, TaxError};
use crate::{MaritalStatus, RateTables};

const MONTHS_PER_YEAR: u32 = 12;

/// Stop bisecting once the bracket around the answer is narrower than this.
const GROSS_UP_TOLERANCE: Decimal = dec!(0.001);

const GROSS_UP_MAX_DOUBLINGS: u32 = 40;

const CENT: Decimal = dec!(0.01);

/// Errors that can occur during payroll calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalaryError {
    #[error("gross salary must not be negative, got {0}")]
    NegativeGross(Decimal),

    #[error("target net salary must be positive, got {0}")]
    NonPositiveTarget(Decimal),

    #[error("no gross salary found that pays a net of {0}")]
    GrossUpDiverged(Decimal),

    #[error("payroll totals overflowed for a gross of {0}")]
    Overflow(Decimal),

    #[error("income tax: {0}")]
    Tax(#[from] TaxError),
}

/// Amounts withheld from the employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDeductions {
    pub social_security: Decimal,
    pub unemployment: Decimal,
    /// Income tax after the tax credit.
    pub income_tax: Decimal,
    pub stamp_tax: Decimal,
    pub total: Decimal,
}

/// Contributions paid by the employer on top of gross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    pub social_security: Decimal,
    pub unemployment: Decimal,
}

/// One month of payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub gross: Decimal,
    pub net: Decimal,
    /// Gross clamped into the contribution floor and ceiling.
    pub contribution_base: Decimal,
    /// This month's addition to the cumulative income tax base.
    pub income_tax_base: Decimal,
    pub deductions: EmployeeDeductions,
    /// Part of the tax credit actually used this month.
    pub tax_credit: Decimal,
    /// Income tax waived because gross is exactly the minimum wage.
    pub minimum_wage_exemption: Decimal,
    pub employer_cost: Decimal,
    pub employer: EmployerContributions,
}

/// Twelve months of payroll at a constant gross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualPayroll {
    pub months: Vec<SalaryBreakdown>,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub total_income_tax: Decimal,
    pub total_employer_cost: Decimal,
}

/// Calculator for monthly and annual payroll under one set of rate tables.
#[derive(Debug, Clone)]
pub struct SalaryCalculator<'a> {
    tables: &'a RateTables,
}

impl<'a> SalaryCalculator<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    /// Net salary for the first month of the year.
    ///
    /// # Errors
    ///
    /// Returns [`SalaryError`] if gross is negative, the bracket table is
    /// malformed, or employer cost does not fit in a `Decimal`.
    pub fn compute_net_salary(
        &self,
        gross: Decimal,
        marital: MaritalStatus,
        dependents: u32,
    ) -> Result<SalaryBreakdown, SalaryError> {
        self.compute_month(gross, marital, dependents, Decimal::ZERO)
    }

    /// Runs a full year at a constant gross, carrying the income tax base
    /// forward month to month.
    ///
    /// # Errors
    ///
    /// Returns [`SalaryError::Overflow`] if a yearly total does not fit in a
    /// `Decimal`.
    pub fn compute_annual_payroll(
        &self,
        gross: Decimal,
        marital: MaritalStatus,
        dependents: u32,
    ) -> Result<AnnualPayroll, SalaryError> {
        let mut prior_base = Decimal::ZERO;
        let mut months = Vec::with_capacity(MONTHS_PER_YEAR as usize);

        for _ in 0..MONTHS_PER_YEAR {
            let month = self.compute_month(gross, marital, dependents, prior_base)?;
            prior_base = prior_base
                .checked_add(month.income_tax_base)
                .ok_or(SalaryError::Overflow(gross))?;
            months.push(month);
        }

        let total = |field: fn(&SalaryBreakdown) -> Decimal| {
            months
                .iter()
                .try_fold(Decimal::ZERO, |sum, m| sum.checked_add(field(m)))
                .ok_or(SalaryError::Overflow(gross))
        };

        Ok(AnnualPayroll {
            total_gross: total(|m| m.gross)?,
            total_net: total(|m| m.net)?,
            total_income_tax: total(|m| m.deductions.income_tax)?,
            total_employer_cost: total(|m| m.employer_cost)?,
            months,
        })
    }

    /// Finds the gross whose first-month net is `target_net`, to the cent.
    ///
    /// Net grows with gross everywhere except at exactly the minimum wage,
    /// where the exemptions lift it above its neighbours. That point is
    /// checked on its own. Otherwise the answer is bracketed between
    /// `target_net` (net never exceeds gross) and a doubling upper bound,
    /// then bisected with the minimum wage stepped over.
    ///
    /// # Errors
    ///
    /// Returns [`SalaryError::NonPositiveTarget`] for a target of zero or
    /// less, and [`SalaryError::GrossUpDiverged`] when the upper bound
    /// cannot be doubled any further.
    pub fn gross_up(
        &self,
        target_net: Decimal,
        marital: MaritalStatus,
        dependents: u32,
    ) -> Result<Decimal, SalaryError> {
        if target_net <= Decimal::ZERO {
            return Err(SalaryError::NonPositiveTarget(target_net));
        }

        let minimum_wage = self.tables.payroll.minimum_wage;
        if self.compute_net_salary(minimum_wage, marital, dependents)?.net == target_net {
            return Ok(minimum_wage);
        }

        let net_at = |gross: Decimal| -> Result<Decimal, SalaryError> {
            let gross = if gross == minimum_wage { gross + CENT } else { gross };
            Ok(self.compute_net_salary(gross, marital, dependents)?.net)
        };
        let diverged = || SalaryError::GrossUpDiverged(target_net);

        let mut low = target_net;
        let mut high = target_net.checked_mul(Decimal::TWO).ok_or_else(diverged)?;
        let mut doublings = 0;
        while net_at(high)? < target_net {
            low = high;
            high = high.checked_mul(Decimal::TWO).ok_or_else(diverged)?;
            doublings += 1;
            if doublings > GROSS_UP_MAX_DOUBLINGS {
                return Err(diverged());
            }
        }

        while high - low > GROSS_UP_TOLERANCE {
            let mid = low + (high - low) / Decimal::TWO;
            if net_at(mid)? < target_net {
                low = mid;
            } else {
                high = mid;
            }
        }

        let mut gross = round_half_up(high);
        if gross == minimum_wage {
            gross += CENT;
        }
        debug!(target_net = %target_net, gross = %gross, "grossed up salary");
        Ok(gross)
    }

    fn compute_month(
        &self,
        gross: Decimal,
        marital: MaritalStatus,
        dependents: u32,
        prior_base: Decimal,
    ) -> Result<SalaryBreakdown, SalaryError> {
        if gross < Decimal::ZERO {
            return Err(SalaryError::NegativeGross(gross));
        }

        let payroll = &self.tables.payroll;
        let brackets = BracketTaxCalculator::new(&self.tables.income_tax_brackets);

        let contribution_base = self.contribution_base(gross);
        let social_security = round_half_up(contribution_base * payroll.employee_social_security_rate);
        let unemployment = round_half_up(contribution_base * payroll.employee_unemployment_rate);

        let income_tax_base = (gross - social_security - unemployment).max(Decimal::ZERO);
        let tax_before_relief = brackets.calculate_cumulative(prior_base, income_tax_base)?;

        let at_minimum_wage = gross == payroll.minimum_wage;
        let minimum_wage_exemption = if at_minimum_wage {
            tax_before_relief
        } else {
            Decimal::ZERO
        };

        let credit_available = self.tax_credit_available(marital, dependents, brackets.lowest_rate());
        let tax_credit = credit_available.min(tax_before_relief - minimum_wage_exemption);
        let income_tax = tax_before_relief - minimum_wage_exemption - tax_credit;

        let stamp_tax = if at_minimum_wage {
            Decimal::ZERO
        } else {
            round_half_up(gross * payroll.stamp_tax_rate)
        };

        let total = social_security + unemployment + income_tax + stamp_tax;

        let employer = EmployerContributions {
            social_security: round_half_up(contribution_base * payroll.employer_social_security_rate),
            unemployment: round_half_up(contribution_base * payroll.employer_unemployment_rate),
        };
        let employer_cost = gross
            .checked_add(employer.social_security + employer.unemployment)
            .ok_or(SalaryError::Overflow(gross))?;

        debug!(
            gross = %gross,
            contribution_base = %contribution_base,
            tax_before_relief = %tax_before_relief,
            minimum_wage_exemption = %minimum_wage_exemption,
            tax_credit = %tax_credit,
            "computed payroll month"
        );

        Ok(SalaryBreakdown {
            gross,
            net: gross - total,
            contribution_base,
            income_tax_base,
            deductions: EmployeeDeductions {
                social_security,
                unemployment,
                income_tax,
                stamp_tax,
                total,
            },
            tax_credit,
            minimum_wage_exemption,
            employer_cost,
            employer,
        })
    }

    /// Gross clamped into `[minimum wage, minimum wage × ceiling multiplier]`.
    fn contribution_base(
        &self,
        gross: Decimal,
    ) -> Decimal {
        let payroll = &self.tables.payroll;
        let floor = payroll.contribution_floor();
        let ceiling = payroll.contribution_ceiling();

        if gross < floor {
            warn!(
                gross = %gross,
                floor = %floor,
                "gross below minimum wage; contributions charged on the floor"
            );
        } else if gross > ceiling {
            debug!(gross = %gross, ceiling = %ceiling, "contribution base capped at ceiling");
        }

        clamp(gross, floor, ceiling)
    }

    fn tax_credit_available(
        &self,
        marital: MaritalStatus,
        dependents: u32,
        lowest_rate: Decimal,
    ) -> Decimal {
        let percent = self.tables.tax_credit.credit_percent(marital, dependents);
        round_half_up(percent / Decimal::ONE_HUNDRED * self.tables.payroll.minimum_wage * lowest_rate)
    }
}

/// Convenience wrapper around [`SalaryCalculator::compute_net_salary`].
pub fn compute_net_salary(
    gross: Decimal,
    marital: MaritalStatus,
    dependents: u32,
    tables: &RateTables,
) -> Result<SalaryBreakdown, SalaryError> {
    SalaryCalculator::new(tables).compute_net_salary(gross, marital, dependents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // contribution_base tests
    // =========================================================================

    #[test]
    fn contribution_base_passes_gross_inside_limits() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        assert_eq!(calculator.contribution_base(dec!(50000)), dec!(50000));
    }

    #[test]
    fn contribution_base_raises_gross_to_floor() {
        let _guard = init_test_tracing();
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        assert_eq!(calculator.contribution_base(dec!(20000)), dec!(33030.00));
    }

    #[test]
    fn contribution_base_caps_gross_at_ceiling() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        assert_eq!(calculator.contribution_base(dec!(300000)), dec!(247725.000));
    }

    // =========================================================================
    // compute_net_salary tests
    // =========================================================================

    #[test]
    fn minimum_wage_pays_only_contributions() {
        let tables = RateTables::default_2026();

        let month = compute_net_salary(dec!(33030), MaritalStatus::Single, 0, &tables).unwrap();

        assert_eq!(month.deductions.social_security, dec!(4624.20));
        assert_eq!(month.deductions.unemployment, dec!(330.30));
        assert_eq!(month.deductions.income_tax, dec!(0));
        assert_eq!(month.deductions.stamp_tax, dec!(0));
        // 28075.50 * 15%, waived in full rather than offset by the credit.
        assert_eq!(month.minimum_wage_exemption, dec!(4211.33));
        assert_eq!(month.tax_credit, dec!(0));
        assert_eq!(month.net, dec!(28075.50));
    }

    #[test]
    fn one_cent_above_minimum_wage_loses_the_exemption() {
        let tables = RateTables::default_2026();

        let month = compute_net_salary(dec!(33030.01), MaritalStatus::Single, 0, &tables).unwrap();

        assert_eq!(month.minimum_wage_exemption, dec!(0));
        // 4211.33 - 2477.25
        assert_eq!(month.deductions.income_tax, dec!(1734.08));
        assert_eq!(month.deductions.stamp_tax, dec!(250.70));
    }

    #[test]
    fn gross_50000_single() {
        let tables = RateTables::default_2026();

        let month = compute_net_salary(dec!(50000), MaritalStatus::Single, 0, &tables).unwrap();

        assert_eq!(month.deductions.social_security, dec!(7000.00));
        assert_eq!(month.deductions.unemployment, dec!(500.00));
        assert_eq!(month.income_tax_base, dec!(42500.00));
        assert_eq!(month.minimum_wage_exemption, dec!(0));
        // 6375.00 - 2477.25
        assert_eq!(month.tax_credit, dec!(2477.25));
        assert_eq!(month.deductions.income_tax, dec!(3897.75));
        // 50000 * 0.759%
        assert_eq!(month.deductions.stamp_tax, dec!(379.50));
        assert_eq!(month.deductions.total, dec!(11777.25));
        assert_eq!(month.net, dec!(38222.75));
    }

    #[test]
    fn gross_50000_employer_cost() {
        let tables = RateTables::default_2026();

        let month = compute_net_salary(dec!(50000), MaritalStatus::Single, 0, &tables).unwrap();

        assert_eq!(month.employer.social_security, dec!(7875.00));
        assert_eq!(month.employer.unemployment, dec!(1000.00));
        assert_eq!(month.employer_cost, dec!(58875.00));
    }

    #[test]
    fn gross_200000_uses_full_credit() {
        let tables = RateTables::default_2026();

        let month = compute_net_salary(dec!(200000), MaritalStatus::Single, 0, &tables).unwrap();

        // 25500 - 2477.25
        assert_eq!(month.tax_credit, dec!(2477.25));
        assert_eq!(month.deductions.income_tax, dec!(23022.75));
        assert_eq!(month.deductions.stamp_tax, dec!(1518.00));
        assert_eq!(month.net, dec!(145459.25));
    }

    #[test]
    fn dependents_raise_the_credit_up_to_the_cap() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let five = calculator
            .compute_net_salary(dec!(200000), MaritalStatus::Single, 5)
            .unwrap();
        let nine = calculator
            .compute_net_salary(dec!(200000), MaritalStatus::Single, 9)
            .unwrap();

        // 85% of 33030 * 0.15
        assert_eq!(five.tax_credit, dec!(4211.33));
        assert_eq!(five.net, dec!(147193.33));
        assert_eq!(nine, five);
    }

    #[test]
    fn spouse_not_working_gets_larger_credit() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let single = calculator
            .compute_net_salary(dec!(200000), MaritalStatus::Single, 0)
            .unwrap();
        let married = calculator
            .compute_net_salary(dec!(200000), MaritalStatus::MarriedSpouseNotWorking, 0)
            .unwrap();

        assert!(married.tax_credit > single.tax_credit);
        assert!(married.net > single.net);
    }

    #[test]
    fn gross_above_ceiling_caps_contributions() {
        let tables = RateTables::default_2026();

        let month = compute_net_salary(dec!(300000), MaritalStatus::Single, 0, &tables).unwrap();

        assert_eq!(month.deductions.social_security, dec!(34681.50));
        assert_eq!(month.deductions.unemployment, dec!(2477.25));
        assert_eq!(month.employer.social_security, dec!(39016.69));
        assert_eq!(month.employer_cost, dec!(343971.19));
        assert_eq!(month.deductions.stamp_tax, dec!(2277.00));
        assert_eq!(month.net, dec!(219973.25));
    }

    #[test]
    fn gross_below_floor_charges_contributions_on_floor() {
        let _guard = init_test_tracing();
        let tables = RateTables::default_2026();

        let month = compute_net_salary(dec!(20000), MaritalStatus::Single, 0, &tables).unwrap();

        assert_eq!(month.contribution_base, dec!(33030.00));
        // 2256.83 of tax, all absorbed by the credit.
        assert_eq!(month.tax_credit, dec!(2256.83));
        assert_eq!(month.deductions.income_tax, dec!(0));
        assert_eq!(month.deductions.stamp_tax, dec!(151.80));
        assert_eq!(month.net, dec!(14893.70));
    }

    #[test]
    fn deductions_add_up_and_net_never_exceeds_gross() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        for gross in [
            dec!(0),
            dec!(10000),
            dec!(33030),
            dec!(41234.56),
            dec!(99999.99),
            dec!(247725),
            dec!(1000000),
        ] {
            let month = calculator
                .compute_net_salary(gross, MaritalStatus::MarriedSpouseWorking, 2)
                .unwrap();
            let d = &month.deductions;

            assert_eq!(
                d.total,
                d.social_security + d.unemployment + d.income_tax + d.stamp_tax
            );
            assert_eq!(month.net, gross - d.total);
            assert!(month.net <= gross);
            assert!(d.income_tax >= Decimal::ZERO);
        }
    }

    #[test]
    fn employer_cost_overflow_is_an_error() {
        let tables = RateTables::default_2026();

        let result = compute_net_salary(Decimal::MAX, MaritalStatus::Single, 0, &tables);

        assert_eq!(result, Err(SalaryError::Overflow(Decimal::MAX)));
    }

    #[test]
    fn negative_gross_is_rejected() {
        let tables = RateTables::default_2026();

        let result = compute_net_salary(dec!(-1), MaritalStatus::Single, 0, &tables);

        assert_eq!(result, Err(SalaryError::NegativeGross(dec!(-1))));
    }

    #[test]
    fn malformed_brackets_surface_as_tax_error() {
        let mut tables = RateTables::default_2026();
        tables.income_tax_brackets.clear();

        let result = compute_net_salary(dec!(50000), MaritalStatus::Single, 0, &tables);

        assert_eq!(result, Err(SalaryError::Tax(TaxError::NoTaxBrackets)));
    }

    // =========================================================================
    // compute_annual_payroll tests
    // =========================================================================

    #[test]
    fn annual_payroll_has_twelve_months() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let year = calculator
            .compute_annual_payroll(dec!(100000), MaritalStatus::Single, 0)
            .unwrap();

        assert_eq!(year.months.len(), 12);
        assert_eq!(year.total_gross, dec!(1200000));
        assert_eq!(year.total_net, dec!(802719.00));
    }

    #[test]
    fn annual_payroll_tracks_bracket_creep() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let year = calculator
            .compute_annual_payroll(dec!(100000), MaritalStatus::Single, 0)
            .unwrap();

        assert_eq!(year.months[0].deductions.income_tax, dec!(10272.75));
        // Cumulative base crosses 190000 in March.
        assert_eq!(year.months[2].deductions.income_tax, dec!(13522.75));
        assert_eq!(year.months[11].deductions.income_tax, dec!(20472.75));
        assert!(year.months[11].net < year.months[0].net);
    }

    #[test]
    fn annual_payroll_totals_match_months() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let year = calculator
            .compute_annual_payroll(dec!(75000), MaritalStatus::MarriedSpouseNotWorking, 1)
            .unwrap();

        let income_tax: Decimal = year.months.iter().map(|m| m.deductions.income_tax).sum();
        let employer_cost: Decimal = year.months.iter().map(|m| m.employer_cost).sum();
        assert_eq!(year.total_income_tax, income_tax);
        assert_eq!(year.total_employer_cost, employer_cost);
    }

    #[test]
    fn annual_payroll_overflow_is_an_error() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);
        let gross = Decimal::MAX / dec!(4);

        let result = calculator.compute_annual_payroll(gross, MaritalStatus::Single, 0);

        assert!(result.is_err());
    }

    #[test]
    fn minimum_wage_stays_tax_free_all_year() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let year = calculator
            .compute_annual_payroll(dec!(33030), MaritalStatus::Single, 0)
            .unwrap();

        assert_eq!(year.total_income_tax, dec!(0));
        assert!(year.months.iter().all(|m| m.net == dec!(28075.50)));
    }

    // =========================================================================
    // gross_up tests
    // =========================================================================

    #[test]
    fn gross_up_inverts_net_salary() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let gross = calculator
            .gross_up(dec!(38222.75), MaritalStatus::Single, 0)
            .unwrap();

        assert!((gross - dec!(50000)).abs() <= dec!(0.02));
    }

    #[test]
    fn gross_up_finds_minimum_wage_exactly() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let gross = calculator
            .gross_up(dec!(28075.50), MaritalStatus::Single, 0)
            .unwrap();

        assert_eq!(gross, dec!(33030.00));
    }

    #[test]
    fn gross_up_below_exempt_net_lands_above_minimum_wage() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let gross = calculator
            .gross_up(dec!(27000), MaritalStatus::Single, 0)
            .unwrap();
        let net = calculator
            .compute_net_salary(gross, MaritalStatus::Single, 0)
            .unwrap()
            .net;

        assert!(gross > dec!(33030));
        assert!((net - dec!(27000)).abs() <= dec!(0.05), "gross {gross} gave net {net}");
    }

    #[test]
    fn gross_up_huge_target_diverges() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        let result = calculator.gross_up(Decimal::MAX, MaritalStatus::Single, 0);

        assert_eq!(result, Err(SalaryError::GrossUpDiverged(Decimal::MAX)));
    }

    #[test]
    fn gross_up_net_lands_within_a_few_cents() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        for target in [dec!(30000), dec!(65000), dec!(150000), dec!(400000)] {
            let gross = calculator
                .gross_up(target, MaritalStatus::MarriedSpouseWorking, 1)
                .unwrap();
            let net = calculator
                .compute_net_salary(gross, MaritalStatus::MarriedSpouseWorking, 1)
                .unwrap()
                .net;

            assert!((net - target).abs() <= dec!(0.05), "target {target} gave net {net}");
        }
    }

    #[test]
    fn gross_up_rejects_non_positive_target() {
        let tables = RateTables::default_2026();
        let calculator = SalaryCalculator::new(&tables);

        assert_eq!(
            calculator.gross_up(dec!(0), MaritalStatus::Single, 0),
            Err(SalaryError::NonPositiveTarget(dec!(0)))
        );
    }
}
