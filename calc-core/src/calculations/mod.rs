//! Calculation engines behind the calculator pages.
//!
//! Every engine is a pure function of its inputs and the injected
//! [`RateTables`](crate::RateTables); nothing is cached between calls.

pub mod common;
pub mod loan;
pub mod pension;
pub mod salary;
pub mod tax;

pub use loan::{
    AmortizationRow, LoanCalculator, LoanCost, LoanError, LoanTerms, SurchargeAmount,
    generate_schedule, monthly_payment,
};
pub use pension::{PensionError, StateContribution, compute_state_contribution};
pub use salary::{
    AnnualPayroll, EmployeeDeductions, EmployerContributions, SalaryBreakdown, SalaryCalculator,
    SalaryError, compute_net_salary,
};
pub use tax::{
    BracketTaxCalculator, TaxBreakdownLine, TaxComputation, TaxError, compute_tax,
    compute_tax_cumulative,
};
