mod calculator;
mod loan_category;
mod marital_status;
mod rate_tables;
mod surcharge;
mod tax_bracket;

pub use calculator::CalculatorMetadata;
pub use loan_category::LoanCategory;
pub use marital_status::MaritalStatus;
pub use rate_tables::{PayrollRates, PensionRules, RateTableError, RateTables, TaxCreditRules};
pub use surcharge::{Surcharge, SurchargeBase};
pub use tax_bracket::TaxBracket;
