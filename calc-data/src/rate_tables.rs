//! Rate table files.
//!
//! A rate table is a TOML document mirroring [`RateTables`]. Decimal values
//! are written as strings so they reach the engines without a float
//! round-trip.

use std::fs;
use std::path::{Path, PathBuf};

use calc_core::{RateTableError, RateTables};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RateTableLoadError {
    #[error("cannot read rate table '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rate table is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("rate table failed validation: {0}")]
    Invalid(#[from] RateTableError),
}

/// Parses and validates a rate table document.
pub fn parse_rate_tables(contents: &str) -> Result<RateTables, RateTableLoadError> {
    let tables: RateTables = toml::from_str(contents)?;
    tables.validate()?;
    Ok(tables)
}

/// Reads, parses and validates the rate table at `path`.
pub fn load_rate_tables(path: &Path) -> Result<RateTables, RateTableLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| RateTableLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tables = parse_rate_tables(&contents)?;
    tracing::info!(path = %path.display(), year = tables.year, "loaded rate tables");
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use calc_core::LoanCategory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL: &str = r#"
year = 2026

[payroll]
minimum_wage = "33030.00"
employee_social_security_rate = "0.14"
employee_unemployment_rate = "0.01"
employer_social_security_rate = "0.1575"
employer_unemployment_rate = "0.02"
ceiling_multiplier = "7.5"
stamp_tax_rate = "0.00759"

[[income_tax_brackets]]
min_income = "0"
max_income = "190000"
rate = "0.15"

[[income_tax_brackets]]
min_income = "190000"
rate = "0.20"

[tax_credit]
single_percent = "50"
spouse_working_percent = "50"
spouse_not_working_percent = "60"
dependent_percents = ["7.5", "7.5", "10"]
additional_dependent_percent = "5"
max_percent = "85"

[[loan_surcharges]]
name = "KKDF"
base = "interest"
rate_percent = "15"
applies_to = ["consumer", "vehicle"]

[pension]
state_contribution_rate = "0.30"
annual_cap = "118908.00"
"#;

    #[test]
    fn parse_minimal_table() {
        let tables = parse_rate_tables(MINIMAL).expect("valid table");

        assert_eq!(tables.year, 2026);
        assert_eq!(tables.payroll.minimum_wage, dec!(33030.00));
        assert_eq!(tables.income_tax_brackets.len(), 2);
        assert_eq!(tables.income_tax_brackets[1].max_income, None);
        assert_eq!(
            tables.loan_surcharges[0].applies_to,
            vec![LoanCategory::Consumer, LoanCategory::Vehicle]
        );
        assert_eq!(tables.tax_credit.dependent_percents.len(), 3);
    }

    #[test]
    fn parse_rejects_percent_style_rates() {
        let broken = MINIMAL.replace(
            "employee_social_security_rate = \"0.14\"",
            "employee_social_security_rate = \"14\"",
        );

        let err = parse_rate_tables(&broken).unwrap_err();

        assert!(matches!(err, RateTableLoadError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn parse_rejects_missing_section() {
        let broken = MINIMAL.replace("[pension]", "[pension_rules]");

        let err = parse_rate_tables(&broken).unwrap_err();

        assert!(matches!(err, RateTableLoadError::Toml(_)), "got {err:?}");
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = load_rate_tables(Path::new("/nonexistent/rates.toml")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/rates.toml"));
    }
}
