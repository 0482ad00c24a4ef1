use std::io::Read;

use calc_core::TaxBracket;
use calc_core::calculations::TaxError;
use calc_core::calculations::tax::validate_brackets;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading income tax bracket data.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("No brackets for year {0}")]
    YearNotFound(i32),

    #[error("Invalid brackets for year {year}: {source}")]
    InvalidTable {
        year: i32,
        #[source]
        source: TaxError,
    },
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the income tax brackets CSV file.
///
/// - `year`: the tax year (e.g., 2026)
/// - `min_income`: lower bound of the bracket
/// - `max_income`: upper bound (empty for the open top bracket)
/// - `rate`: marginal rate as a fraction (e.g., 0.15 for 15%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub year: i32,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for income tax bracket tables kept as CSV.
///
/// One file may hold several years; [`brackets_for_year`](Self::brackets_for_year)
/// picks one out and checks it forms a valid table.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from any CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// The bracket table for `year`, sorted by `min_income` and validated.
    pub fn brackets_for_year(
        records: &[BracketRecord],
        year: i32,
    ) -> Result<Vec<TaxBracket>, BracketLoaderError> {
        let mut brackets: Vec<TaxBracket> = records
            .iter()
            .filter(|r| r.year == year)
            .map(|r| TaxBracket {
                min_income: r.min_income,
                max_income: r.max_income,
                rate: r.rate,
            })
            .collect();

        if brackets.is_empty() {
            return Err(BracketLoaderError::YearNotFound(year));
        }

        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        validate_brackets(&brackets)
            .map_err(|source| BracketLoaderError::InvalidTable { year, source })?;

        tracing::debug!(year, count = brackets.len(), "loaded income tax brackets");
        Ok(brackets)
    }
}
