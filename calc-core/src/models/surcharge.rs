use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::LoanCategory;

/// What a surcharge percentage is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeBase {
    /// Percentage points added straight onto the nominal annual rate.
    RatePoints,
    /// Percentage of the interest charge; adds `nominal × rate_percent / 100`
    /// to the effective rate.
    Interest,
    /// One-off fee on the principal. Paid up front, never amortized.
    Principal,
}

/// A jurisdiction-mandated charge layered onto a loan (e.g. KKDF, BSMV).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surcharge {
    pub name: String,
    pub base: SurchargeBase,
    pub rate_percent: Decimal,
    pub applies_to: Vec<LoanCategory>,
}

impl Surcharge {
    pub fn applies(
        &self,
        category: LoanCategory,
    ) -> bool {
        self.applies_to.contains(&category)
    }

    /// Percentage points this surcharge adds to the annual rate.
    ///
    /// Principal-based fees do not touch the rate and contribute zero.
    pub fn rate_contribution(
        &self,
        nominal_rate_percent: Decimal,
    ) -> Decimal {
        match self.base {
            SurchargeBase::RatePoints => self.rate_percent,
            SurchargeBase::Interest => {
                nominal_rate_percent * self.rate_percent / Decimal::ONE_HUNDRED
            }
            SurchargeBase::Principal => Decimal::ZERO,
        }
    }
}
