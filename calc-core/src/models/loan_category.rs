use serde::{Deserialize, Serialize};

/// Loan product type. Decides which surcharges apply to a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanCategory {
    Consumer,
    Vehicle,
    Mortgage,
    Education,
    Commercial,
}

impl LoanCategory {
    pub const ALL: [LoanCategory; 5] = [
        Self::Consumer,
        Self::Vehicle,
        Self::Mortgage,
        Self::Education,
        Self::Commercial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Vehicle => "vehicle",
            Self::Mortgage => "mortgage",
            Self::Education => "education",
            Self::Commercial => "commercial",
        }
    }

    /// Accepts the English codes as well as the Turkish product names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "consumer" | "ihtiyac" | "ihtiyaç" => Some(Self::Consumer),
            "vehicle" | "tasit" | "taşıt" => Some(Self::Vehicle),
            "mortgage" | "konut" => Some(Self::Mortgage),
            "education" | "egitim" | "eğitim" => Some(Self::Education),
            "commercial" | "ticari" => Some(Self::Commercial),
            _ => None,
        }
    }
}
