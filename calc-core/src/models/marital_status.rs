use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    MarriedSpouseWorking,
    MarriedSpouseNotWorking,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 3] = [
        Self::Single,
        Self::MarriedSpouseWorking,
        Self::MarriedSpouseNotWorking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedSpouseWorking => "married_spouse_working",
            Self::MarriedSpouseNotWorking => "married_spouse_not_working",
        }
    }

    /// Accepts the English codes as well as the Turkish form labels.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" | "bekar" | "bekâr" => Some(Self::Single),
            "married_spouse_working" | "evli_es_calisiyor" => Some(Self::MarriedSpouseWorking),
            "married_spouse_not_working" | "evli_es_calismiyor" => {
                Some(Self::MarriedSpouseNotWorking)
            }
            _ => None,
        }
    }
}
