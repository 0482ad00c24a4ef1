use serde::{Deserialize, Serialize};

/// Catalog entry describing one calculator page, used for related-content ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorMetadata {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub name: String,

    /// Hand-picked related calculator ids, resolved before the scored ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_ids: Option<Vec<String>>,
}
