//! Calculator catalog used to build "related calculators" lists.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use calc_core::CalculatorMetadata;
use calc_core::related::related_for;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("calculator id '{0}' appears more than once")]
    DuplicateId(String),

    #[error("no calculator with id '{0}'")]
    UnknownId(String),
}

/// One locale's list of calculator pages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub calculators: Vec<CalculatorMetadata>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Catalog {
    /// Parses a catalog document and checks ids are unique.
    pub fn parse(contents: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(contents)?;

        let mut seen = HashSet::new();
        for calculator in &catalog.calculators {
            if !seen.insert(calculator.id.as_str()) {
                return Err(CatalogError::DuplicateId(calculator.id.clone()));
            }
        }

        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&contents)?;
        tracing::info!(
            path = %path.display(),
            locale = %catalog.locale,
            count = catalog.calculators.len(),
            "loaded calculator catalog"
        );
        Ok(catalog)
    }

    pub fn find(
        &self,
        id: &str,
    ) -> Option<&CalculatorMetadata> {
        self.calculators.iter().find(|c| c.id == id)
    }

    /// Related calculators for the page `id`.
    pub fn related(
        &self,
        id: &str,
        max_results: usize,
    ) -> Result<Vec<&CalculatorMetadata>, CatalogError> {
        let source = self
            .find(id)
            .ok_or_else(|| CatalogError::UnknownId(id.to_string()))?;
        Ok(related_for(source, &self.calculators, max_results))
    }
}
