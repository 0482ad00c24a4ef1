pub mod catalog;
pub mod input;
pub mod loader;
pub mod logging;
pub mod rate_tables;

pub use catalog::{Catalog, CatalogError};
pub use input::{InputError, Locale};
pub use loader::{BracketLoader, BracketLoaderError, BracketRecord};
pub use rate_tables::{RateTableLoadError, load_rate_tables, parse_rate_tables};
