pub mod calculations;
pub mod models;
pub mod related;

pub use models::*;
