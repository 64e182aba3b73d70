pub mod error;
pub mod importer;

// Re-export commonly used types
pub use error::{EngineError, ProductImportError};
pub use importer::{PriceImporter, ProductPriceGroups, group_by_product};
