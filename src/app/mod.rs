pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use cli::{CliApp, exit_code, init_tracing};
pub use config::{CliArgs, ImportConfig};
pub use error::AppError;
