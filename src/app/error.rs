use std::io;
use thiserror::Error;

use crate::engine::EngineError;
use crate::io::IoError;
use crate::storage::StorageError;
use crate::streaming::PipelineError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV IO error: {0}")]
    CsvIo(#[from] IoError),

    #[error("Import error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            AppError::InvalidConfig("chunk size must be at least 1".to_string()).to_string(),
            "Invalid configuration: chunk size must be at least 1"
        );
        assert_eq!(
            AppError::from(PipelineError::Cancelled).to_string(),
            "Import error: processing cancelled"
        );
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err = AppError::from(io_err);

        match app_err {
            AppError::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn pipeline_error_conversion() {
        let app_err = AppError::from(PipelineError::InvalidInput("x".to_string()));

        match app_err {
            AppError::Pipeline(PipelineError::InvalidInput(_)) => {}
            _ => panic!("Expected Pipeline error variant"),
        }
    }
}
