//! Error types for the pitch deck analyzer

use thiserror::Error;

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {

    // =============================
    // Extraction Errors
    // =============================

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // =============================
    // Computation Errors
    // =============================

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in column '{column}' at row {row}")]
    InvalidValue { column: String, row: usize },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Undefined valuation: {0}")]
    UndefinedValuation(String),

    // =============================
    // Pipeline Errors
    // =============================

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
