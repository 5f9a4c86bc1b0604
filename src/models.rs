//! Core data models for the analyzer

use crate::error::AnalysisError;
use crate::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

//
// ================= Media Kind =================
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Pdf,
    Csv,
    Xlsx,
    Xls,
    Other(String),
}

impl MediaKind {
    /// Resolve the declared media kind of an upload.
    ///
    /// Accepts MIME types and short names. Generic declarations
    /// (`application/octet-stream` or nothing at all) fall back to the
    /// filename extension.
    pub fn from_declared(declared: &str, filename: &str) -> Self {
        // Parameters such as `; charset=utf-8` do not change the kind
        let declared = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match declared.as_str() {
            "application/pdf" | "pdf" => MediaKind::Pdf,
            "text/csv" | "csv" => MediaKind::Csv,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" | "xlsx" => {
                MediaKind::Xlsx
            }
            "application/vnd.ms-excel" | "xls" => MediaKind::Xls,
            "" | "application/octet-stream" => Self::from_extension(filename),
            _ => MediaKind::Other(declared),
        }
    }

    fn from_extension(filename: &str) -> Self {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => MediaKind::Pdf,
            "csv" => MediaKind::Csv,
            "xlsx" => MediaKind::Xlsx,
            "xls" => MediaKind::Xls,
            _ => MediaKind::Other(extension),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Pdf => write!(f, "pdf"),
            MediaKind::Csv => write!(f, "csv"),
            MediaKind::Xlsx => write!(f, "xlsx"),
            MediaKind::Xls => write!(f, "xls"),
            MediaKind::Other(kind) if kind.is_empty() => write!(f, "unknown"),
            MediaKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

//
// ================= Document =================
//

/// An uploaded file, alive for a single request
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub kind: MediaKind,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, kind: MediaKind, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            kind,
            bytes,
        }
    }

    /// SHA-256 of the raw bytes, hex encoded
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    pub fn source(&self) -> SourceDocument {
        SourceDocument {
            filename: self.filename.clone(),
            kind: self.kind.to_string(),
            sha256: self.fingerprint(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub filename: String,
    pub kind: String,
    pub sha256: String,
}

//
// ================= Financial Table =================
//

/// Rows of a financial statement in chronological order.
///
/// Column names are kept exactly as they appear in the header row.
/// Cells that are blank or not numeric are absent from their row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialTable {
    columns: Vec<String>,
    rows: Vec<HashMap<String, f64>>,
}

impl FinancialTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: HashMap<String, f64>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[HashMap<String, f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Numeric values of a column in row order, skipping rows where the
    /// cell is blank or non-numeric.
    ///
    /// Fails only when the header lacks the column.
    pub fn values(&self, name: &str) -> Result<Vec<f64>> {
        if !self.has_column(name) {
            return Err(AnalysisError::MissingColumn(name.to_string()));
        }

        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(name).copied())
            .collect())
    }

    /// The value of one cell. `index` is 0-based; errors report rows 1-based.
    pub fn value_at(&self, index: usize, name: &str) -> Result<f64> {
        if !self.has_column(name) {
            return Err(AnalysisError::MissingColumn(name.to_string()));
        }

        self.rows
            .get(index)
            .and_then(|row| row.get(name).copied())
            .ok_or_else(|| AnalysisError::InvalidValue {
                column: name.to_string(),
                row: index + 1,
            })
    }
}

//
// ================= Report Section =================
//

/// Outcome of one report section: content, or the reason it is missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "content", rename_all = "lowercase")]
pub enum Section {
    Available(String),
    Unavailable(String),
}

impl Section {
    pub fn is_available(&self) -> bool {
        matches!(self, Section::Available(_))
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Section::Available(text) => Some(text),
            Section::Unavailable(_) => None,
        }
    }
}

impl From<Result<String>> for Section {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => Section::Available(text),
            Err(e) => Section::Unavailable(e.to_string()),
        }
    }
}
