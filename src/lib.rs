//! Pitch Deck Analyzer
//!
//! Accepts a pitch deck (PDF) and financial statements (CSV / Excel) and
//! produces a three-section report:
//! - a qualitative critique of the deck from a generative text service
//! - the latest revenue growth rate
//! - a valuation from closed-form DCF / multiple formulas
//!
//! PIPELINE:
//! INPUT CHECK → EXTRACT → ANALYZE → REPORT

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod schema;

#[cfg(test)]
mod test_support;

pub use error::{AnalysisError, Result};

// Re-export common types
pub use models::*;
pub use pipeline::{AnalysisRequest, Analyzer};
pub use report::Report;
