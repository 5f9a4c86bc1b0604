//! Extractors for uploaded documents
//!
//! Pure functions over in-memory bytes. No I/O beyond reading the input.

pub mod pdf;
pub mod table;

pub use pdf::extract_text;
pub use table::extract_table;
