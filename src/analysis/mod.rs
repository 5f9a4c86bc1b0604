//! Valuation & narrative engine
//!
//! Three independent computations. Each returns its own `Result` so the
//! report can show whichever succeeded.

pub mod format;
pub mod growth;
pub mod narrative;
pub mod valuation;

pub use growth::growth_rate;
pub use narrative::narrative_analysis;
pub use valuation::{valuation, ValuationConfig, ValuationModel};
