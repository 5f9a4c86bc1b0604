//! Analysis pipeline
//!
//! INPUT CHECK → EXTRACT (text ∥ table) → ANALYZE → REPORT
//!
//! Every stage after the input check recovers locally: a failure becomes
//! an unavailable section and the remaining sections are still computed.

use crate::analysis::{growth_rate, narrative_analysis, valuation, ValuationConfig};
use crate::error::AnalysisError;
use crate::extract::{extract_table, extract_text};
use crate::generator::TextGenerator;
use crate::models::{Document, Section};
use crate::report::Report;
use crate::Result;
use std::time::Instant;
use tracing::{info, warn};

pub const MISSING_INPUT_GUIDANCE: &str =
    "Please upload both the pitch deck and financial statements to get started.";

/// Inputs for one analysis run
#[derive(Debug, Default)]
pub struct AnalysisRequest {
    pub pitch_deck: Option<Document>,
    pub financials: Option<Document>,
}

/// Runs the pipeline; holds no per-request state
pub struct Analyzer {
    generator: Box<dyn TextGenerator>,
    valuation: ValuationConfig,
}

impl Analyzer {
    pub fn new(generator: Box<dyn TextGenerator>, valuation: ValuationConfig) -> Self {
        Self {
            generator,
            valuation,
        }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<Report> {
        let start_time = Instant::now();

        let (Some(pitch_deck), Some(financials)) = (request.pitch_deck, request.financials) else {
            warn!("Analysis requested without both uploads");
            return Err(AnalysisError::MissingInput(MISSING_INPUT_GUIDANCE.to_string()));
        };

        info!(
            pitch_deck = %pitch_deck.filename,
            financials = %financials.filename,
            "Analyzer: starting run"
        );

        let sources = vec![pitch_deck.source(), financials.source()];

        // === EXTRACT ===
        let (text, table) = tokio::join!(
            run_blocking(move || extract_text(&pitch_deck)),
            run_blocking(move || extract_table(&financials)),
        );

        // === ANALYZE ===
        let narrative = match text {
            Ok(text) => narrative_analysis(self.generator.as_ref(), &text).await,
            Err(e) => Err(e),
        };
        let narrative = into_section("pitch_deck_analysis", narrative);

        let (growth_section, valuation_section) = match &table {
            Ok(table) => (
                into_section("financial_analysis", growth_rate(table)),
                into_section("valuation_analysis", valuation(table, &self.valuation)),
            ),
            Err(e) => {
                warn!(error = %e, "Financial statements could not be read");
                let reason = format!("financial statements could not be read ({})", e);
                (
                    Section::Unavailable(reason.clone()),
                    Section::Unavailable(reason),
                )
            }
        };

        // === REPORT ===
        let report = Report::assemble(sources, narrative, growth_section, valuation_section);

        info!(
            report_id = %report.report_id,
            available_sections = report.available_count(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Analyzer: run complete"
        );

        Ok(report)
    }
}

fn into_section(name: &str, result: Result<String>) -> Section {
    if let Err(e) = &result {
        warn!(section = name, error = %e, "Section unavailable");
    }
    Section::from(result)
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        AnalysisError::ExtractionError(format!("extraction task failed: {}", e))
    })?
}
