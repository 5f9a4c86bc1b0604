//! Qualitative pitch deck critique

use crate::error::AnalysisError;
use crate::generator::TextGenerator;
use crate::Result;
use tracing::info;

const PROMPT_PREFIX: &str = "Please analyze the following pitch deck and provide insights, \
key strengths, weaknesses, and opportunities.";

pub fn build_prompt(pitch_deck_text: &str) -> String {
    format!("{} {}", PROMPT_PREFIX, pitch_deck_text)
}

/// Ask the generator for a critique of the deck text; the response is
/// returned verbatim
pub async fn narrative_analysis(
    generator: &dyn TextGenerator,
    pitch_deck_text: &str,
) -> Result<String> {
    if pitch_deck_text.trim().is_empty() {
        return Err(AnalysisError::InsufficientData(
            "pitch deck contains no extractable text".to_string(),
        ));
    }

    let prompt = build_prompt(pitch_deck_text);
    let response = generator.generate(&prompt).await?;

    info!(response_chars = response.len(), "Narrative analysis completed");

    Ok(response)
}
