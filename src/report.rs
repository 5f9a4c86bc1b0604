//! Report assembly
//!
//! A report always carries exactly three sections, in a fixed order.
//! Missing results are rendered with an explicit marker.

use crate::models::{Section, SourceDocument};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PITCH_DECK_TITLE: &str = "Pitch Deck Analysis";
pub const FINANCIAL_TITLE: &str = "Financial Analysis";
pub const VALUATION_TITLE: &str = "Valuation Analysis";

pub const NOT_AVAILABLE: &str = "Not available";

pub const REPORT_FILENAME: &str = "pitch_deck_analysis_report.csv";

const REPORT_HEADING: &str = "AI-Powered Pitch Deck and Financial Analysis";
const REPORT_FOOTER: &str = "This report is generated automatically and is not investment advice. \
Valuation figures rely on the uploaded statements and fixed model assumptions.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub sources: Vec<SourceDocument>,
    pub pitch_deck_analysis: Section,
    pub financial_analysis: Section,
    pub valuation_analysis: Section,
}

impl Report {
    pub fn assemble(
        sources: Vec<SourceDocument>,
        pitch_deck_analysis: Section,
        financial_analysis: Section,
        valuation_analysis: Section,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            sources,
            pitch_deck_analysis,
            financial_analysis,
            valuation_analysis,
        }
    }

    /// Sections with their titles, in report order
    pub fn sections(&self) -> [(&'static str, &Section); 3] {
        [
            (PITCH_DECK_TITLE, &self.pitch_deck_analysis),
            (FINANCIAL_TITLE, &self.financial_analysis),
            (VALUATION_TITLE, &self.valuation_analysis),
        ]
    }

    pub fn available_count(&self) -> usize {
        self.sections()
            .iter()
            .filter(|(_, section)| section.is_available())
            .count()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", REPORT_HEADING));
        out.push_str(&format!("Report ID: {}\n", self.report_id));
        out.push_str(&format!("Generated: {}\n", self.generated_at.to_rfc3339()));
        for source in &self.sources {
            out.push_str(&format!(
                "Source: {} ({}, sha256 {})\n",
                source.filename, source.kind, source.sha256
            ));
        }

        for (title, section) in self.sections() {
            out.push_str(&format!("\n## {}\n\n{}\n", title, section_body(section)));
        }

        out.push_str(&format!("\n---\n{}\n", REPORT_FOOTER));
        out
    }

    /// Two-column `Section,Analysis` CSV, one row per section
    pub fn to_csv(&self) -> Result<String> {
        let mut buffer = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buffer);
            writer.write_record(["Section", "Analysis"])?;
            for (title, section) in self.sections() {
                writer.write_record([title, section_body(section).as_str()])?;
            }
            writer.flush()?;
        }

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn section_body(section: &Section) -> String {
    match section {
        Section::Available(text) if !text.trim().is_empty() => text.clone(),
        Section::Available(_) => format!("{}: empty result", NOT_AVAILABLE),
        Section::Unavailable(reason) => format!("{}: {}", NOT_AVAILABLE, reason),
    }
}
