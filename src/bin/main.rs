//! Command-line front end
//!
//! analyzer <pitch_deck.pdf> <financials.csv|xlsx> [report.csv]
//! analyzer template [path]

use pitch_deck_analyzer::{
    config::AppConfig,
    generator::GeminiClient,
    models::{Document, MediaKind},
    pipeline::{AnalysisRequest, Analyzer},
    schema::{financial_template_csv, TEMPLATE_FILENAME},
};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:\n  analyzer <pitch_deck.pdf> <financials.csv|xlsx> [report.csv]\n  analyzer template [path]";

async fn load_document(path: &str) -> Result<Document, Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    let filename = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let kind = MediaKind::from_declared("", &filename);

    Ok(Document::new(filename, kind, bytes))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [command, rest @ ..] if command == "template" && rest.len() <= 1 => {
            let path = rest.first().map(String::as_str).unwrap_or(TEMPLATE_FILENAME);
            tokio::fs::write(path, financial_template_csv()?).await?;
            println!("Template written to {}", path);
            Ok(())
        }
        [pitch_deck, financials, rest @ ..] if rest.len() <= 1 => {
            let config = AppConfig::from_env()?;
            if config.gemini.api_key.is_empty() {
                eprintln!("GEMINI_API_KEY not set; pitch deck analysis will be unavailable");
            }

            let generator = GeminiClient::new(&config.gemini)?;
            let analyzer = Analyzer::new(Box::new(generator), config.valuation.clone());

            let request = AnalysisRequest {
                pitch_deck: Some(load_document(pitch_deck).await?),
                financials: Some(load_document(financials).await?),
            };

            let report = analyzer.analyze(request).await?;
            println!("{}", report.render_text());

            if let Some(path) = rest.first() {
                tokio::fs::write(path, report.to_csv()?).await?;
                info!(path = %path, "Report written");
                println!("Report written to {}", path);
            }

            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}
