//! Valuation models
//!
//! `Perpetuity`: mean free cash flow capitalized at (discount - growth).
//! `Blended`: discounted cash flow over a short projection plus a terminal
//! value, added to a revenue-based EBITDA multiple.

use crate::analysis::format::currency;
use crate::error::AnalysisError;
use crate::models::FinancialTable;
use crate::schema::{FREE_CASH_FLOW, REVENUE};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Periods projected when the projection is derived from the table
pub const PROJECTION_PERIODS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationModel {
    Perpetuity,
    Blended,
}

/// Explicit cash flow projection for the blended model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub cash_flows: Vec<f64>,
    pub terminal_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    pub model: ValuationModel,
    pub discount_rate: f64,
    pub terminal_growth_rate: f64,
    pub ebitda_multiple: f64,
    /// Fixed projection; derived from uploaded free cash flow when absent
    pub projection: Option<Projection>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            model: ValuationModel::Perpetuity,
            discount_rate: 0.10,
            terminal_growth_rate: 0.02,
            ebitda_multiple: 6.0,
            projection: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendedValuation {
    pub dcf_value: f64,
    pub multiple_value: f64,
}

impl BlendedValuation {
    pub fn total(&self) -> f64 {
        self.dcf_value + self.multiple_value
    }
}

pub fn valuation(table: &FinancialTable, config: &ValuationConfig) -> Result<String> {
    match config.model {
        ValuationModel::Perpetuity => {
            let value = perpetuity_value(table, config)?;
            Ok(format!("Valuation based on DCF model: {}", currency(value)))
        }
        ValuationModel::Blended => {
            let value = blended_value(table, config)?;
            Ok(format!(
                "Valuation based on DCF and EBITDA multiple: {} (DCF: {}, EBITDA multiple: {})",
                currency(value.total()),
                currency(value.dcf_value),
                currency(value.multiple_value)
            ))
        }
    }
}

/// mean(FCF) / (discount - growth), averaging the periods that have a value
pub fn perpetuity_value(table: &FinancialTable, config: &ValuationConfig) -> Result<f64> {
    let cash_flows = table.values(FREE_CASH_FLOW)?;
    let spread = capitalization_spread(config)?;

    if cash_flows.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "no free cash flow values".to_string(),
        ));
    }

    let mean = cash_flows.iter().sum::<f64>() / cash_flows.len() as f64;
    finite(mean / spread)
}

pub fn blended_value(table: &FinancialTable, config: &ValuationConfig) -> Result<BlendedValuation> {
    let revenue = table.values(REVENUE)?;
    let multiple_value = revenue.iter().sum::<f64>() * config.ebitda_multiple;

    let projection = match &config.projection {
        Some(projection) => projection.clone(),
        None => derived_projection(table, config)?,
    };

    let dcf_value = discounted_cash_flow(&projection, config.discount_rate)?;

    Ok(BlendedValuation {
        dcf_value,
        multiple_value: finite(multiple_value)?,
    })
}

/// Σ cf_t / (1+r)^t for t = 1..n, plus TV / (1+r)^n
pub fn discounted_cash_flow(projection: &Projection, discount_rate: f64) -> Result<f64> {
    if discount_rate <= -1.0 {
        return Err(AnalysisError::UndefinedValuation(format!(
            "discount rate {} is not above -100%",
            discount_rate
        )));
    }

    let factor = 1.0 + discount_rate;
    let periods = projection.cash_flows.len() as i32;

    let explicit: f64 = projection
        .cash_flows
        .iter()
        .zip(1..)
        .map(|(cash_flow, t)| cash_flow / factor.powi(t))
        .sum();

    finite(explicit + projection.terminal_value / factor.powi(periods))
}

/// Last periods of uploaded free cash flow, with a growing-perpetuity
/// terminal value on the final one
fn derived_projection(table: &FinancialTable, config: &ValuationConfig) -> Result<Projection> {
    let cash_flows = table.values(FREE_CASH_FLOW)?;
    let spread = capitalization_spread(config)?;

    let Some(last) = cash_flows.last().copied() else {
        return Err(AnalysisError::InsufficientData(
            "no free cash flow periods to project".to_string(),
        ));
    };

    let start = cash_flows.len().saturating_sub(PROJECTION_PERIODS);

    Ok(Projection {
        cash_flows: cash_flows[start..].to_vec(),
        terminal_value: finite(last * (1.0 + config.terminal_growth_rate) / spread)?,
    })
}

fn capitalization_spread(config: &ValuationConfig) -> Result<f64> {
    let spread = config.discount_rate - config.terminal_growth_rate;

    if spread <= 0.0 || !spread.is_finite() {
        return Err(AnalysisError::UndefinedValuation(format!(
            "discount rate {} must exceed terminal growth rate {}",
            config.discount_rate, config.terminal_growth_rate
        )));
    }

    Ok(spread)
}

fn finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::UndefinedValuation(
            "result is not a finite number".to_string(),
        ))
    }
}
