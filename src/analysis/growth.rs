//! Revenue growth

use crate::error::AnalysisError;
use crate::models::FinancialTable;
use crate::schema::REVENUE;
use crate::Result;

/// Percent change of revenue between the last two periods
///
/// Only the last two rows are read; blanks in earlier periods are ignored.
pub fn latest_revenue_growth(table: &FinancialTable) -> Result<f64> {
    if !table.has_column(REVENUE) {
        return Err(AnalysisError::MissingColumn(REVENUE.to_string()));
    }

    let periods = table.len();
    if periods < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "growth rate needs at least two periods, found {}",
            periods
        )));
    }

    let prior = table.value_at(periods - 2, REVENUE)?;
    let latest = table.value_at(periods - 1, REVENUE)?;

    if prior == 0.0 {
        return Err(AnalysisError::DivisionByZero(
            "prior period revenue is zero".to_string(),
        ));
    }

    Ok(100.0 * (latest - prior) / prior)
}

pub fn growth_rate(table: &FinancialTable) -> Result<String> {
    let growth = latest_revenue_growth(table)?;
    Ok(format!("Latest revenue growth rate: {:.2}%", growth))
}
