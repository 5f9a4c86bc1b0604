//! Canonical financial statement schema
//!
//! Column names must match the uploaded header row exactly.

use crate::Result;

pub const YEAR: &str = "Year";
pub const REVENUE: &str = "Revenue";
pub const COST_OF_GOODS_SOLD: &str = "Cost of Goods Sold";
pub const GROSS_PROFIT: &str = "Gross Profit";
pub const OPERATING_EXPENSES: &str = "Operating Expenses";
pub const NET_INCOME: &str = "Net Income";
pub const FREE_CASH_FLOW: &str = "Free Cash Flow";

/// Template columns, in download order
pub const TEMPLATE_COLUMNS: [&str; 7] = [
    YEAR,
    REVENUE,
    COST_OF_GOODS_SOLD,
    GROSS_PROFIT,
    OPERATING_EXPENSES,
    NET_INCOME,
    FREE_CASH_FLOW,
];

pub const TEMPLATE_YEARS: [u32; 3] = [2021, 2022, 2023];

pub const TEMPLATE_FILENAME: &str = "financial_statement_template.csv";

/// Build the downloadable template: one row per year, zero placeholders
pub fn financial_template_csv() -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(TEMPLATE_COLUMNS)?;

        for year in TEMPLATE_YEARS {
            let mut record = vec![year.to_string()];
            record.extend(std::iter::repeat("0".to_string()).take(TEMPLATE_COLUMNS.len() - 1));
            writer.write_record(&record)?;
        }

        writer.flush()?;
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
