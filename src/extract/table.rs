//! Financial statement extraction (CSV and Excel workbooks)

use crate::error::AnalysisError;
use crate::models::{Document, FinancialTable, MediaKind};
use crate::Result;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::debug;

/// Parse an uploaded statement into a table, dispatching on its media kind
pub fn extract_table(document: &Document) -> Result<FinancialTable> {
    let table = match &document.kind {
        MediaKind::Csv => parse_csv(&document.bytes)?,
        MediaKind::Xlsx | MediaKind::Xls => parse_workbook(&document.bytes)?,
        other => {
            return Err(AnalysisError::UnsupportedFormat(format!(
                "financial statements must be CSV or Excel, got {} ({})",
                other, document.filename
            )))
        }
    };

    debug!(
        filename = %document.filename,
        columns = ?table.columns(),
        rows = table.len(),
        "Extracted financial table"
    );

    Ok(table)
}

fn parse_csv(bytes: &[u8]) -> Result<FinancialTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = FinancialTable::new(headers.clone());

    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .zip(record.iter())
            .filter_map(|(column, raw)| parse_number(raw).map(|value| (column.clone(), value)))
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

/// First sheet only; its first row is the header
fn parse_workbook(bytes: &[u8]) -> Result<FinancialTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AnalysisError::ExtractionError("workbook has no sheets".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|cell| cell.to_string()).collect(),
        None => return Ok(FinancialTable::default()),
    };

    let mut table = FinancialTable::new(headers.clone());

    for cells in rows {
        let row: HashMap<String, f64> = headers
            .iter()
            .zip(cells.iter())
            .filter(|(column, _)| !column.is_empty())
            .filter_map(|(column, cell)| cell_value(cell).map(|value| (column.clone(), value)))
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

fn cell_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(value) => Some(*value as f64),
        Data::Float(value) => Some(*value).filter(|v| v.is_finite()),
        Data::String(raw) => parse_number(raw),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_doc(body: &str) -> Document {
        Document::new("financials.csv", MediaKind::Csv, body.as_bytes().to_vec())
    }

    #[test]
    fn test_csv_rows_in_order() {
        let table = extract_table(&csv_doc(
            "Year,Revenue,Free Cash Flow\n2021,100,10\n2022,110,12\n2023,121,13\n",
        ))
        .unwrap();

        assert_eq!(table.columns(), ["Year", "Revenue", "Free Cash Flow"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.values("Revenue").unwrap(), vec![100.0, 110.0, 121.0]);
        assert_eq!(table.values("Year").unwrap(), vec![2021.0, 2022.0, 2023.0]);
    }

    #[test]
    fn test_csv_headers_are_verbatim() {
        let table = extract_table(&csv_doc("Year, Revenue\n2021, 100\n")).unwrap();

        assert!(table.has_column(" Revenue"));
        assert!(!table.has_column("Revenue"));
        assert_eq!(table.values(" Revenue").unwrap(), vec![100.0]);
    }

    #[test]
    fn test_csv_blank_and_text_cells_are_absent() {
        let table = extract_table(&csv_doc("Year,Revenue,Notes\n2021,,seed\n")).unwrap();

        let row = &table.rows()[0];
        assert_eq!(row.get("Year"), Some(&2021.0));
        assert!(row.get("Revenue").is_none());
        assert!(row.get("Notes").is_none());
    }

    #[test]
    fn test_csv_header_only() {
        let table = extract_table(&csv_doc("Year,Revenue\n")).unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("Revenue"));
    }

    #[test]
    fn test_ragged_csv_fails() {
        let result = extract_table(&csv_doc("Year,Revenue\n2021,1,2\n"));
        assert!(matches!(result, Err(AnalysisError::CsvError(_))));
    }

    #[test]
    fn test_unsupported_kind() {
        let doc = Document::new("deck.pdf", MediaKind::Pdf, b"%PDF-1.4".to_vec());
        assert!(matches!(
            extract_table(&doc),
            Err(AnalysisError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_corrupt_workbook_fails() {
        let doc = Document::new("financials.xlsx", MediaKind::Xlsx, b"plain text".to_vec());
        assert!(extract_table(&doc).is_err());
    }

    fn two_sheet_workbook() -> Vec<u8> {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Statement").unwrap();
            sheet.write_string(0, 0, "Year").unwrap();
            sheet.write_string(0, 1, "Revenue").unwrap();
            for (row, (year, revenue)) in [(2021.0, 100.0), (2022.0, 110.0), (2023.0, 121.0)]
                .into_iter()
                .enumerate()
            {
                let row = row as u32 + 1;
                sheet.write_number(row, 0, year).unwrap();
                sheet.write_number(row, 1, revenue).unwrap();
            }
        }
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Notes").unwrap();
            sheet.write_string(0, 0, "Quarter").unwrap();
            sheet.write_string(0, 1, "Headcount").unwrap();
            sheet.write_number(1, 0, 1.0).unwrap();
            sheet.write_number(1, 1, 12.0).unwrap();
        }

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_xlsx_reads_first_sheet_in_row_order() {
        let doc = Document::new("financials.xlsx", MediaKind::Xlsx, two_sheet_workbook());
        let table = extract_table(&doc).unwrap();

        assert_eq!(table.columns(), ["Year", "Revenue"]);
        assert!(!table.has_column("Headcount"));
        assert_eq!(table.values("Year").unwrap(), vec![2021.0, 2022.0, 2023.0]);
        assert_eq!(table.values("Revenue").unwrap(), vec![100.0, 110.0, 121.0]);
        assert_eq!(
            crate::analysis::growth_rate(&table).unwrap(),
            "Latest revenue growth rate: 10.00%"
        );
    }

    #[test]
    fn test_xlsx_declared_by_extension() {
        let kind = MediaKind::from_declared("application/octet-stream", "financials.xlsx");
        let doc = Document::new("financials.xlsx", kind, two_sheet_workbook());

        assert_eq!(extract_table(&doc).unwrap().len(), 3);
    }

    #[test]
    fn test_workbook_cell_values() {
        assert_eq!(cell_value(&Data::Int(42)), Some(42.0));
        assert_eq!(cell_value(&Data::Float(1.5)), Some(1.5));
        assert_eq!(cell_value(&Data::String(" 7.25 ".to_string())), Some(7.25));
        assert_eq!(cell_value(&Data::String("n/a".to_string())), None);
        assert_eq!(cell_value(&Data::Bool(true)), None);
        assert_eq!(cell_value(&Data::Empty), None);
    }
}
