//! `.xlsx` export and import.
//!
//! Both directions use one sheet with the header row
//! `Дата | Приход | Расход | Наименование` (date, income, expense,
//! description). Each transaction is one row with its amount in either the
//! income or the expense column and `0` in the other.

use std::io::Cursor;

use anyhow::Context;
use calamine::{Data, DataType, Reader, Xlsx, open_workbook_from_rs};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use tally_core::{AppError, AppResult, forms::{DATE_FORMAT, non_empty}};

use crate::models::{NewTransaction, Transaction, TransactionKind};

pub const DATE_HEADER: &str = "Дата";
pub const INCOME_HEADER: &str = "Приход";
pub const EXPENSE_HEADER: &str = "Расход";
pub const DESCRIPTION_HEADER: &str = "Наименование";

pub const HEADERS: [&str; 4] = [DATE_HEADER, INCOME_HEADER, EXPENSE_HEADER, DESCRIPTION_HEADER];

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const EXPORT_FILENAME: &str = "transactions.xlsx";

/// Categories given to imported rows; the sheet has no category column.
pub const IMPORTED_INCOME_CATEGORY: &str = "Imported income";
pub const IMPORTED_EXPENSE_CATEGORY: &str = "Imported expenses";

// =============================================================================
// Export
// =============================================================================

/// Serialize `transactions` to an `.xlsx` workbook.
pub fn export_xlsx(transactions: &[Transaction]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Transactions").context("naming worksheet")?;
    for (col, header) in (0u16..).zip(HEADERS) {
        sheet
            .write_string_with_format(0, col, header, &bold)
            .context("writing header")?;
    }
    sheet.set_column_width(0, 12).context("sizing columns")?;
    sheet.set_column_width(3, 40).context("sizing columns")?;

    for (i, t) in transactions.iter().enumerate() {
        let row = u32::try_from(i + 1).context("too many rows for a worksheet")?;
        let (income, expense) = match t.kind {
            TransactionKind::Income => (t.amount, 0.0),
            TransactionKind::Expense => (0.0, t.amount),
        };
        sheet
            .write_string(row, 0, t.date.format(DATE_FORMAT).to_string())
            .context("writing date")?;
        sheet.write_number(row, 1, income).context("writing income")?;
        sheet.write_number(row, 2, expense).context("writing expense")?;
        if let Some(description) = &t.description {
            sheet
                .write_string(row, 3, description)
                .context("writing description")?;
        }
    }

    let bytes = workbook.save_to_buffer().context("saving workbook")?;
    Ok(bytes)
}

// =============================================================================
// Import
// =============================================================================

/// Column positions found in the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    income: usize,
    expense: usize,
    description: usize,
}

impl Columns {
    fn locate(header: &[Data]) -> AppResult<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| matches!(cell, Data::String(s) if s.trim() == name))
                .ok_or_else(|| AppError::Spreadsheet(format!("missing column '{name}'")))
        };
        Ok(Self {
            date: find(DATE_HEADER)?,
            income: find(INCOME_HEADER)?,
            expense: find(EXPENSE_HEADER)?,
            description: find(DESCRIPTION_HEADER)?,
        })
    }
}

/// Parse the first sheet of an uploaded workbook into new transactions.
///
/// Any bad row fails the whole import. Blank rows and rows with neither an
/// income nor an expense amount are skipped.
pub fn import_xlsx(bytes: &[u8]) -> AppResult<Vec<NewTransaction>> {
    let mut workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
        .map_err(|e| AppError::Spreadsheet(format!("not a readable .xlsx file: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Spreadsheet("workbook has no sheets".to_string()))?
        .map_err(|e| AppError::Spreadsheet(format!("cannot read first sheet: {e}")))?;

    // 1-based sheet row of the header, for error messages.
    let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| AppError::Spreadsheet("sheet is empty".to_string()))?;
    let columns = Columns::locate(header)?;

    let mut parsed = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let line = header_line + i + 1;
        match parse_row(row, columns)
            .map_err(|msg| AppError::Spreadsheet(format!("row {line}: {msg}")))?
        {
            Some(tx) => parsed.push(tx),
            None => tracing::debug!(line, "skipping row without an amount"),
        }
    }
    Ok(parsed)
}

/// `None` when both amounts are zero: a zero-amount record carries no money.
fn parse_row(row: &[Data], columns: Columns) -> Result<Option<NewTransaction>, String> {
    let date = parse_date_cell(row.get(columns.date))?;
    let income = parse_amount_cell(row.get(columns.income), INCOME_HEADER)?;
    let expense = parse_amount_cell(row.get(columns.expense), EXPENSE_HEADER)?;
    let description = match row.get(columns.description) {
        None | Some(Data::Empty) => None,
        Some(Data::String(s)) => non_empty(s),
        Some(other) => Some(other.to_string()),
    };

    let (kind, amount, category) = if income > 0.0 {
        (TransactionKind::Income, income, IMPORTED_INCOME_CATEGORY)
    } else if expense > 0.0 {
        (TransactionKind::Expense, expense, IMPORTED_EXPENSE_CATEGORY)
    } else {
        return Ok(None);
    };

    Ok(Some(NewTransaction {
        date,
        amount,
        category: category.to_string(),
        kind,
        description,
    }))
}

fn parse_date_cell(cell: Option<&Data>) -> Result<NaiveDate, String> {
    match cell {
        None | Some(Data::Empty) => Err(format!("'{DATE_HEADER}' is empty")),
        Some(Data::String(s)) | Some(Data::DateTimeIso(s)) => parse_date_text(s),
        Some(cell @ Data::DateTime(_)) => cell
            .as_date()
            .ok_or_else(|| format!("invalid date '{cell}'")),
        Some(other) => Err(format!("invalid date '{other}'")),
    }
}

/// `YYYY-MM-DD`, optionally followed by a time.
fn parse_date_text(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    let day = raw.split([' ', 'T']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

/// Empty cells count as zero.
fn parse_amount_cell(cell: Option<&Data>, column: &str) -> Result<f64, String> {
    let value = match cell {
        None | Some(Data::Empty) => 0.0,
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::String(s)) if s.trim().is_empty() => 0.0,
        Some(Data::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| format!("invalid '{column}' value '{s}'"))?,
        Some(other) => return Err(format!("invalid '{column}' value '{other}'")),
    };
    if !value.is_finite() || value < 0.0 {
        return Err(format!("'{column}' must be a non-negative number"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::ExcelDateTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn tx(d: u32, amount: f64, kind: TransactionKind, description: Option<&str>) -> Transaction {
        Transaction {
            id: 0,
            date: day(d),
            amount,
            category: "Salary".into(),
            kind,
            description: description.map(str::to_string),
            user_id: 1,
        }
    }

    /// Build a workbook from string cells; `""` leaves the cell blank.
    fn workbook(rows: &[[&str; 4]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_round_trip_keeps_totals() {
        let original = vec![
            tx(1, 100.0, TransactionKind::Income, Some("Salary")),
            tx(5, 40.0, TransactionKind::Expense, None),
            tx(6, 2.5, TransactionKind::Expense, Some("Coffee")),
        ];
        let imported = import_xlsx(&export_xlsx(&original).unwrap()).unwrap();
        assert_eq!(imported.len(), 3);

        let total = |kind| -> f64 {
            imported.iter().filter(|t| t.kind == kind).map(|t| t.amount).sum()
        };
        assert_eq!(total(TransactionKind::Income), 100.0);
        assert_eq!(total(TransactionKind::Expense), 42.5);

        assert_eq!(imported[0].date, day(1));
        assert_eq!(imported[0].category, IMPORTED_INCOME_CATEGORY);
        assert_eq!(imported[1].category, IMPORTED_EXPENSE_CATEGORY);
        assert_eq!(imported[1].description, None);
        assert_eq!(imported[2].description.as_deref(), Some("Coffee"));
    }

    #[test]
    fn test_export_of_nothing_is_header_only() {
        let imported = import_xlsx(&export_xlsx(&[]).unwrap()).unwrap();
        assert!(imported.is_empty());
    }

    #[test]
    fn test_blank_rows_and_empty_cells() {
        let bytes = workbook(&[
            HEADERS,
            ["2024-01-01", "100", "", "pay"],
            ["", "", "", ""],
            ["2024-01-02 00:00:00", "", "15", ""],
        ]);
        let rows = import_xlsx(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, TransactionKind::Income);
        assert_eq!(rows[0].amount, 100.0);
        assert_eq!(rows[1].kind, TransactionKind::Expense);
        assert_eq!(rows[1].amount, 15.0);
        assert_eq!(rows[1].date, day(2));
    }

    #[test]
    fn test_rows_without_amount_are_skipped() {
        let bytes = workbook(&[
            HEADERS,
            ["2024-01-01", "0", "0", "placeholder"],
            ["2024-01-02", "", "", "no amounts"],
            ["2024-01-03", "0", "9", "taxi"],
        ]);
        let rows = import_xlsx(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, TransactionKind::Expense);
        assert_eq!(rows[0].amount, 9.0);
        assert_eq!(rows[0].date, day(3));
    }

    #[test]
    fn test_columns_found_by_header_name() {
        let bytes = workbook(&[
            [DESCRIPTION_HEADER, EXPENSE_HEADER, INCOME_HEADER, DATE_HEADER],
            ["lunch", "12", "0", "2024-01-03"],
        ]);
        let rows = import_xlsx(&bytes).unwrap();
        assert_eq!(rows[0].amount, 12.0);
        assert_eq!(rows[0].description.as_deref(), Some("lunch"));
        assert_eq!(rows[0].date, day(3));
    }

    #[test]
    fn test_native_date_cells() {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet();
        for (c, h) in HEADERS.iter().enumerate() {
            sheet.write_string(0, c as u16, *h).unwrap();
        }
        let date = ExcelDateTime::from_ymd(2024, 1, 7).unwrap();
        sheet.write_datetime_with_format(1, 0, &date, &date_format).unwrap();
        sheet.write_number(1, 1, 0.0).unwrap();
        sheet.write_number(1, 2, 9.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = import_xlsx(&bytes).unwrap();
        assert_eq!(rows[0].date, day(7));
        assert_eq!(rows[0].amount, 9.0);
    }

    #[test]
    fn test_bad_row_fails_whole_import() {
        let bytes = workbook(&[
            HEADERS,
            ["2024-01-01", "100", "", ""],
            ["yesterday", "5", "", ""],
        ]);
        let err = import_xlsx(&bytes).unwrap_err();
        assert!(matches!(err, AppError::Spreadsheet(_)));
        assert!(err.to_string().contains("row 3"), "{err}");
    }

    #[test]
    fn test_missing_column() {
        let bytes = workbook(&[[DATE_HEADER, INCOME_HEADER, EXPENSE_HEADER, "Notes"]]);
        let err = import_xlsx(&bytes).unwrap_err();
        assert!(err.to_string().contains(DESCRIPTION_HEADER));
    }

    #[test]
    fn test_not_a_workbook() {
        assert!(matches!(
            import_xlsx(b"definitely not a zip"),
            Err(AppError::Spreadsheet(_))
        ));
    }

    #[test]
    fn test_parse_date_text() {
        assert_eq!(parse_date_text("2024-01-05").unwrap(), day(5));
        assert_eq!(parse_date_text("2024-01-05T10:00:00").unwrap(), day(5));
        assert!(parse_date_text("05/01/2024").is_err());
    }
}
