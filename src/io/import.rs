use anyhow::Result;
use chrono::NaiveDate;
use std::io::Read;

use crate::application::LedgerService;
use crate::domain::{parse_cents, NewMemo};

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Parse and validate without writing anything
    pub dry_run: bool,
}

/// Importer for bulk-loading memos from spreadsheet exports.
///
/// Expects the column layout the exporter writes; the `id` and
/// `created_at` columns are ignored because the store assigns fresh ones.
/// Every row goes through `create_memo`, so create validation applies.
pub struct Importer<'a> {
    service: &'a LedgerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Import memos from CSV
    pub async fn import_memos_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut imported = 0;
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let memo = match parse_record(&record) {
                Ok(memo) => memo,
                Err((field, error)) => {
                    errors.push(ImportError {
                        line,
                        field: Some(field.to_string()),
                        error,
                    });
                    continue;
                }
            };

            if options.dry_run {
                imported += 1;
                continue;
            }

            match self.service.create_memo(memo).await {
                Ok(_) => imported += 1,
                Err(e) => errors.push(ImportError {
                    line,
                    field: None,
                    error: format!("Memo creation failed: {}", e),
                }),
            }
        }

        Ok(ImportResult { imported, errors })
    }
}

fn parse_record(record: &csv::StringRecord) -> Result<NewMemo, (&'static str, String)> {
    let date_str = record.get(1).unwrap_or("");
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| ("date", format!("Invalid date '{}': {}", date_str, e)))?;

    let client_name = record.get(2).unwrap_or("").to_string();
    let item_name = record.get(3).unwrap_or("").to_string();

    let item_count: i64 = record
        .get(4)
        .unwrap_or("")
        .parse()
        .map_err(|e| ("item_count", format!("Invalid count: {}", e)))?;

    let money = |field: &'static str, index: usize| {
        parse_cents(record.get(index).unwrap_or(""))
            .map_err(|e| (field, format!("Invalid amount: {}", e)))
    };
    let item_price = money("item_price", 5)?;
    let total_price = money("total_price", 6)?;
    let paid = money("paid", 7)?;
    let due = money("due", 8)?;

    let memo_image_url = record
        .get(9)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    Ok(NewMemo {
        date,
        client_name,
        item_name,
        item_count,
        item_price,
        total_price,
        paid,
        due,
        memo_image_url,
    })
}
