// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use memobook::application::LedgerService;
use memobook::domain::NewMemo;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// A paid-in-full memo request with sensible defaults
pub fn sample_memo(client: &str, item: &str, date_str: &str) -> NewMemo {
    NewMemo {
        date: date(date_str),
        client_name: client.to_string(),
        item_name: item.to_string(),
        item_count: 1,
        item_price: 10000,
        total_price: 10000,
        paid: 10000,
        due: 0,
        memo_image_url: None,
    }
}

/// A memo request with explicit amounts. Totals are stored exactly as
/// supplied, so tests control them directly.
pub fn memo_with_amounts(date_str: &str, total: i64, paid: i64, due: i64) -> NewMemo {
    NewMemo {
        date: date(date_str),
        client_name: "Client".to_string(),
        item_name: "Item".to_string(),
        item_count: 1,
        item_price: total,
        total_price: total,
        paid,
        due,
        memo_image_url: None,
    }
}
