use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{format_cents, Memo};

/// Ledger snapshot for full export/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub memos: Vec<Memo>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export memos to CSV format. Money columns are decimal strings
    /// ("25.00"), the same format the importer reads back.
    pub async fn export_memos_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let memos = self.service.list_all_memos().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "client_name",
            "item_name",
            "item_count",
            "item_price",
            "total_price",
            "paid",
            "due",
            "memo_image_url",
            "created_at",
        ])?;

        let mut count = 0;
        for memo in &memos {
            csv_writer.write_record([
                memo.id.to_string(),
                memo.date.to_string(),
                memo.client_name.clone(),
                memo.item_name.clone(),
                memo.item_count.to_string(),
                format_cents(memo.item_price),
                format_cents(memo.total_price),
                format_cents(memo.paid),
                format_cents(memo.due),
                memo.memo_image_url.clone().unwrap_or_default(),
                memo.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full ledger as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let memos = self.service.list_all_memos().await?;

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            memos,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
