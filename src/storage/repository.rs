use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{Cents, Memo, MemoId, MemoPatch, NewMemo, SortKey};

use super::MIGRATION_001_MEMOS;

const MEMO_COLUMNS: &str = "id, date, client_name, item_name, item_count, item_price, total_price, paid, due, memo_image_url, created_at";

/// Whole-ledger sums, unfiltered by date.
#[derive(Debug, Clone, Copy)]
pub struct LedgerTotals {
    pub total_sales: Cents,
    pub total_paid: Cents,
    pub total_due: Cents,
}

/// Sums for all memos dated on one calendar day.
#[derive(Debug, Clone)]
pub struct DateBucket {
    pub date: NaiveDate,
    pub sales: Cents,
    pub paid: Cents,
    pub due: Cents,
}

/// Repository for persisting and querying memos.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_MEMOS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Write path
    // ========================

    /// Insert a new memo. The store assigns `id` and `created_at`; the
    /// returned row is exactly what was persisted.
    pub async fn insert_memo(&self, memo: &NewMemo) -> Result<Memo> {
        // Fixed-width timestamp text so the column's lexicographic order is
        // chronological order.
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO memos (date, client_name, item_name, item_count, item_price, total_price, paid, due, memo_image_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {MEMO_COLUMNS}
            "#,
        ))
        .bind(memo.date.to_string())
        .bind(&memo.client_name)
        .bind(&memo.item_name)
        .bind(memo.item_count)
        .bind(memo.item_price)
        .bind(memo.total_price)
        .bind(memo.paid)
        .bind(memo.due)
        .bind(&memo.memo_image_url)
        .bind(&created_at)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert memo")?;

        Self::row_to_memo(&row)
    }

    /// Apply only the supplied fields to the memo with the given id.
    /// Returns `None` when no row matches. Callers must not pass an empty
    /// patch; the service layer rejects those before reaching the store.
    pub async fn update_memo(&self, id: MemoId, patch: &MemoPatch) -> Result<Option<Memo>> {
        let mut sets: Vec<&'static str> = Vec::new();

        // Collect owned bindings first so they live long enough
        let date_str = patch.date.map(|d| d.to_string());

        if date_str.is_some() {
            sets.push("date = ?");
        }
        if patch.client_name.is_some() {
            sets.push("client_name = ?");
        }
        if patch.item_name.is_some() {
            sets.push("item_name = ?");
        }
        if patch.item_count.is_some() {
            sets.push("item_count = ?");
        }
        if patch.item_price.is_some() {
            sets.push("item_price = ?");
        }
        if patch.total_price.is_some() {
            sets.push("total_price = ?");
        }
        if patch.paid.is_some() {
            sets.push("paid = ?");
        }
        if patch.due.is_some() {
            sets.push("due = ?");
        }
        if patch.memo_image_url.is_some() {
            sets.push("memo_image_url = ?");
        }

        let query = format!(
            "UPDATE memos SET {} WHERE id = ? RETURNING {MEMO_COLUMNS}",
            sets.join(", ")
        );

        let mut sql_query = sqlx::query(&query);

        if let Some(ref date) = date_str {
            sql_query = sql_query.bind(date);
        }
        if let Some(ref client_name) = patch.client_name {
            sql_query = sql_query.bind(client_name);
        }
        if let Some(ref item_name) = patch.item_name {
            sql_query = sql_query.bind(item_name);
        }
        if let Some(item_count) = patch.item_count {
            sql_query = sql_query.bind(item_count);
        }
        if let Some(item_price) = patch.item_price {
            sql_query = sql_query.bind(item_price);
        }
        if let Some(total_price) = patch.total_price {
            sql_query = sql_query.bind(total_price);
        }
        if let Some(paid) = patch.paid {
            sql_query = sql_query.bind(paid);
        }
        if let Some(due) = patch.due {
            sql_query = sql_query.bind(due);
        }
        if let Some(ref url) = patch.memo_image_url {
            sql_query = sql_query.bind(url);
        }

        let row = sql_query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update memo")?;

        row.as_ref().map(Self::row_to_memo).transpose()
    }

    /// Delete the memo with the given id. Deleting a missing id is not an
    /// error (idempotent delete).
    pub async fn delete_memo(&self, id: MemoId) -> Result<()> {
        let result = sqlx::query("DELETE FROM memos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete memo")?;

        if result.rows_affected() == 0 {
            tracing::warn!(id, "delete of missing memo ignored");
        }
        Ok(())
    }

    // ========================
    // Read path
    // ========================

    /// List a page of memos plus the total count of rows matching the
    /// search, ignoring pagination. The sort key is always descending, with
    /// `id` descending as tie-break so output is stable.
    pub async fn list_memos(
        &self,
        search: Option<&str>,
        sort_by: SortKey,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Memo>, i64)> {
        let mut query = format!("SELECT {MEMO_COLUMNS} FROM memos");
        let mut count_query = String::from("SELECT COUNT(*) AS count FROM memos");

        let pattern = search
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        if pattern.is_some() {
            let condition =
                " WHERE (client_name LIKE ? ESCAPE '\\' OR item_name LIKE ? ESCAPE '\\')";
            query.push_str(condition);
            count_query.push_str(condition);
        }

        query.push_str(&format!(
            " ORDER BY {} DESC, id DESC LIMIT ? OFFSET ?",
            sort_by.as_str()
        ));

        let mut sql_query = sqlx::query(&query);
        let mut sql_count = sqlx::query(&count_query);
        if let Some(ref pattern) = pattern {
            sql_query = sql_query.bind(pattern).bind(pattern);
            sql_count = sql_count.bind(pattern).bind(pattern);
        }

        let rows = sql_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list memos")?;

        let total: i64 = sql_count
            .fetch_one(&self.pool)
            .await
            .context("Failed to count memos")?
            .get("count");

        let memos = rows.iter().map(Self::row_to_memo).collect::<Result<_>>()?;
        Ok((memos, total))
    }

    /// List every memo in insertion order, for export.
    pub async fn list_all_memos(&self) -> Result<Vec<Memo>> {
        let rows = sqlx::query(&format!("SELECT {MEMO_COLUMNS} FROM memos ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list all memos")?;

        rows.iter().map(Self::row_to_memo).collect()
    }

    // ========================
    // Aggregation
    // ========================

    /// Whole-table sums of total_price / paid / due.
    pub async fn sum_totals(&self) -> Result<LedgerTotals> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(total_price), 0) AS total_sales,
                COALESCE(SUM(paid), 0) AS total_paid,
                COALESCE(SUM(due), 0) AS total_due
            FROM memos
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum ledger totals")?;

        Ok(LedgerTotals {
            total_sales: row.get("total_sales"),
            total_paid: row.get("total_paid"),
            total_due: row.get("total_due"),
        })
    }

    /// Sum memos whose `date` falls within `[start, end]`, grouped by exact
    /// calendar date, most recent date first. Bucketing is always by exact
    /// date; coarser granularities are not produced.
    pub async fn sum_by_date(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DateBucket>> {
        let rows = sqlx::query(
            r#"
            SELECT
                date,
                COALESCE(SUM(total_price), 0) AS sales,
                COALESCE(SUM(paid), 0) AS paid,
                COALESCE(SUM(due), 0) AS due
            FROM memos
            WHERE date >= ? AND date <= ?
            GROUP BY date
            ORDER BY date DESC
            "#,
        )
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to sum memos by date")?;

        rows.iter()
            .map(|row| {
                let date_str: String = row.get("date");
                Ok(DateBucket {
                    date: parse_date(&date_str)?,
                    sales: row.get("sales"),
                    paid: row.get("paid"),
                    due: row.get("due"),
                })
            })
            .collect()
    }

    fn row_to_memo(row: &sqlx::sqlite::SqliteRow) -> Result<Memo> {
        let date_str: String = row.get("date");
        let created_at_str: String = row.get("created_at");

        Ok(Memo {
            id: row.get("id"),
            date: parse_date(&date_str)?,
            client_name: row.get("client_name"),
            item_name: row.get("item_name"),
            item_count: row.get("item_count"),
            item_price: row.get("item_price"),
            total_price: row.get("total_price"),
            paid: row.get("paid"),
            due: row.get("due"),
            memo_image_url: row.get("memo_image_url"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date: {s}"))
}

/// Treat `%`, `_` and `\` in a search needle as literal characters.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
