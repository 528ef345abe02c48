use chrono::{NaiveDate, Utc};

use crate::domain::{Memo, MemoId, MemoPatch, NewMemo, SortKey, StatsPeriod};
use crate::storage::Repository;

use super::{AppError, PeriodSales, SalesStats};

/// Default page size for ledger listings.
const DEFAULT_LIMIT: i64 = 50;

/// Application service providing high-level operations for the memo ledger.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct LedgerService {
    repo: Repository,
}

/// Filter, sort and pagination inputs for listing memos.
#[derive(Debug, Clone, Default)]
pub struct MemoQuery {
    /// Page size, default 50
    pub limit: Option<i64>,
    /// Rows to skip, default 0
    pub offset: Option<i64>,
    /// Sort key, always descending
    pub sort_by: SortKey,
    /// Case-insensitive substring match on client or item name
    pub search: Option<String>,
}

/// One page of memos plus the total count of matching rows, so callers can
/// render "page X of Y".
#[derive(Debug, Clone)]
pub struct MemoPage {
    pub memos: Vec<Memo>,
    pub total: i64,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Memo operations
    // ========================

    /// Create a new memo. Requires non-blank client and item names, a
    /// positive item count and non-negative amounts.
    ///
    /// `total_price` and `due` are stored exactly as supplied: the caller
    /// owns the arithmetic, and the service does not check
    /// `total_price == item_count * item_price` or
    /// `due == total_price - paid`.
    pub async fn create_memo(&self, memo: NewMemo) -> Result<Memo, AppError> {
        if memo.client_name.trim().is_empty() {
            return Err(AppError::Validation(
                "client name must not be empty".to_string(),
            ));
        }
        if memo.item_name.trim().is_empty() {
            return Err(AppError::Validation(
                "item name must not be empty".to_string(),
            ));
        }
        if memo.item_count < 1 {
            return Err(AppError::Validation(
                "item count must be at least 1".to_string(),
            ));
        }
        if memo.item_price < 0 {
            return Err(AppError::Validation(
                "item price must not be negative".to_string(),
            ));
        }
        if memo.paid < 0 {
            return Err(AppError::Validation(
                "paid amount must not be negative".to_string(),
            ));
        }

        let memo = self.repo.insert_memo(&memo).await?;
        tracing::debug!(id = memo.id, client = %memo.client_name, "created memo");
        Ok(memo)
    }

    /// Apply a partial update. At least one field must be supplied; fields
    /// left `None` keep their stored value. Supplied values are applied
    /// verbatim, without re-running create validation.
    pub async fn update_memo(&self, id: MemoId, patch: MemoPatch) -> Result<Memo, AppError> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument("no fields to update".to_string()));
        }

        let updated = self
            .repo
            .update_memo(id, &patch)
            .await?
            .ok_or(AppError::MemoNotFound(id))?;

        tracing::debug!(id, "updated memo");
        Ok(updated)
    }

    /// Delete a memo. Always succeeds from the caller's point of view:
    /// deleting an id that does not exist is not an error, unlike update's
    /// strict not-found behavior.
    pub async fn delete_memo(&self, id: MemoId) -> Result<(), AppError> {
        self.repo.delete_memo(id).await?;
        tracing::debug!(id, "deleted memo");
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    /// Search, sort and paginate the ledger. Returns the page plus the
    /// total count of rows matching the search (not the page size).
    pub async fn list_memos(&self, query: MemoQuery) -> Result<MemoPage, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = query.offset.unwrap_or(0);

        let (memos, total) = self
            .repo
            .list_memos(query.search.as_deref(), query.sort_by, limit, offset)
            .await?;

        Ok(MemoPage { memos, total })
    }

    /// Every memo in insertion order (for export).
    pub async fn list_all_memos(&self) -> Result<Vec<Memo>, AppError> {
        Ok(self.repo.list_all_memos().await?)
    }

    // ========================
    // Statistics
    // ========================

    /// Sales statistics. Explicit `start_date`/`end_date` take precedence;
    /// `period` only picks a default range when either is absent.
    ///
    /// The headline totals cover the whole ledger regardless of the range;
    /// only the per-date breakdown is range-filtered.
    pub async fn sales_stats(
        &self,
        period: StatsPeriod,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<SalesStats, AppError> {
        let (start, end) = match (start_date, end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => period.default_range(Utc::now()),
        };

        let totals = self.repo.sum_totals().await?;
        let buckets = self.repo.sum_by_date(start, end).await?;

        Ok(SalesStats {
            total_sales: totals.total_sales,
            cash_available: totals.total_paid,
            total_due: totals.total_due,
            period_sales: buckets
                .into_iter()
                .map(|bucket| PeriodSales {
                    period: bucket.date,
                    sales: bucket.sales,
                    paid: bucket.paid,
                    due: bucket.due,
                })
                .collect(),
        })
    }
}
