use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Cents;

/// Sales summary returned by `LedgerService::sales_stats`.
///
/// The three headline totals are whole-ledger sums and deliberately ignore
/// the requested date range; only `period_sales` is range-filtered. Callers
/// rendering "all-time totals plus a recent breakdown" rely on this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesStats {
    /// Sum of total_price over every stored memo
    pub total_sales: Cents,
    /// Sum of paid over every stored memo
    pub cash_available: Cents,
    /// Sum of due over every stored memo
    pub total_due: Cents,
    /// Per-date buckets within the requested range, most recent first
    pub period_sales: Vec<PeriodSales>,
}

/// One aggregation bucket: every memo dated on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSales {
    pub period: NaiveDate,
    pub sales: Cents,
    pub paid: Cents,
    pub due: Cents,
}
