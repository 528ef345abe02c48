use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Named shorthand for a default statistics date range. Only consulted when
/// the caller supplies no explicit start/end dates - explicit dates always
/// win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl StatsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::Day => "day",
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
            StatsPeriod::Year => "year",
        }
    }

    /// Unrecognized input yields None; callers fall back to the default
    /// (week), so an unknown period behaves the same as an absent one.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "day" => Some(StatsPeriod::Day),
            "week" => Some(StatsPeriod::Week),
            "month" => Some(StatsPeriod::Month),
            "year" => Some(StatsPeriod::Year),
            _ => None,
        }
    }

    /// Default date range anchored at `now`, used when no explicit dates are
    /// given:
    /// - day: today only
    /// - week: the last 7 days (not the calendar week)
    /// - month: first of the current month through today
    /// - year: January 1st through today
    pub fn default_range(&self, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
        let today = now.date_naive();
        let start = match self {
            StatsPeriod::Day => today,
            StatsPeriod::Week => today - Duration::days(7),
            StatsPeriod::Month => today.with_day(1).expect("day 1 is always valid"),
            StatsPeriod::Year => today.with_ordinal(1).expect("ordinal 1 is always valid"),
        };
        (start, today)
    }
}

impl std::fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
