use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use super::transaction::{TxStatus, TxType};
use crate::aggregate::DatasetFacets;

/// Days between the default range start and today.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn accepts(&self, tx_type: TxType) -> bool {
        match self {
            Self::All => true,
            Self::Income => tx_type == TxType::Income,
            Self::Expense => tx_type == TxType::Expense,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Some(Self::All),
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn all() -> &'static [TypeFilter] {
        &[Self::All, Self::Income, Self::Expense]
    }
}

impl std::fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn accepts(&self, status: TxStatus) -> bool {
        match self {
            Self::All => true,
            Self::Completed => status == TxStatus::Completed,
            Self::Pending => status == TxStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Some(Self::All),
            "completed" | "complete" | "done" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    pub fn all() -> &'static [StatusFilter] {
        &[Self::All, Self::Completed, Self::Pending]
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user's current selection criteria.
///
/// Set fields follow one policy each:
/// - `accounts` / `industries`: `None` places no constraint, `Some(empty)`
///   matches nothing.
/// - `states`: an empty set places no constraint.
///
/// Every field defaults when absent so older or partial snapshots still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    #[serde(deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(alias = "companiesMulti")]
    pub accounts: Option<BTreeSet<String>>,
    pub industries: Option<BTreeSet<String>>,
    pub states: BTreeSet<String>,
    pub tx_type: TypeFilter,
    pub status: StatusFilter,
}

impl FilterConfig {
    /// Range from 30 days ago through `today`, no other constraint.
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            start_date: Some(today - Duration::days(DEFAULT_RANGE_DAYS)),
            end_date: Some(today),
            ..Self::default()
        }
    }

    /// Filters that include every observed account and industry over the
    /// dataset's full date range.
    pub fn for_dataset(facets: &DatasetFacets, today: NaiveDate) -> Self {
        let mut filters = Self::default_for(today);
        filters.adopt_dataset(facets);
        filters
    }

    /// Widen the categorical selections and date range to cover the dataset.
    /// Type and status selections are kept. Empty facets leave the
    /// selection unconstrained.
    pub fn adopt_dataset(&mut self, facets: &DatasetFacets) {
        self.accounts = (!facets.accounts.is_empty()).then(|| facets.accounts.clone());
        self.industries = (!facets.industries.is_empty()).then(|| facets.industries.clone());
        self.states.clear();
        if let (Some(first), Some(last)) = (facets.first_date, facets.last_date) {
            self.start_date = Some(first);
            self.end_date = Some(last);
        }
    }

    /// Add or remove `value` from an optional selection. A `None` selection
    /// becomes "everything in `universe` except `value`".
    pub fn toggle(selection: &mut Option<BTreeSet<String>>, value: &str, universe: &BTreeSet<String>) {
        let set = selection.get_or_insert_with(|| universe.clone());
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    pub fn toggle_state(&mut self, state: &str) {
        if !self.states.remove(state) {
            self.states.insert(state.to_string());
        }
    }

    /// Short one-line description for status bars and CLI headers.
    pub fn describe(&self) -> String {
        let range = match (self.start_date, self.end_date) {
            (Some(s), Some(e)) => format!("{s} .. {e}"),
            (Some(s), None) => format!("{s} .."),
            (None, Some(e)) => format!(".. {e}"),
            (None, None) => "all dates".to_string(),
        };
        let accounts = describe_selection(&self.accounts);
        let industries = describe_selection(&self.industries);
        let states = if self.states.is_empty() {
            "any".to_string()
        } else {
            self.states.len().to_string()
        };
        format!(
            "{range} | type {} | status {} | accounts {accounts} | industries {industries} | states {states}",
            self.tx_type, self.status
        )
    }
}

fn describe_selection(selection: &Option<BTreeSet<String>>) -> String {
    match selection {
        None => "any".to_string(),
        Some(set) if set.is_empty() => "none".to_string(),
        Some(set) => set.len().to_string(),
    }
}

/// Reads a calendar day from `YYYY-MM-DD` or a datetime string. Empty or
/// malformed values become `None` instead of failing the whole snapshot.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let day = s.trim().get(..10).unwrap_or(s.trim()).to_string();
        NaiveDate::parse_from_str(&day, "%Y-%m-%d").ok()
    }))
}
