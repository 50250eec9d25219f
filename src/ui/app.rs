use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::util::{total_pages, DEFAULT_PER_PAGE};
use crate::aggregate::{accounts_for_states, reconcile_accounts, DashboardView, DatasetFacets, ViewCache};
use crate::db::{self, KeyValueStore};
use crate::import::{load_or_empty, FileSource};
use crate::models::{FilterConfig, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Filters,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Transactions, Self::Filters]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Filters => write!(f, "Filters"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
        }
    }
}

/// Column of the filters screen that has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterPane {
    Accounts,
    Industries,
    States,
}

impl FilterPane {
    pub(crate) fn all() -> &'static [FilterPane] {
        &[Self::Accounts, Self::Industries, Self::States]
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Self::Accounts => Self::Industries,
            Self::Industries => Self::States,
            Self::States => Self::Accounts,
        }
    }

    pub(crate) fn prev(self) -> Self {
        match self {
            Self::Accounts => Self::States,
            Self::Industries => Self::Accounts,
            Self::States => Self::Industries,
        }
    }
}

impl std::fmt::Display for FilterPane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accounts => write!(f, "Accounts"),
            Self::Industries => write!(f, "Industries"),
            Self::States => write!(f, "States"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Dataset
    pub(crate) dataset_path: Option<PathBuf>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) facets: DatasetFacets,
    /// Bumped whenever `transactions` is replaced.
    pub(crate) generation: u64,

    // Filters and derived view
    pub(crate) filters: FilterConfig,
    pub(crate) cache: ViewCache,

    // Transactions
    pub(crate) page: usize,
    pub(crate) per_page: usize,
    pub(crate) row_index: usize,

    // Filters screen
    pub(crate) filter_pane: FilterPane,
    pub(crate) pane_index: usize,
    pub(crate) pane_scroll: usize,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(transactions: Vec<Transaction>, filters: FilterConfig) -> Self {
        let facets = DatasetFacets::collect(&transactions);
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            dataset_path: None,
            transactions,
            facets,
            generation: 0,

            filters,
            cache: ViewCache::new(),

            page: 1,
            per_page: DEFAULT_PER_PAGE,
            row_index: 0,

            filter_pane: FilterPane::Accounts,
            pane_index: 0,
            pane_scroll: 0,

            visible_rows: 20,
        }
    }

    /// Load `path` into the app. Stored filters are reused when they belong
    /// to the same dataset; otherwise filters are derived from the new data.
    /// An empty or unreadable file changes nothing in the store.
    pub(crate) fn open_dataset(&mut self, path: &Path, store: &dyn KeyValueStore, today: NaiveDate) -> Result<()> {
        let transactions = load_or_empty(&FileSource::new(path));
        self.replace_dataset(transactions);
        self.dataset_path = Some(path.to_path_buf());
        self.reset_cursor();
        if self.transactions.is_empty() {
            tracing::warn!(path = %path.display(), "no transactions loaded, filters left unsaved");
            self.set_status(format!("No transactions loaded from {}", path.display()));
            return Ok(());
        }

        let same_dataset = db::load_dataset_path(store)?.as_deref() == Some(path);
        db::save_dataset_path(store, path)?;
        let stored = if same_dataset { db::load_filters(store)? } else { None };
        match stored {
            Some(filters) => self.filters = filters,
            None => {
                self.filters = FilterConfig::for_dataset(&self.facets, today);
                db::save_filters(store, &self.filters)?;
            }
        }
        self.set_status(format!(
            "Loaded {} transactions from {}",
            self.transactions.len(),
            path.display()
        ));
        Ok(())
    }

    /// Re-read the current dataset file, keeping the filters. A dataset that
    /// was empty before is opened afresh so its filters get derived.
    pub(crate) fn reload(&mut self, store: &dyn KeyValueStore, today: NaiveDate) -> Result<()> {
        let Some(path) = self.dataset_path.clone() else {
            self.set_status("No dataset open. Use :open <file>");
            return Ok(());
        };
        if self.transactions.is_empty() {
            return self.open_dataset(&path, store, today);
        }
        let transactions = load_or_empty(&FileSource::new(&path));
        self.replace_dataset(transactions);
        self.clamp_page();
        self.set_status(format!("Reloaded {} transactions", self.transactions.len()));
        Ok(())
    }

    fn replace_dataset(&mut self, transactions: Vec<Transaction>) {
        self.facets = DatasetFacets::collect(&transactions);
        self.transactions = transactions;
        self.generation += 1;
    }

    /// Persist the filters after a change and move back to the first page.
    pub(crate) fn filters_changed(&mut self, store: &dyn KeyValueStore) -> Result<()> {
        tracing::debug!(filters = %self.filters.describe(), "filters changed");
        self.reset_cursor();
        db::save_filters(store, &self.filters)
    }

    /// Filters covering the whole dataset.
    pub(crate) fn reset_filters(&mut self, today: NaiveDate) {
        self.filters = FilterConfig::for_dataset(&self.facets, today);
    }

    /// Toggle a state and narrow the account selection to what those states offer.
    pub(crate) fn toggle_state(&mut self, state: &str) {
        self.filters.toggle_state(state);
        let available = accounts_for_states(&self.transactions, &self.filters.states);
        reconcile_accounts(&mut self.filters, &available);
    }

    /// Accounts offered for selection under the current state filter.
    pub(crate) fn available_accounts(&self) -> BTreeSet<String> {
        accounts_for_states(&self.transactions, &self.filters.states)
    }

    /// Recompute the view if the dataset, filters or day changed.
    pub(crate) fn refresh_view(&mut self, now: NaiveDateTime) {
        self.cache
            .get(self.generation, &self.transactions, &self.filters, now);
        self.clamp_page();
    }

    pub(crate) fn view(&self) -> Option<&DashboardView> {
        self.cache.current()
    }

    /// Rows matching the filters, from the last computed view.
    pub(crate) fn filtered_len(&self) -> usize {
        self.view().map_or(0, |v| v.transactions.len())
    }

    pub(crate) fn total_pages(&self) -> usize {
        total_pages(self.filtered_len(), self.per_page)
    }

    pub(crate) fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
        self.row_index = 0;
    }

    pub(crate) fn clamp_page(&mut self) {
        let last = self.total_pages();
        if self.page > last {
            self.page = last;
            self.row_index = 0;
        }
    }

    fn reset_cursor(&mut self) {
        self.page = 1;
        self.row_index = 0;
    }

    /// Values listed in the focused filters pane, sorted.
    pub(crate) fn pane_values(&self, pane: FilterPane) -> Vec<String> {
        match pane {
            FilterPane::Accounts => self.available_accounts().into_iter().collect(),
            FilterPane::Industries => self.facets.industries.iter().cloned().collect(),
            FilterPane::States => self.facets.states.iter().cloned().collect(),
        }
    }

    /// Whether `value` is currently selected in `pane`.
    pub(crate) fn pane_selected(&self, pane: FilterPane, value: &str) -> bool {
        match pane {
            FilterPane::Accounts => self
                .filters
                .accounts
                .as_ref()
                .map_or(true, |set| set.contains(value)),
            FilterPane::Industries => self
                .filters
                .industries
                .as_ref()
                .map_or(true, |set| set.contains(value)),
            FilterPane::States => self.filters.states.contains(value),
        }
    }

    /// Toggle `value` in `pane`.
    pub(crate) fn toggle_in_pane(&mut self, pane: FilterPane, value: &str) {
        match pane {
            FilterPane::Accounts => {
                let universe = self.available_accounts();
                FilterConfig::toggle(&mut self.filters.accounts, value, &universe);
            }
            FilterPane::Industries => {
                let universe = self.facets.industries.clone();
                FilterConfig::toggle(&mut self.filters.industries, value, &universe);
            }
            FilterPane::States => self.toggle_state(value),
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
