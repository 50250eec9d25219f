//! Pure aggregation over a transaction dataset and a filter snapshot.
//!
//! Nothing in here fails: malformed dates are skipped, empty inputs give
//! zero totals and empty series, zero divisors give zero.

mod buckets;
mod dates;
mod facets;
mod filter;
mod summary;
mod view;

#[cfg(test)]
pub(crate) mod fixtures;

pub use buckets::{BalancePoint, FlowBucket, Series};
pub use dates::{days_before, parse_timestamp};
pub use facets::{accounts_for_states, reconcile_accounts, DatasetFacets};
pub use view::{DashboardView, ViewCache};
