//! Driving port for aggregate statistics.

use async_trait::async_trait;

use crate::domain::{Error, RatingSummary, SummaryGrouping};

/// Store-wide counts plus the per-tea summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub tea_count: u64,
    pub user_count: u64,
    pub rating_count: u64,
    pub summaries: Vec<RatingSummary>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingSummaryQuery: Send + Sync {
    async fn summary(&self, grouping: SummaryGrouping) -> Result<Vec<RatingSummary>, Error>;

    async fn dashboard(&self) -> Result<Dashboard, Error>;
}
