//! Lead list query pipeline.
//!
//! Builds the store-side filter/order request for the lead list and applies
//! the client-side status sort when the store cannot express the requested
//! order. Each run is tagged with a sequence ticket so that a response
//! overtaken by a newer run is discarded instead of applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::Result;
use crate::lead::Lead;
use crate::store::LeadStore;

/// Sort selection for the lead list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Most recent first, ordered by the store.
    #[default]
    Date,
    /// Pipeline-stage order, sorted client-side.
    Status,
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "status" => Ok(Self::Status),
            _ => Err(format!("Invalid sort mode: {s}. Expected: date or status")),
        }
    }
}

/// Filter/order request handed to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
    /// Trimmed, non-empty search term; `None` disables filtering.
    pub search: Option<String>,

    /// Ask the store to order by `date_added` descending.
    pub order_by_date_desc: bool,
}

impl LeadQuery {
    /// Builds the store request for a search term and sort selection.
    ///
    /// A whitespace-only term is treated as empty. The status sort is not
    /// expressible store-side, so it leaves the order request unset.
    pub fn new(search_term: &str, sort: SortMode) -> Self {
        let trimmed = search_term.trim();
        Self {
            search: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            order_by_date_desc: sort == SortMode::Date,
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The rows to display, in final order.
    Fresh(Vec<Lead>),
    /// A newer run was issued while this one was in flight; the response was
    /// discarded.
    Superseded,
}

/// Produces the ordered lead list for a search term and sort selection.
///
/// Stateless apart from the sequence counter: one store read per run, no
/// mutation, and store errors propagate to the caller.
pub struct LeadQueryPipeline {
    store: Arc<dyn LeadStore>,
    seq: AtomicU64,
}

impl LeadQueryPipeline {
    /// Creates a pipeline reading from the given store.
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self {
            store,
            seq: AtomicU64::new(0),
        }
    }

    /// Runs the filter-then-order transform.
    ///
    /// Returns `Superseded` when a newer run was issued before the store
    /// responded; the caller must not apply such a result.
    pub async fn run(&self, search_term: &str, sort: SortMode) -> Result<PipelineOutcome> {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = LeadQuery::new(search_term, sort);

        let mut leads = self.store.list(&query).await?;

        if self.seq.load(Ordering::SeqCst) != ticket {
            return Ok(PipelineOutcome::Superseded);
        }

        if sort == SortMode::Status {
            sort_by_status(&mut leads);
        }
        Ok(PipelineOutcome::Fresh(leads))
    }
}

/// Sorts leads by the fixed status rank table.
///
/// The sort is stable: rows with equal rank, including all rows with missing
/// or unrecognized statuses, keep their store-returned relative order.
pub fn sort_by_status(leads: &mut [Lead]) {
    leads.sort_by_key(Lead::status_rank);
}
