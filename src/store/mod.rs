//! Store access layer.
//!
//! Trait-based interface over the hosted data platform that owns the `leads`
//! collection, allowing the REST client and in-memory test doubles to be used
//! interchangeably.

mod mock;
mod rest;
pub mod session;

pub use mock::{FailingLeadStore, MockLeadStore};
pub use rest::RestLeadStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ResolvedStoreConfig;
use crate::error::Result;
use crate::lead::{Lead, LeadPatch, NewLead};
use crate::query::LeadQuery;

/// Creates a store client for the given configuration.
///
/// The client is constructed here once and injected into whatever needs it;
/// there is no process-wide handle.
pub fn connect(config: &ResolvedStoreConfig, access_token: Option<String>) -> Result<Arc<dyn LeadStore>> {
    let client = RestLeadStore::new(config, access_token)?;
    Ok(Arc::new(client))
}

/// Trait defining the interface to the `leads` collection.
///
/// All operations are async and return Results with LeadbookError.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Lists leads matching the query, in store-provided order.
    async fn list(&self, query: &LeadQuery) -> Result<Vec<Lead>>;

    /// Fetches a single lead by id.
    async fn get(&self, id: &str) -> Result<Lead>;

    /// Inserts a lead and returns the stored row.
    async fn insert(&self, lead: &NewLead) -> Result<Lead>;

    /// Applies a partial update by id and returns the stored row.
    async fn update(&self, id: &str, patch: &LeadPatch) -> Result<Lead>;

    /// Deletes a lead by id.
    async fn delete(&self, id: &str) -> Result<()>;
}
