//! Mock lead stores for testing.
//!
//! Provides in-memory implementations that mirror the remote store's
//! filtering and ordering behavior.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::LeadStore;
use crate::error::{LeadbookError, Result};
use crate::lead::{Lead, LeadPatch, NewLead};
use crate::query::LeadQuery;

/// An in-memory lead store.
///
/// Applies the same case-insensitive substring filter and date ordering the
/// remote store would, so pipeline tests exercise realistic result sets.
pub struct MockLeadStore {
    leads: Mutex<Vec<Lead>>,
    next_id: AtomicU64,
    first_call_delay: Option<Duration>,
    first_call_done: AtomicU64,
}

impl MockLeadStore {
    /// Creates an empty mock store.
    pub fn new() -> Self {
        Self::with_leads(Vec::new())
    }

    /// Creates a mock store seeded with the given leads.
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            leads: Mutex::new(leads),
            next_id: AtomicU64::new(1),
            first_call_delay: None,
            first_call_done: AtomicU64::new(0),
        }
    }

    /// Delays the first `list` call, for testing superseded requests.
    pub fn with_first_call_delay(mut self, delay: Duration) -> Self {
        self.first_call_delay = Some(delay);
        self
    }

    /// Returns a snapshot of the stored leads.
    pub fn leads(&self) -> Vec<Lead> {
        self.leads.lock().expect("mock store lock poisoned").clone()
    }

    fn matches(lead: &Lead, term: &str) -> bool {
        let term = term.to_lowercase();
        [
            &lead.name,
            &lead.business,
            &lead.email,
            &lead.instagram_handle,
        ]
        .into_iter()
        .any(|field| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&term))
        })
    }
}

impl Default for MockLeadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadStore for MockLeadStore {
    async fn list(&self, query: &LeadQuery) -> Result<Vec<Lead>> {
        if let Some(delay) = self.first_call_delay {
            if self.first_call_done.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(delay).await;
            }
        }

        let mut leads = self.leads();
        if let Some(term) = &query.search {
            leads.retain(|lead| Self::matches(lead, term));
        }
        if query.order_by_date_desc {
            leads.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        }
        Ok(leads)
    }

    async fn get(&self, id: &str) -> Result<Lead> {
        self.leads()
            .into_iter()
            .find(|lead| lead.id == id)
            .ok_or_else(|| LeadbookError::store(format!("Lead not found: {id}")))
    }

    async fn insert(&self, lead: &NewLead) -> Result<Lead> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Lead {
            id: format!("mock-{id}"),
            name: lead.name.clone(),
            business: lead.business.clone(),
            instagram_handle: lead.instagram_handle.clone(),
            email: lead.email.clone(),
            status: Some(lead.status.into()),
            notes: lead.notes.clone(),
            date_added: Some(Utc::now()),
        };
        self.leads
            .lock()
            .expect("mock store lock poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: &LeadPatch) -> Result<Lead> {
        let mut leads = self.leads.lock().expect("mock store lock poisoned");
        let lead = leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or_else(|| LeadbookError::store(format!("Lead not found: {id}")))?;

        if let Some(name) = &patch.name {
            lead.name = Some(name.clone());
        }
        if let Some(business) = &patch.business {
            lead.business = Some(business.clone());
        }
        if let Some(handle) = &patch.instagram_handle {
            lead.instagram_handle = Some(handle.clone());
        }
        if let Some(email) = &patch.email {
            lead.email = Some(email.clone());
        }
        if let Some(status) = patch.status {
            lead.status = Some(status.into());
        }
        if let Some(notes) = &patch.notes {
            lead.notes = Some(notes.clone());
        }
        Ok(lead.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut leads = self.leads.lock().expect("mock store lock poisoned");
        let before = leads.len();
        leads.retain(|lead| lead.id != id);
        if leads.len() == before {
            return Err(LeadbookError::store(format!("Lead not found: {id}")));
        }
        Ok(())
    }
}

/// A lead store where every operation fails with the same message.
pub struct FailingLeadStore {
    message: String,
}

impl FailingLeadStore {
    /// Creates a store failing with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(LeadbookError::store(self.message.clone()))
    }
}

#[async_trait]
impl LeadStore for FailingLeadStore {
    async fn list(&self, _query: &LeadQuery) -> Result<Vec<Lead>> {
        self.fail()
    }

    async fn get(&self, _id: &str) -> Result<Lead> {
        self.fail()
    }

    async fn insert(&self, _lead: &NewLead) -> Result<Lead> {
        self.fail()
    }

    async fn update(&self, _id: &str, _patch: &LeadPatch) -> Result<Lead> {
        self.fail()
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        self.fail()
    }
}
