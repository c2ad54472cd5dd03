//! REST client for the hosted data platform.
//!
//! Talks to the platform's PostgREST data API for the `leads` collection.
//! Search terms become an `or=(...ilike...)` disjunction over the four
//! searchable text columns, and date ordering is pushed down as
//! `order=date_added.desc`, mirroring the queries the web client issued.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::LeadStore;
use crate::config::ResolvedStoreConfig;
use crate::error::{LeadbookError, Result};
use crate::lead::{Lead, LeadPatch, NewLead};
use crate::query::LeadQuery;

/// Data API path for the leads collection.
const LEADS_PATH: &str = "rest/v1/leads";

/// REST implementation of [`LeadStore`].
#[derive(Debug, Clone)]
pub struct RestLeadStore {
    base: Url,
    anon_key: String,
    access_token: Option<String>,
    client: Client,
}

impl RestLeadStore {
    /// Creates a store client for the resolved configuration.
    ///
    /// When an access token is given it is sent as the bearer credential;
    /// otherwise requests carry the anon key alone.
    pub fn new(config: &ResolvedStoreConfig, access_token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadbookError::store(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base: config.url.clone(),
            anon_key: config.anon_key.clone(),
            access_token,
            client,
        })
    }

    fn leads_url(&self) -> Result<Url> {
        self.base
            .join(LEADS_PATH)
            .map_err(|e| LeadbookError::config(format!("Invalid store URL: {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    /// Builds the data API query string for a list request.
    fn list_params(query: &LeadQuery) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        if let Some(term) = &query.search {
            params.push((
                "or".to_string(),
                format!(
                    "(name.ilike.*{term}*,business.ilike.*{term}*,\
                     email.ilike.*{term}*,instagram_handle.ilike.*{term}*)"
                ),
            ));
        }
        if query.order_by_date_desc {
            params.push(("order".to_string(), "date_added.desc".to_string()));
        }
        params
    }

    /// Maps a non-success response to an error, surfacing the store's own
    /// message verbatim when the body carries one.
    fn error_from_response(status: StatusCode, body: &str) -> LeadbookError {
        let message = serde_json::from_str::<StoreErrorBody>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| body.to_string());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            LeadbookError::auth(message)
        } else {
            LeadbookError::store(message)
        }
    }

    fn request_error(e: reqwest::Error) -> LeadbookError {
        if e.is_timeout() {
            LeadbookError::store("Request timed out. Try again.")
        } else if e.is_connect() {
            LeadbookError::store("Failed to connect to the store. Check your network.")
        } else {
            LeadbookError::store(format!("Request failed: {e}"))
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await.map_err(Self::request_error)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LeadbookError::store(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::error_from_response(status, &body));
        }
        Ok(body)
    }

    async fn send_rows(&self, request: RequestBuilder) -> Result<Vec<Lead>> {
        let body = self.send(request).await?;
        serde_json::from_str(&body)
            .map_err(|e| LeadbookError::store(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl LeadStore for RestLeadStore {
    async fn list(&self, query: &LeadQuery) -> Result<Vec<Lead>> {
        let params = Self::list_params(query);
        debug!("Listing leads: {:?}", params);

        let request = self.request(Method::GET, self.leads_url()?).query(&params);
        self.send_rows(request).await
    }

    async fn get(&self, id: &str) -> Result<Lead> {
        let id_filter = format!("eq.{id}");
        let request = self
            .request(Method::GET, self.leads_url()?)
            .query(&[("select", "*"), ("id", id_filter.as_str())]);

        let mut rows = self.send_rows(request).await?;
        rows.pop()
            .ok_or_else(|| LeadbookError::store(format!("Lead not found: {id}")))
    }

    async fn insert(&self, lead: &NewLead) -> Result<Lead> {
        let request = self
            .request(Method::POST, self.leads_url()?)
            .header("Prefer", "return=representation")
            .json(lead);

        let mut rows = self.send_rows(request).await?;
        rows.pop()
            .ok_or_else(|| LeadbookError::store("Insert returned no row"))
    }

    async fn update(&self, id: &str, patch: &LeadPatch) -> Result<Lead> {
        let id_filter = format!("eq.{id}");
        let request = self
            .request(Method::PATCH, self.leads_url()?)
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=representation")
            .json(patch);

        let mut rows = self.send_rows(request).await?;
        rows.pop()
            .ok_or_else(|| LeadbookError::store(format!("Lead not found: {id}")))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id_filter = format!("eq.{id}");
        let request = self
            .request(Method::DELETE, self.leads_url()?)
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=representation");

        let rows = self.send_rows(request).await?;
        if rows.is_empty() {
            return Err(LeadbookError::store(format!("Lead not found: {id}")));
        }
        Ok(())
    }
}

/// Error body shape returned by the data API.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: String,
}
