//! Query pipeline behavior over the in-memory mock store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use leadbook::app::{App, LeadFields};
use leadbook::lead::{Lead, LeadStatus, StatusValue};
use leadbook::query::{LeadQueryPipeline, PipelineOutcome, SortMode};
use leadbook::store::{FailingLeadStore, MockLeadStore};

fn lead(id: &str, status: Option<StatusValue>) -> Lead {
    Lead {
        id: id.to_string(),
        name: None,
        business: None,
        instagram_handle: None,
        email: None,
        status,
        notes: None,
        date_added: None,
    }
}

fn ids(leads: &[Lead]) -> Vec<&str> {
    leads.iter().map(|l| l.id.as_str()).collect()
}

#[tokio::test]
async fn status_sort_follows_rank_table_and_is_stable() {
    let store = Arc::new(MockLeadStore::with_leads(vec![
        lead("closed", Some(LeadStatus::Closed.into())),
        lead("new-1", Some(LeadStatus::New.into())),
        lead("replied", Some(LeadStatus::Replied.into())),
        lead("new-2", Some(LeadStatus::New.into())),
    ]));
    let pipeline = LeadQueryPipeline::new(store);

    let outcome = pipeline.run("", SortMode::Status).await.unwrap();
    let PipelineOutcome::Fresh(leads) = outcome else {
        panic!("Expected Fresh outcome");
    };
    assert_eq!(ids(&leads), ["new-1", "new-2", "replied", "closed"]);
}

#[tokio::test]
async fn unrecognized_status_sorts_after_known_statuses() {
    let store = Arc::new(MockLeadStore::with_leads(vec![
        lead("bogus", Some(StatusValue::Unknown("bogus".to_string()))),
        lead("new", Some(LeadStatus::New.into())),
    ]));
    let pipeline = LeadQueryPipeline::new(store);

    let PipelineOutcome::Fresh(leads) = pipeline.run("", SortMode::Status).await.unwrap() else {
        panic!("Expected Fresh outcome");
    };
    assert_eq!(ids(&leads), ["new", "bogus"]);
}

#[tokio::test]
async fn whitespace_search_returns_all_rows() {
    let mut with_name = lead("1", None);
    with_name.name = Some("Jo".to_string());
    let store = Arc::new(MockLeadStore::with_leads(vec![with_name, lead("2", None)]));
    let pipeline = LeadQueryPipeline::new(store);

    let PipelineOutcome::Fresh(all) = pipeline.run("  ", SortMode::Status).await.unwrap() else {
        panic!("Expected Fresh outcome");
    };
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn search_matches_business_case_insensitively() {
    let mut acme = lead("acme", None);
    acme.business = Some("Acme Corp".to_string());
    let mut other = lead("other", None);
    other.name = Some("Sam".to_string());
    let store = Arc::new(MockLeadStore::with_leads(vec![acme, other]));
    let pipeline = LeadQueryPipeline::new(store);

    let PipelineOutcome::Fresh(found) = pipeline.run("acme", SortMode::Date).await.unwrap() else {
        panic!("Expected Fresh outcome");
    };
    assert_eq!(ids(&found), ["acme"]);
}

#[tokio::test]
async fn date_sort_is_most_recent_first() {
    let mut older = lead("older", None);
    older.date_added = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let mut newer = lead("newer", None);
    newer.date_added = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    let store = Arc::new(MockLeadStore::with_leads(vec![older, newer]));
    let pipeline = LeadQueryPipeline::new(store);

    let PipelineOutcome::Fresh(leads) = pipeline.run("", SortMode::Date).await.unwrap() else {
        panic!("Expected Fresh outcome");
    };
    assert_eq!(ids(&leads), ["newer", "older"]);
}

#[tokio::test]
async fn failed_read_surfaces_error_and_no_rows() {
    let app = App::new(Arc::new(FailingLeadStore::new("network unreachable")));
    let err = app.list("", SortMode::Date).await.unwrap_err();
    assert_eq!(err.to_string(), "Store error: network unreachable");
}

#[tokio::test]
async fn mutations_are_visible_on_next_run() {
    let app = App::new(Arc::new(MockLeadStore::new()));

    let created = app
        .add(LeadFields {
            name: Some("Jo".to_string()),
            business: Some("Acme Corp".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    app.set_status(&created.id, "contacted").await.unwrap();
    let listed = app.list("acme", SortMode::Status).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status_label(), "contacted");

    app.delete(&created.id).await.unwrap();
    assert!(app.list("", SortMode::Date).await.unwrap().is_empty());
}
