//! Lead record types.
//!
//! A lead is a prospective customer record owned by the remote store; the
//! application only ever holds transient copies fetched per invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five pipeline stages a lead can occupy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Replied,
    DemoBooked,
    Closed,
}

impl LeadStatus {
    /// All stages in pipeline order.
    pub const ALL: [LeadStatus; 5] = [
        Self::New,
        Self::Contacted,
        Self::Replied,
        Self::DemoBooked,
        Self::Closed,
    ];

    /// Fixed sort rank: new=0, contacted=1, replied=2, demo_booked=3, closed=4.
    pub fn rank(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Contacted => 1,
            Self::Replied => 2,
            Self::DemoBooked => 3,
            Self::Closed => 4,
        }
    }

    /// Returns the wire representation of the stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Replied => "replied",
            Self::DemoBooked => "demo_booked",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "replied" => Ok(Self::Replied),
            "demo_booked" => Ok(Self::DemoBooked),
            "closed" => Ok(Self::Closed),
            _ => Err(format!(
                "Invalid status: {s}. Expected: new, contacted, replied, demo_booked, or closed"
            )),
        }
    }
}

/// Status as stored: one of the five stages, or an unrecognized tag the store
/// returned. Unknown tags are kept verbatim so they survive display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    Known(LeadStatus),
    Unknown(String),
}

impl StatusValue {
    /// Sort rank for the status sort; unrecognized tags rank after all stages.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Known(status) => status.rank(),
            Self::Unknown(_) => u8::MAX,
        }
    }

    /// Returns the display label for the status.
    pub fn label(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Unknown(s) => s,
        }
    }
}

impl From<LeadStatus> for StatusValue {
    fn from(status: LeadStatus) -> Self {
        Self::Known(status)
    }
}

/// A lead record as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,

    pub name: Option<String>,
    pub business: Option<String>,
    pub instagram_handle: Option<String>,
    pub email: Option<String>,

    /// Pipeline stage; absent is treated as `new` for display.
    pub status: Option<StatusValue>,

    pub notes: Option<String>,

    /// Set by the store at creation time, never edited by the client.
    pub date_added: Option<DateTime<Utc>>,
}

impl Lead {
    /// Sort rank under the status sort; missing statuses rank last, like
    /// unrecognized ones.
    pub fn status_rank(&self) -> u8 {
        self.status.as_ref().map_or(u8::MAX, StatusValue::rank)
    }

    /// Display label for the status; absent defaults to `new`.
    pub fn status_label(&self) -> &str {
        self.status.as_ref().map_or("new", StatusValue::label)
    }
}

/// Payload for creating a lead. `id` and `date_added` are assigned by the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewLead {
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub status: LeadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update payload; unset fields are omitted and left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeadPatch {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.business.is_none()
            && self.instagram_handle.is_none()
            && self.email.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}
