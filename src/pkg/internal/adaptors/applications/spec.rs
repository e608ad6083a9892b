use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pkg::internal::status::ApplicationStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEntry {
    pub id: String,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// A normalized record ready to be written.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// Partial update. `None` leaves a column alone; `Some(None)` clears a
/// nullable one.
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<Option<String>>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.role.is_none()
            && self.location.is_none()
            && self.url.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }

    pub fn apply(self, entry: &mut ApplicationEntry) {
        if let Some(company) = self.company {
            entry.company = company;
        }
        if let Some(role) = self.role {
            entry.role = role;
        }
        if let Some(location) = self.location {
            entry.location = location;
        }
        if let Some(url) = self.url {
            entry.url = url;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(notes) = self.notes {
            entry.notes = notes;
        }
    }
}

pub(crate) const COLUMNS: &str = "id, company, role, location, url, status, applied_at, notes";
