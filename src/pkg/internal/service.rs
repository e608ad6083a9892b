use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    pkg::internal::{
        adaptors::applications::spec::{ApplicationEntry, ApplicationPatch, NewApplication},
        status::{ApplicationStatus, normalize_status, parse_status_filter},
        store::ApplicationStore,
    },
    prelude::{AppError, Result},
};

pub const MISSING_REQUIRED: &str = "company and role are required";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<String>,
}

/// Only keys present in the body are touched. For the nullable columns an
/// explicit `null` is distinct from a missing key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchApplicationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

fn deserialize_present<'de, D>(deserializer: D) -> core::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts RFC 3339, a bare `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a plain
/// date (UTC midnight). Absent or blank means `now`.
pub fn parse_applied_at(raw: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(now),
        Some(raw) => raw,
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.and_utc());
    }
    if let Some(ts) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(ts.and_utc());
    }
    Err(AppError::Validation(format!(
        "appliedAt is not a valid timestamp: {}",
        raw
    )))
}

impl CreateApplicationInput {
    pub fn normalize(self, now: DateTime<Utc>) -> Result<NewApplication> {
        let company = self.company.unwrap_or_default().trim().to_string();
        let role = self.role.unwrap_or_default().trim().to_string();
        if company.is_empty() || role.is_empty() {
            return Err(AppError::Validation(MISSING_REQUIRED.into()));
        }
        Ok(NewApplication {
            company,
            role,
            location: clean_optional(self.location),
            url: clean_optional(self.url),
            status: normalize_status(self.status.as_deref()),
            notes: clean_optional(self.notes),
            applied_at: parse_applied_at(self.applied_at.as_deref(), now)?,
        })
    }
}

impl PatchApplicationInput {
    pub fn normalize(self) -> ApplicationPatch {
        ApplicationPatch {
            company: self.company.map(|c| c.trim().to_string()),
            role: self.role.map(|r| r.trim().to_string()),
            location: self.location.map(clean_optional),
            url: self.url.map(clean_optional),
            // an empty status is treated like a missing one
            status: self
                .status
                .filter(|s| !s.is_empty())
                .map(|s| normalize_status(Some(&s))),
            notes: self.notes.map(clean_optional),
        }
    }

    pub fn status(status: ApplicationStatus) -> Self {
        PatchApplicationInput {
            status: Some(status.to_string()),
            ..Default::default()
        }
    }
}

pub async fn list(store: &dyn ApplicationStore, filter: Option<&str>) -> Result<Vec<ApplicationEntry>> {
    let status = parse_status_filter(filter);
    if filter.is_some() && status.is_none() {
        tracing::debug!("ignoring unknown status filter {:?}", filter);
    }
    store.list(status).await
}

pub async fn create(store: &dyn ApplicationStore, input: CreateApplicationInput) -> Result<ApplicationEntry> {
    let app = input.normalize(Utc::now())?;
    let created = store.create(app).await?;
    tracing::info!("created application {} ({} / {})", &created.id, &created.company, &created.role);
    Ok(created)
}

pub async fn update(
    store: &dyn ApplicationStore,
    id: &str,
    input: PatchApplicationInput,
) -> Result<ApplicationEntry> {
    let patch = input.normalize();
    let updated = if patch.is_empty() {
        store.get(id).await?
    } else {
        store.update(id, patch).await?
    }
    .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    tracing::info!("updated application {}, status {}", &updated.id, &updated.status);
    if updated.status.is_conventionally_final() {
        tracing::debug!("application {} is in a final status", &updated.id);
    }
    Ok(updated)
}

pub async fn delete(store: &dyn ApplicationStore, id: &str) -> Result<()> {
    if !store.delete(id).await? {
        return Err(AppError::NotFound(id.to_string()));
    }
    tracing::info!("deleted application {}", id);
    Ok(())
}

/// Upserts the demo records. Safe to run repeatedly.
pub async fn seed(store: &dyn ApplicationStore) -> Result<Vec<ApplicationEntry>> {
    let demo = [
        ("ExampleCo", "AI Engineer", ApplicationStatus::Applied, "Melbourne"),
        ("VisionLabs", "Computer Vision Engineer", ApplicationStatus::Screening, "Remote"),
    ];
    let mut seeded = Vec::with_capacity(demo.len());
    for (company, role, status, location) in demo {
        let entry = store
            .upsert(NewApplication {
                company: company.into(),
                role: role.into(),
                location: Some(location.into()),
                url: None,
                status,
                notes: None,
                applied_at: Utc::now(),
            })
            .await?;
        tracing::info!("seeded {} / {}", company, role);
        seeded.push(entry);
    }
    Ok(seeded)
}
