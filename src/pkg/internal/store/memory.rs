use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    pkg::internal::{
        adaptors::applications::spec::{ApplicationEntry, ApplicationPatch, NewApplication},
        status::ApplicationStatus,
    },
    prelude::{AppError, Result},
};

use super::ApplicationStore;

/// Process-local store. Mirrors the postgres schema's constraints,
/// including the (company, role) uniqueness.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<String, ApplicationEntry>>,
}

fn pair_taken(
    rows: &HashMap<String, ApplicationEntry>,
    company: &str,
    role: &str,
    except: Option<&str>,
) -> bool {
    rows.values()
        .any(|r| r.company == company && r.role == role && Some(r.id.as_str()) != except)
}

fn into_entry(id: String, app: NewApplication) -> ApplicationEntry {
    ApplicationEntry {
        id,
        company: app.company,
        role: app.role,
        location: app.location,
        url: app.url,
        status: app.status,
        applied_at: app.applied_at,
        notes: app.notes,
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>> {
        let rows = self.rows.read().await;
        let mut apps: Vec<ApplicationEntry> = rows
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        apps.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(apps)
    }

    async fn get(&self, id: &str) -> Result<Option<ApplicationEntry>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn create(&self, app: NewApplication) -> Result<ApplicationEntry> {
        let mut rows = self.rows.write().await;
        if pair_taken(&rows, &app.company, &app.role, None) {
            return Err(AppError::Conflict);
        }
        let entry = into_entry(Uuid::new_v4().to_string(), app);
        rows.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn upsert(&self, app: NewApplication) -> Result<ApplicationEntry> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows
            .values_mut()
            .find(|r| r.company == app.company && r.role == app.role)
        {
            existing.status = app.status;
            existing.location = app.location;
            return Ok(existing.clone());
        }
        let entry = into_entry(Uuid::new_v4().to_string(), app);
        rows.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn update(&self, id: &str, patch: ApplicationPatch) -> Result<Option<ApplicationEntry>> {
        let mut rows = self.rows.write().await;
        let Some(current) = rows.get(id) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        patch.apply(&mut updated);
        if pair_taken(&rows, &updated.company, &updated.role, Some(id)) {
            return Err(AppError::Conflict);
        }
        rows.insert(id.to_string(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.rows.write().await.remove(id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {
        let dropped = self.rows.read().await.len();
        tracing::debug!("closing memory store, dropping {} applications", dropped);
    }
}
