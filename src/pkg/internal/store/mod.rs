use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    conf::{Settings, StoreBackend},
    pkg::internal::{
        adaptors::applications::spec::{ApplicationEntry, ApplicationPatch, NewApplication},
        status::ApplicationStatus,
    },
    prelude::Result,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>>;

    async fn get(&self, id: &str) -> Result<Option<ApplicationEntry>>;

    /// Fails with `AppError::Conflict` when (company, role) is taken.
    async fn create(&self, app: NewApplication) -> Result<ApplicationEntry>;

    /// Create-or-update keyed on (company, role). Only status and location
    /// are refreshed on an existing record.
    async fn upsert(&self, app: NewApplication) -> Result<ApplicationEntry>;

    /// `Ok(None)` when no record has this id.
    async fn update(&self, id: &str, patch: ApplicationPatch) -> Result<Option<ApplicationEntry>>;

    async fn delete(&self, id: &str) -> Result<bool>;

    async fn ping(&self) -> Result<()>;

    async fn close(&self);
}

pub type SharedStore = Arc<dyn ApplicationStore>;

pub async fn open(settings: &Settings) -> Result<SharedStore> {
    let store: SharedStore = match settings.store_backend {
        StoreBackend::Postgres => Arc::new(PgStore::connect(settings)?),
        StoreBackend::Memory => Arc::new(MemoryStore::default()),
    };
    tracing::debug!("opened {:?} store", settings.store_backend);
    Ok(store)
}
