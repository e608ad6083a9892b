use crate::{
    conf::{Settings, StoreBackend},
    pkg::internal::store::PgStore,
    prelude::Result,
};

pub async fn apply(settings: &Settings) -> Result<()> {
    if settings.store_backend == StoreBackend::Memory {
        tracing::warn!("memory store configured, nothing to migrate");
        return Ok(());
    }
    let store = PgStore::connect(settings)?;
    tracing::debug!("connected to db");
    store.migrate().await?;
    println!("Migrations applied successfully");
    Ok(())
}
