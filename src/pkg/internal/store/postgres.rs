use async_trait::async_trait;
use config::ConfigError;
use sqlx::{
    PgPool, Postgres, Transaction, migrate::Migrator, postgres::PgPoolOptions, query,
};

use crate::{
    conf::Settings,
    pkg::internal::{
        adaptors::applications::{
            mutators::ApplicationMutator,
            selectors::ApplicationSelector,
            spec::{ApplicationEntry, ApplicationPatch, NewApplication},
        },
        status::ApplicationStatus,
    },
    prelude::Result,
};

use super::ApplicationStore;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[async_trait]
pub trait GetTxn {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>>;
}

#[async_trait]
impl GetTxn for PgPool {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.begin().await?)
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn connect(settings: &Settings) -> Result<Self> {
        if settings.database_url.is_empty() {
            return Err(ConfigError::Message("DATABASE_URL is required for the postgres store".into()).into());
        }
        let pool = PgPoolOptions::new()
            .max_connections(settings.database_pool_max_connections)
            .connect_lazy(&settings.database_url)?;
        Ok(PgStore { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        let mut tx = self.pool.begin_txn().await?;
        MIGRATOR.run(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>> {
        let mut conn = self.pool.acquire().await?;
        let mut selector = ApplicationSelector::new(&mut conn);
        match status {
            Some(status) => selector.get_by_status(status).await,
            None => selector.get_all().await,
        }
    }

    async fn get(&self, id: &str) -> Result<Option<ApplicationEntry>> {
        let mut conn = self.pool.acquire().await?;
        ApplicationSelector::new(&mut conn).get_by_id(id).await
    }

    async fn create(&self, app: NewApplication) -> Result<ApplicationEntry> {
        let mut tx = self.pool.begin_txn().await?;
        let entry = ApplicationMutator::new(&mut tx).create(app).await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn upsert(&self, app: NewApplication) -> Result<ApplicationEntry> {
        let mut tx = self.pool.begin_txn().await?;
        let entry = ApplicationMutator::new(&mut tx).upsert(app).await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn update(&self, id: &str, patch: ApplicationPatch) -> Result<Option<ApplicationEntry>> {
        let mut tx = self.pool.begin_txn().await?;
        let entry = ApplicationMutator::new(&mut tx).update(id, patch).await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool.begin_txn().await?;
        let deleted = ApplicationMutator::new(&mut tx).delete(id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn ping(&self) -> Result<()> {
        query("select 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("closed postgres pool");
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tracing_test::traced_test;

    use super::*;
    use crate::{conf::StoreBackend, prelude::AppError};

    async fn store() -> Result<PgStore> {
        let settings = Settings {
            service_name: "apptrack".into(),
            listen_port: "3000".into(),
            store_backend: StoreBackend::Postgres,
            database_url: std::env::var("DATABASE_URL").unwrap_or_default(),
            database_pool_max_connections: 2,
            api_base_url: "http://localhost:3000".into(),
        };
        let store = PgStore::connect(&settings)?;
        store.migrate().await?;
        Ok(store)
    }

    fn new_app(company: &str, role: &str) -> NewApplication {
        NewApplication {
            company: company.into(),
            role: role.into(),
            location: None,
            url: None,
            status: ApplicationStatus::Applied,
            notes: None,
            applied_at: Utc::now(),
        }
    }

    #[tokio::test]
    #[traced_test]
    #[ignore = "needs DATABASE_URL pointing at a scratch postgres"]
    async fn test_application_crud() -> Result<()> {
        let store = store().await?;
        let company = format!("pg-{}", uuid::Uuid::new_v4());
        let created = store.create(new_app(&company, "Engineer")).await?;
        assert!(matches!(
            store.create(new_app(&company, "Engineer")).await,
            Err(AppError::Conflict)
        ));
        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::Offer),
            notes: Some(Some("call back".into())),
            ..Default::default()
        };
        let updated = store.update(&created.id, patch).await?.unwrap();
        assert_eq!(updated.status, ApplicationStatus::Offer);
        assert_eq!(updated.company, company);
        let offers = store.list(Some(ApplicationStatus::Offer)).await?;
        assert!(offers.iter().any(|a| a.id == created.id));
        assert!(store.delete(&created.id).await?);
        assert!(!store.delete(&created.id).await?);
        assert!(store.get(&created.id).await?.is_none());
        store.close().await;
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    #[ignore = "needs DATABASE_URL pointing at a scratch postgres"]
    async fn test_upsert_keyed_on_company_role() -> Result<()> {
        let store = store().await?;
        let company = format!("pg-{}", uuid::Uuid::new_v4());
        let first = store.upsert(new_app(&company, "Engineer")).await?;
        let mut again = new_app(&company, "Engineer");
        again.status = ApplicationStatus::Screening;
        again.location = Some("Remote".into());
        let second = store.upsert(again).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(second.status, ApplicationStatus::Screening);
        assert_eq!(second.location.as_deref(), Some("Remote"));
        store.delete(&first.id).await?;
        Ok(())
    }
}
