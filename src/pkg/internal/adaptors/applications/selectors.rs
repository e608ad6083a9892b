use sqlx::PgConnection;

use crate::pkg::internal::adaptors::applications::spec::{ApplicationEntry, COLUMNS};
use crate::pkg::internal::status::ApplicationStatus;
use crate::prelude::Result;

pub struct ApplicationSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplicationSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplicationSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: &str) -> Result<Option<ApplicationEntry>> {
        let row = sqlx::query_as::<_, ApplicationEntry>(&format!(
            "SELECT {} FROM job_applications WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_all(&mut self) -> Result<Vec<ApplicationEntry>> {
        let rows = sqlx::query_as::<_, ApplicationEntry>(&format!(
            "SELECT {} FROM job_applications ORDER BY applied_at DESC",
            COLUMNS
        ))
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_status(&mut self, status: ApplicationStatus) -> Result<Vec<ApplicationEntry>> {
        let rows = sqlx::query_as::<_, ApplicationEntry>(&format!(
            "SELECT {} FROM job_applications WHERE status = $1 ORDER BY applied_at DESC",
            COLUMNS
        ))
        .bind(status)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
