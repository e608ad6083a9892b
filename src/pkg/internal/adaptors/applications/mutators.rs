use sqlx::PgConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::applications::spec::{
    ApplicationEntry, ApplicationPatch, COLUMNS, NewApplication,
};
use crate::prelude::{AppError, Result};

fn conflict_or_db(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict,
        _ => AppError::Database(err),
    }
}

pub struct ApplicationMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplicationMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplicationMutator { pool }
    }

    pub async fn create(&mut self, app: NewApplication) -> Result<ApplicationEntry> {
        let row = sqlx::query_as::<_, ApplicationEntry>(&format!(
            r#"
            INSERT INTO job_applications (id, company, role, location, url, status, notes, applied_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&app.company)
        .bind(&app.role)
        .bind(&app.location)
        .bind(&app.url)
        .bind(app.status)
        .bind(&app.notes)
        .bind(app.applied_at)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(conflict_or_db)?;
        Ok(row)
    }

    /// Insert keyed on (company, role); an existing pair only gets its
    /// status and location refreshed.
    pub async fn upsert(&mut self, app: NewApplication) -> Result<ApplicationEntry> {
        let row = sqlx::query_as::<_, ApplicationEntry>(&format!(
            r#"
            INSERT INTO job_applications (id, company, role, location, url, status, notes, applied_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (company, role) DO UPDATE
            SET status = EXCLUDED.status, location = EXCLUDED.location, updated_at = CURRENT_TIMESTAMP
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&app.company)
        .bind(&app.role)
        .bind(&app.location)
        .bind(&app.url)
        .bind(app.status)
        .bind(&app.notes)
        .bind(app.applied_at)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: &str, app: ApplicationPatch) -> Result<Option<ApplicationEntry>> {
        let mut query = String::from("UPDATE job_applications SET updated_at = CURRENT_TIMESTAMP");
        let mut param_count = 1;

        if app.company.is_some() {
            param_count += 1;
            query.push_str(&format!(", company = ${}", param_count));
        }
        if app.role.is_some() {
            param_count += 1;
            query.push_str(&format!(", role = ${}", param_count));
        }
        if app.location.is_some() {
            param_count += 1;
            query.push_str(&format!(", location = ${}", param_count));
        }
        if app.url.is_some() {
            param_count += 1;
            query.push_str(&format!(", url = ${}", param_count));
        }
        if app.status.is_some() {
            param_count += 1;
            query.push_str(&format!(", status = ${}", param_count));
        }
        if app.notes.is_some() {
            param_count += 1;
            query.push_str(&format!(", notes = ${}", param_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", COLUMNS));

        let mut q = sqlx::query_as::<_, ApplicationEntry>(&query).bind(id);

        if let Some(company) = app.company {
            q = q.bind(company);
        }
        if let Some(role) = app.role {
            q = q.bind(role);
        }
        if let Some(location) = app.location {
            q = q.bind(location);
        }
        if let Some(url) = app.url {
            q = q.bind(url);
        }
        if let Some(status) = app.status {
            q = q.bind(status);
        }
        if let Some(notes) = app.notes {
            q = q.bind(notes);
        }
        let row = q
            .fetch_optional(&mut *self.pool)
            .await
            .map_err(conflict_or_db)?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
