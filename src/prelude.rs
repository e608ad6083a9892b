use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type Result<T> = core::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("application {0} not found")]
    NotFound(String),
    #[error("an application with this company and role already exists")]
    Conflict,
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("improperly configured: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ERR-APP-400",
            AppError::NotFound(_) => "ERR-APP-404",
            AppError::Conflict => "ERR-APP-409",
            AppError::Api { .. } => "ERR-API-000",
            AppError::Database(_) => "ERR-DB-000",
            AppError::Migrate(_) => "ERR-DB-001",
            AppError::Config(_) => "ERR-CONF-000",
            AppError::Io(_) => "ERR-IO-000",
            AppError::Template(_) => "ERR-UI-000",
            AppError::Transport(_) => "ERR-NET-000",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", &self);
        } else {
            tracing::debug!(code = self.code(), "{}", &self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
