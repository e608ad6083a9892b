mod cmd;
pub mod conf;
pub mod pkg;
mod prelude;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::prelude::AppError;

fn failure_line(e: &AppError) -> String {
    format!("error: {}", e)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match cmd::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("{}", failure_line(&e));
            ExitCode::FAILURE
        }
    }
}
