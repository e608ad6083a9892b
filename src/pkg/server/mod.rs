pub mod handlers;
pub mod router;
pub mod state;
pub mod uispec;

use crate::{conf::Settings, prelude::Result};
use router::build_routes;
use state::AppState;

pub async fn listen(settings: &Settings, state: AppState) -> Result<()> {
    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &settings.listen_port)).await?;
    tracing::info!("{} listening at port {}", &settings.service_name, &settings.listen_port);
    tokio::select! {
        r = axum::serve(listener, build_routes(state)) => {
            tracing::warn!("server ended unexpectedly: {:?}", &r)
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl+c interrupt, closing server");
        }
    }
    Ok(())
}
