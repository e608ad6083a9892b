use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{
    pkg::internal::{
        adaptors::applications::spec::ApplicationEntry,
        service::{CreateApplicationInput, PatchApplicationInput},
        status::ApplicationStatus,
    },
    prelude::{AppError, Result},
};

use super::ApplicationsApi;

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Talks to a running service over its JSON API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("apptrack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into the service's reported message.
async fn check(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let message = match res.json::<ErrorBody>().await {
        Ok(ErrorBody { error: Some(message) }) => message,
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    tracing::debug!("service answered {}: {}", status, &message);
    Err(AppError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ApplicationsApi for HttpApi {
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>> {
        let mut req = self.client.get(self.url("/applications"));
        if let Some(status) = status {
            req = req.query(&[("status", status.as_str())]);
        }
        let res = check(req.send().await?).await?;
        Ok(res.json().await?)
    }

    async fn create(&self, input: CreateApplicationInput) -> Result<ApplicationEntry> {
        let res = self
            .client
            .post(self.url("/applications"))
            .json(&input)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    async fn update(&self, id: &str, input: PatchApplicationInput) -> Result<ApplicationEntry> {
        let res = self
            .client
            .patch(self.url(&format!("/applications/{}", id)))
            .json(&input)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let res = self
            .client
            .delete(self.url(&format!("/applications/{}", id)))
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}
