use askama::Template;
use axum::response::Html;

use crate::{pkg::server::uispec::DashboardPage, prelude::Result};

pub async fn home() -> Result<Html<String>> {
    let template = DashboardPage::default();
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_home_lists_every_status() -> Result<()> {
        let Html(page) = home().await?;
        for status in ["APPLIED", "SCREENING", "INTERVIEW", "OFFER", "REJECTED", "WITHDRAWN"] {
            assert!(page.contains(&format!("<option value=\"{}\">", status)), "{}", status);
        }
        assert!(page.contains("/applications"));
        Ok(())
    }

    #[tokio::test]
    async fn test_home_only_links_web_urls() -> Result<()> {
        let Html(page) = home().await?;
        assert!(page.contains("new URL(value).protocol"));
        assert!(page.contains("protocol === \"http:\" || protocol === \"https:\""));
        assert!(page.contains("if (isWebLink(app.url))"));
        Ok(())
    }
}
