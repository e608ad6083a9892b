use async_trait::async_trait;

use crate::{
    pkg::internal::{
        adaptors::applications::spec::ApplicationEntry,
        service::{self, CreateApplicationInput, PatchApplicationInput},
        status::ApplicationStatus,
        store::SharedStore,
    },
    prelude::Result,
};

pub mod client;

pub use client::HttpApi;

#[async_trait]
pub trait ApplicationsApi: Send + Sync {
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>>;
    async fn create(&self, input: CreateApplicationInput) -> Result<ApplicationEntry>;
    async fn update(&self, id: &str, input: PatchApplicationInput) -> Result<ApplicationEntry>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl ApplicationsApi for SharedStore {
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>> {
        service::list(self.as_ref(), status.map(|s| s.as_str())).await
    }

    async fn create(&self, input: CreateApplicationInput) -> Result<ApplicationEntry> {
        service::create(self.as_ref(), input).await
    }

    async fn update(&self, id: &str, input: PatchApplicationInput) -> Result<ApplicationEntry> {
        service::update(self.as_ref(), id, input).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        service::delete(self.as_ref(), id).await
    }
}

pub trait Prompt {
    fn confirm(&self, question: &str) -> bool;
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub company: String,
    pub role: String,
    pub location: String,
    pub url: String,
    pub notes: String,
    pub status: ApplicationStatus,
    pub applied_at: String,
}

impl FormFields {
    fn to_input(&self) -> CreateApplicationInput {
        let optional = |v: &str| (!v.trim().is_empty()).then(|| v.to_string());
        CreateApplicationInput {
            company: Some(self.company.clone()),
            role: Some(self.role.clone()),
            location: optional(&self.location),
            url: optional(&self.url),
            status: Some(self.status.to_string()),
            notes: optional(&self.notes),
            applied_at: optional(&self.applied_at),
        }
    }
}

pub struct Dashboard<A, P> {
    api: A,
    prompt: P,
    pub applications: Vec<ApplicationEntry>,
    pub loading: bool,
    pub form: FormFields,
    filter: Option<ApplicationStatus>,
}

impl<A: ApplicationsApi, P: Prompt> Dashboard<A, P> {
    pub fn new(api: A, prompt: P) -> Self {
        Dashboard {
            api,
            prompt,
            applications: vec![],
            loading: true,
            form: FormFields::default(),
            filter: None,
        }
    }

    pub fn filter(&self) -> Option<ApplicationStatus> {
        self.filter
    }

    pub async fn mount(&mut self) -> Result<()> {
        self.reload().await
    }

    pub async fn reload(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.api.list(self.filter).await;
        self.loading = false;
        match result {
            Ok(apps) => {
                self.applications = apps;
                Ok(())
            }
            Err(e) => {
                self.prompt.alert(&e.to_string());
                Err(e)
            }
        }
    }

    pub async fn set_filter(&mut self, filter: Option<ApplicationStatus>) -> Result<()> {
        self.filter = filter;
        self.reload().await
    }

    pub async fn submit(&mut self) -> Result<ApplicationEntry> {
        let created = match self.api.create(self.form.to_input()).await {
            Ok(created) => created,
            Err(e) => {
                self.prompt.alert(&e.to_string());
                return Err(e);
            }
        };
        self.form = FormFields::default();
        self.reload().await?;
        Ok(created)
    }

    // applied locally first, rolled back if the server refuses
    pub async fn change_status(&mut self, id: &str, status: ApplicationStatus) -> Result<()> {
        let Some(idx) = self.applications.iter().position(|a| a.id == id) else {
            return Ok(());
        };
        let previous = std::mem::replace(&mut self.applications[idx].status, status);
        match self.api.update(id, PatchApplicationInput::status(status)).await {
            Ok(server) => {
                // the cache may have been reloaded meanwhile, so look it up again
                if let Some(app) = self.applications.iter_mut().find(|a| a.id == id) {
                    app.status = server.status;
                }
                Ok(())
            }
            Err(e) => {
                if let Some(app) = self.applications.iter_mut().find(|a| a.id == id) {
                    app.status = previous;
                }
                self.prompt.alert(&e.to_string());
                Err(e)
            }
        }
    }

    /// Returns `Ok(false)` when the user declined.
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        let label = self
            .applications
            .iter()
            .find(|a| a.id == id)
            .map(|a| format!("{} / {}", a.company, a.role))
            .unwrap_or_else(|| id.to_string());
        if !self.prompt.confirm(&format!("Delete {}?", label)) {
            return Ok(false);
        }
        if let Err(e) = self.api.delete(id).await {
            self.prompt.alert(&e.to_string());
            return Err(e);
        }
        self.applications.retain(|a| a.id != id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    };

    use super::*;
    use crate::{pkg::internal::store::MemoryStore, prelude::AppError};

    #[derive(Clone, Default)]
    struct FakePrompt {
        answer: bool,
        alerts: Arc<Mutex<Vec<String>>>,
    }

    impl Prompt for FakePrompt {
        fn confirm(&self, _question: &str) -> bool {
            self.answer
        }

        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    struct FlakyApi {
        inner: SharedStore,
        fail_writes: AtomicBool,
        deletes: Mutex<Vec<String>>,
    }

    impl FlakyApi {
        fn new() -> Self {
            FlakyApi {
                inner: Arc::new(MemoryStore::default()),
                fail_writes: AtomicBool::new(false),
                deletes: Mutex::new(vec![]),
            }
        }

        fn check(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Api {
                    status: 503,
                    message: "service unavailable".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ApplicationsApi for Arc<FlakyApi> {
        async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationEntry>> {
            self.inner.list(status).await
        }

        async fn create(&self, input: CreateApplicationInput) -> Result<ApplicationEntry> {
            self.check()?;
            self.inner.create(input).await
        }

        async fn update(&self, id: &str, input: PatchApplicationInput) -> Result<ApplicationEntry> {
            self.check()?;
            self.inner.update(id, input).await
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.deletes.lock().unwrap().push(id.to_string());
            self.check()?;
            ApplicationsApi::delete(&self.inner, id).await
        }
    }

    fn dashboard(answer: bool) -> (Dashboard<Arc<FlakyApi>, FakePrompt>, Arc<FlakyApi>, FakePrompt) {
        let api = Arc::new(FlakyApi::new());
        let prompt = FakePrompt {
            answer,
            ..Default::default()
        };
        (Dashboard::new(api.clone(), prompt.clone()), api, prompt)
    }

    async fn add(board: &mut Dashboard<Arc<FlakyApi>, FakePrompt>, company: &str, status: ApplicationStatus) -> ApplicationEntry {
        board.form.company = company.into();
        board.form.role = "Engineer".into();
        board.form.status = status;
        board.submit().await.unwrap()
    }

    #[tokio::test]
    async fn test_mount_loads_and_clears_loading() -> Result<()> {
        let (mut board, _, _) = dashboard(true);
        assert!(board.loading);
        board.mount().await?;
        assert!(!board.loading);
        assert!(board.applications.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_clears_form_and_reloads() -> Result<()> {
        let (mut board, _, _) = dashboard(true);
        board.mount().await?;
        board.form.location = "  ".into();
        let created = add(&mut board, "Acme", ApplicationStatus::Screening).await;
        assert_eq!(created.status, ApplicationStatus::Screening);
        assert_eq!(created.location, None);
        assert_eq!(board.form, FormFields::default());
        assert_eq!(board.applications, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form_and_alerts() -> Result<()> {
        let (mut board, _, prompt) = dashboard(true);
        board.form.company = "Acme".into();
        let err = board.submit().await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(board.form.company, "Acme");
        assert_eq!(*prompt.alerts.lock().unwrap(), vec!["company and role are required".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_status_change_patches_locally() -> Result<()> {
        let (mut board, api, _) = dashboard(true);
        let acme = add(&mut board, "Acme", ApplicationStatus::Applied).await;
        board.change_status(&acme.id, ApplicationStatus::Interview).await?;
        assert_eq!(board.applications[0].status, ApplicationStatus::Interview);
        let stored = api.inner.list(None).await?;
        assert_eq!(stored[0].status, ApplicationStatus::Interview);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_status_change_rolls_back() -> Result<()> {
        let (mut board, api, prompt) = dashboard(true);
        let acme = add(&mut board, "Acme", ApplicationStatus::Screening).await;
        api.fail_writes.store(true, Ordering::SeqCst);
        assert!(board.change_status(&acme.id, ApplicationStatus::Offer).await.is_err());
        assert_eq!(board.applications[0].status, ApplicationStatus::Screening);
        assert_eq!(prompt.alerts.lock().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_declined_delete_issues_no_call() -> Result<()> {
        let (mut board, api, _) = dashboard(false);
        let acme = add(&mut board, "Acme", ApplicationStatus::Applied).await;
        assert!(!board.delete(&acme.id).await?);
        assert!(api.deletes.lock().unwrap().is_empty());
        assert_eq!(board.applications.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_locally() -> Result<()> {
        let (mut board, api, _) = dashboard(true);
        let acme = add(&mut board, "Acme", ApplicationStatus::Applied).await;
        let globex = add(&mut board, "Globex", ApplicationStatus::Applied).await;
        assert!(board.delete(&acme.id).await?);
        assert_eq!(board.applications, vec![globex]);

        api.fail_writes.store(true, Ordering::SeqCst);
        let remaining = board.applications[0].id.clone();
        assert!(board.delete(&remaining).await.is_err());
        assert_eq!(board.applications.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_filter_change_reloads() -> Result<()> {
        let (mut board, _, _) = dashboard(true);
        add(&mut board, "Acme", ApplicationStatus::Offer).await;
        add(&mut board, "Globex", ApplicationStatus::Rejected).await;
        board.set_filter(Some(ApplicationStatus::Offer)).await?;
        assert_eq!(board.filter(), Some(ApplicationStatus::Offer));
        assert_eq!(board.applications.len(), 1);
        assert_eq!(board.applications[0].company, "Acme");
        board.set_filter(None).await?;
        assert_eq!(board.applications.len(), 2);
        Ok(())
    }
}
