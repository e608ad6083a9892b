use askama::Template;

use crate::pkg::internal::status::ApplicationStatus;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub title: &'static str,
    pub statuses: [ApplicationStatus; 6],
}

impl Default for DashboardPage {
    fn default() -> Self {
        DashboardPage {
            title: "Job Application Dashboard",
            statuses: ApplicationStatus::ALL,
        }
    }
}
