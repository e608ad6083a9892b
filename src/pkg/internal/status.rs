use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "application_status", rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Screening,
    Interview,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Every status, in pipeline order.
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Screening,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Screening => "SCREENING",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Offer => "OFFER",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Withdrawn => "WITHDRAWN",
        }
    }

    /// Informational only, transitions out of these are still allowed.
    pub fn is_conventionally_final(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Offer | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.to_uppercase();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Coerces any input into a status. Absent input reads as "APPLIED" and
/// anything unrecognised falls back to APPLIED as well.
pub fn normalize_status(input: Option<&str>) -> ApplicationStatus {
    input
        .unwrap_or("APPLIED")
        .parse()
        .unwrap_or_default()
}

/// List filters are dropped entirely when they don't name a status.
pub fn parse_status_filter(input: Option<&str>) -> Option<ApplicationStatus> {
    input.and_then(|s| s.parse().ok())
}
