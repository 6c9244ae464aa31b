use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The closed set of lifecycle stages an application can be in.
///
/// The wire and storage representation is the human-readable label
/// (`"Interview Scheduled"`, not `"interview_scheduled"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    InterviewScheduled,
    InProgress,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::InProgress,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::InProgress => "In Progress",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Exact match against the stored labels. Case and spacing are significant.
    pub fn parse(s: &str) -> Option<ApplicationStatus> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// True for the stages counted as "interviewing" on the dashboard.
    #[must_use]
    pub const fn is_interviewing(self) -> bool {
        matches!(
            self,
            ApplicationStatus::InterviewScheduled | ApplicationStatus::InProgress
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let allowed: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
            Error::validation(format!(
                "invalid status '{s}', expected one of: {}",
                allowed.join(", ")
            ))
        })
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApplicationStatus> for &'static str {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str()
    }
}
