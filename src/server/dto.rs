use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracker::NewApplication;
use crate::types::{ApplicationStatus, Token};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserTokenRequest {
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub id: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<Token> for TokenResponse {
    fn from(token: Token) -> Self {
        Self {
            id: token.id,
            is_admin: token.is_admin,
            user_id: token.user_id,
            created_at: token.created_at,
            expires_at: token.expires_at,
            last_used_at: token.last_used_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateTokenResponse {
    pub token: String,
    pub metadata: TokenResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListApplicationsParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteCompanyParams {
    #[serde(default)]
    pub force: Option<bool>,
}

/// Body of `POST /applications`. Status and application date fall back to
/// "Applied" and today when omitted, like the new-application form does.
#[derive(Debug, Default, Deserialize)]
pub struct CreateApplicationRequest {
    #[serde(flatten)]
    pub input: NewApplication,
}

impl CreateApplicationRequest {
    #[must_use]
    pub fn with_defaults(self, today: chrono::NaiveDate) -> NewApplication {
        let mut input = self.input;
        if input.status.is_none() {
            input.status = Some(ApplicationStatus::default().to_string());
        }
        if input.date_applied.is_none() {
            input.date_applied = Some(today.format("%Y-%m-%d").to_string());
        }
        input
    }
}
