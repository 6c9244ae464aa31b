//! Caller-supplied inputs and their validation.
//!
//! Inputs carry raw strings so that an unknown status or a malformed date
//! surfaces as a `Validation` error with a readable message instead of a
//! deserialization failure. Validation is pure: nothing here touches the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{Application, ApplicationStatus, Company};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewApplication {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub date_applied: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub interview_date: Option<String>,
    #[serde(default)]
    pub offer_date: Option<String>,
    #[serde(default)]
    pub rejected_date: Option<String>,
}

/// Field-level update. `None` leaves a field untouched; for the optional
/// fields an empty string clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationPatch {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub date_applied: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub interview_date: Option<String>,
    #[serde(default)]
    pub offer_date: Option<String>,
    #[serde(default)]
    pub rejected_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCompany {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidApplication {
    pub position: String,
    pub company_id: String,
    pub date_applied: NaiveDate,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub offer_date: Option<NaiveDate>,
    pub rejected_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ValidPatch {
    pub position: Option<String>,
    pub company_id: Option<String>,
    pub date_applied: Option<NaiveDate>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<Option<String>>,
    pub interview_date: Option<Option<NaiveDate>>,
    pub offer_date: Option<Option<NaiveDate>>,
    pub rejected_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidCompany {
    pub name: String,
    pub website: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ValidCompanyPatch {
    pub name: Option<String>,
    pub website: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub industry: Option<Option<String>>,
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its UTC calendar date is kept).
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| {
            Error::validation(format!(
                "invalid {field} '{raw}', expected a date like 2024-01-31"
            ))
        })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `None` stays untouched, blank clears, anything else is kept trimmed.
fn clearable(value: Option<&str>) -> Option<Option<String>> {
    value.map(|v| non_blank(Some(v)))
}

fn optional_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    non_blank(raw).map(|v| parse_date(field, &v)).transpose()
}

fn clearable_date(field: &str, raw: Option<&str>) -> Result<Option<Option<NaiveDate>>> {
    raw.map(|v| optional_date(field, Some(v))).transpose()
}

/// Status labels are matched exactly as sent; surrounding spaces are rejected.
fn parse_status(raw: Option<&str>) -> Result<ApplicationStatus> {
    raw.unwrap_or_default().parse()
}

fn required_in_patch(field: &str, raw: Option<&str>) -> Result<Option<String>> {
    match raw {
        None => Ok(None),
        Some(v) => non_blank(Some(v))
            .map(Some)
            .ok_or_else(|| Error::validation(format!("{field} cannot be empty"))),
    }
}

impl NewApplication {
    pub(crate) fn validate(&self) -> Result<ValidApplication> {
        let position = non_blank(self.position.as_deref());
        let company_id = non_blank(self.company_id.as_deref());
        let date_applied = non_blank(self.date_applied.as_deref());
        let status = non_blank(self.status.as_deref());

        let missing: Vec<&str> = [
            ("position", position.is_none()),
            ("company_id", company_id.is_none()),
            ("date_applied", date_applied.is_none()),
            ("status", status.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, is_missing)| is_missing.then_some(field))
        .collect();

        let (Some(position), Some(company_id), Some(date_applied), Some(_)) =
            (position, company_id, date_applied, status)
        else {
            return Err(Error::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        };

        Ok(ValidApplication {
            position,
            company_id,
            date_applied: parse_date("date_applied", &date_applied)?,
            status: parse_status(self.status.as_deref())?,
            notes: non_blank(self.notes.as_deref()),
            interview_date: optional_date("interview_date", self.interview_date.as_deref())?,
            offer_date: optional_date("offer_date", self.offer_date.as_deref())?,
            rejected_date: optional_date("rejected_date", self.rejected_date.as_deref())?,
        })
    }
}

impl From<NewApplication> for ApplicationPatch {
    fn from(input: NewApplication) -> Self {
        Self {
            position: input.position,
            company_id: input.company_id,
            date_applied: input.date_applied,
            status: input.status,
            notes: input.notes,
            interview_date: input.interview_date,
            offer_date: input.offer_date,
            rejected_date: input.rejected_date,
        }
    }
}

impl ApplicationPatch {
    pub(crate) fn validate(&self) -> Result<ValidPatch> {
        let status = required_in_patch("status", self.status.as_deref())?
            .map(|_| parse_status(self.status.as_deref()))
            .transpose()?;
        let date_applied = required_in_patch("date_applied", self.date_applied.as_deref())?
            .map(|d| parse_date("date_applied", &d))
            .transpose()?;

        Ok(ValidPatch {
            position: required_in_patch("position", self.position.as_deref())?,
            company_id: required_in_patch("company_id", self.company_id.as_deref())?,
            date_applied,
            status,
            notes: clearable(self.notes.as_deref()),
            interview_date: clearable_date("interview_date", self.interview_date.as_deref())?,
            offer_date: clearable_date("offer_date", self.offer_date.as_deref())?,
            rejected_date: clearable_date("rejected_date", self.rejected_date.as_deref())?,
        })
    }
}

impl ValidPatch {
    pub(crate) fn apply(self, app: &mut Application) {
        if let Some(position) = self.position {
            app.position = position;
        }
        if let Some(company_id) = self.company_id {
            app.company_id = company_id;
        }
        if let Some(date_applied) = self.date_applied {
            app.date_applied = date_applied;
        }
        if let Some(status) = self.status {
            app.status = status;
        }
        if let Some(notes) = self.notes {
            app.notes = notes;
        }
        if let Some(date) = self.interview_date {
            app.interview_date = date;
        }
        if let Some(date) = self.offer_date {
            app.offer_date = date;
        }
        if let Some(date) = self.rejected_date {
            app.rejected_date = date;
        }
    }
}

impl NewCompany {
    pub(crate) fn validate(&self) -> Result<ValidCompany> {
        let name = non_blank(self.name.as_deref())
            .ok_or_else(|| Error::validation("missing required fields: name"))?;

        Ok(ValidCompany {
            name,
            website: non_blank(self.website.as_deref()),
            location: non_blank(self.location.as_deref()),
            industry: non_blank(self.industry.as_deref()),
        })
    }
}

impl CompanyPatch {
    pub(crate) fn validate(&self) -> Result<ValidCompanyPatch> {
        Ok(ValidCompanyPatch {
            name: required_in_patch("name", self.name.as_deref())?,
            website: clearable(self.website.as_deref()),
            location: clearable(self.location.as_deref()),
            industry: clearable(self.industry.as_deref()),
        })
    }
}

impl ValidCompanyPatch {
    pub(crate) fn apply(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(website) = self.website {
            company.website = website;
        }
        if let Some(location) = self.location {
            company.location = location;
        }
        if let Some(industry) = self.industry {
            company.industry = industry;
        }
    }
}
