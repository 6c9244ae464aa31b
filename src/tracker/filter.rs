use crate::types::ApplicationWithCompany;

/// Case-insensitive free-text filter over a caller's applications.
///
/// A row matches when the query is a substring of the company name, the
/// position, the status label or the company location. A blank query
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    needle: Option<String>,
}

impl ApplicationFilter {
    pub fn new(query: &str) -> Self {
        let trimmed = query.trim();
        Self {
            needle: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_none()
    }

    #[must_use]
    pub fn matches(&self, row: &ApplicationWithCompany) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };

        let company = row.company.as_ref();
        [
            company.map(|c| c.name.as_str()),
            Some(row.application.position.as_str()),
            Some(row.application.status.as_str()),
            company.and_then(|c| c.location.as_deref()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

impl From<Option<&str>> for ApplicationFilter {
    fn from(query: Option<&str>) -> Self {
        query.map(Self::new).unwrap_or_default()
    }
}
