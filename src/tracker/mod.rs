//! The tracking core: owner-scoped repositories and pipeline metrics.

mod applications;
mod companies;
mod filter;
mod identity;
mod input;
pub mod metrics;

pub use applications::ApplicationRepository;
pub use companies::CompanyRepository;
pub use filter::ApplicationFilter;
pub use identity::Identity;
pub use input::{ApplicationPatch, CompanyPatch, NewApplication, NewCompany, parse_date};
pub use metrics::{ApplicationMetrics, compute_metrics};

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::Result;

/// Timestamps are kept at microsecond precision, matching what the store persists.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Maps infrastructure failures from a store call to `StoreUnavailable`.
pub(crate) trait StoreCall<T> {
    fn store_call(self, action: &'static str) -> Result<T>;
}

impl<T> StoreCall<T> for Result<T> {
    fn store_call(self, action: &'static str) -> Result<T> {
        self.map_err(|e| {
            let e = e.into_store_unavailable();
            if let crate::error::Error::StoreUnavailable(reason) = &e {
                tracing::error!("Failed to {action}: {reason}");
            }
            e
        })
    }
}
