use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::filter::ApplicationFilter;
use super::identity::Identity;
use super::input::{ApplicationPatch, NewApplication};
use super::metrics::{ApplicationMetrics, compute_metrics};
use super::{StoreCall, now};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Application, ApplicationWithCompany, Company};

/// Owner-scoped operations on applications.
///
/// Every call filters on both the row id and the caller's id. A row owned by
/// someone else is reported exactly like a missing row.
#[derive(Clone)]
pub struct ApplicationRepository {
    store: Arc<dyn Store>,
}

impl ApplicationRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, caller: &Identity, input: &NewApplication) -> Result<ApplicationWithCompany> {
        let valid = input.validate()?;
        let company = self.owned_company(caller, &valid.company_id)?;

        let timestamp = now();
        let application = Application {
            id: Uuid::new_v4().to_string(),
            owner_id: caller.user_id().to_string(),
            company_id: valid.company_id,
            position: valid.position,
            status: valid.status,
            date_applied: valid.date_applied,
            notes: valid.notes,
            interview_date: valid.interview_date,
            offer_date: valid.offer_date,
            rejected_date: valid.rejected_date,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.store
            .insert_application(&application)
            .store_call("insert application")?;

        tracing::info!(
            "Created application {} ({}) for {}",
            application.id,
            application.status,
            caller
        );

        Ok(ApplicationWithCompany {
            application,
            company: Some(company),
        })
    }

    pub fn get(&self, caller: &Identity, id: &str) -> Result<ApplicationWithCompany> {
        let application = self.load_owned(caller, id)?;
        self.with_company(caller, application)
    }

    /// Applies only the supplied fields and bumps `updated_at`.
    pub fn update(
        &self,
        caller: &Identity,
        id: &str,
        patch: &ApplicationPatch,
    ) -> Result<ApplicationWithCompany> {
        let valid = patch.validate()?;
        let mut application = self.load_owned(caller, id)?;

        if let Some(company_id) = &valid.company_id {
            if *company_id != application.company_id {
                self.owned_company(caller, company_id)?;
            }
        }

        valid.apply(&mut application);
        application.updated_at = now();

        self.store
            .update_application(&application)
            .store_call("update application")?;

        tracing::debug!("Updated application {} for {}", application.id, caller);

        self.with_company(caller, application)
    }

    /// Full update: the four required fields must all be present.
    pub fn replace(
        &self,
        caller: &Identity,
        id: &str,
        input: &NewApplication,
    ) -> Result<ApplicationWithCompany> {
        input.validate()?;
        self.update(caller, id, &ApplicationPatch::from(input.clone()))
    }

    pub fn delete(&self, caller: &Identity, id: &str) -> Result<()> {
        let application = self.load_owned(caller, id)?;

        let deleted = self
            .store
            .delete_application(caller.user_id(), &application.id)
            .store_call("delete application")?;

        if !deleted {
            return Err(Error::NotFound);
        }

        tracing::info!("Deleted application {} for {}", application.id, caller);
        Ok(())
    }

    /// All of the caller's applications, newest first, narrowed by `filter`.
    pub fn list(
        &self,
        caller: &Identity,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationWithCompany>> {
        let applications = self
            .store
            .list_applications(caller.user_id())
            .store_call("list applications")?;

        let companies: HashMap<String, Company> = self
            .store
            .list_companies(caller.user_id())
            .store_call("list companies")?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let rows = applications
            .into_iter()
            .map(|application| {
                let company = companies.get(&application.company_id).cloned();
                ApplicationWithCompany {
                    application,
                    company,
                }
            })
            .filter(|row| filter.matches(row))
            .collect();

        Ok(rows)
    }

    /// Stage counts and phase averages over every application the caller owns.
    pub fn metrics(&self, caller: &Identity) -> Result<ApplicationMetrics> {
        let applications = self
            .store
            .list_applications(caller.user_id())
            .store_call("list applications")?;

        Ok(compute_metrics(&applications))
    }

    /// Load-and-authorize: the row only exists for its owner.
    fn load_owned(&self, caller: &Identity, id: &str) -> Result<Application> {
        self.store
            .get_application(caller.user_id(), id)
            .store_call("get application")?
            .ok_or(Error::NotFound)
    }

    fn owned_company(&self, caller: &Identity, company_id: &str) -> Result<Company> {
        self.store
            .get_company(caller.user_id(), company_id)
            .store_call("get company")?
            .ok_or_else(|| Error::validation(format!("company '{company_id}' not found")))
    }

    fn with_company(
        &self,
        caller: &Identity,
        application: Application,
    ) -> Result<ApplicationWithCompany> {
        let company = self
            .store
            .get_company(caller.user_id(), &application.company_id)
            .store_call("get company")?;

        Ok(ApplicationWithCompany {
            application,
            company,
        })
    }
}
