use std::sync::Arc;

use uuid::Uuid;

use super::identity::Identity;
use super::input::{CompanyPatch, NewCompany};
use super::{StoreCall, now};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::Company;

/// Owner-scoped operations on companies.
#[derive(Clone)]
pub struct CompanyRepository {
    store: Arc<dyn Store>,
}

impl CompanyRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, caller: &Identity, input: &NewCompany) -> Result<Company> {
        let valid = input.validate()?;

        let timestamp = now();
        let company = Company {
            id: Uuid::new_v4().to_string(),
            owner_id: caller.user_id().to_string(),
            name: valid.name,
            website: valid.website,
            location: valid.location,
            industry: valid.industry,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.store
            .insert_company(&company)
            .store_call("insert company")?;

        tracing::info!("Created company {} for {}", company.id, caller);
        Ok(company)
    }

    pub fn get(&self, caller: &Identity, id: &str) -> Result<Company> {
        self.store
            .get_company(caller.user_id(), id)
            .store_call("get company")?
            .ok_or(Error::NotFound)
    }

    /// Sorted by name, case-insensitively.
    pub fn list(&self, caller: &Identity) -> Result<Vec<Company>> {
        self.store
            .list_companies(caller.user_id())
            .store_call("list companies")
    }

    pub fn update(&self, caller: &Identity, id: &str, patch: &CompanyPatch) -> Result<Company> {
        let valid = patch.validate()?;
        let mut company = self.get(caller, id)?;

        valid.apply(&mut company);
        company.updated_at = now();

        self.store
            .update_company(&company)
            .store_call("update company")?;

        Ok(company)
    }

    /// Refuses while applications still reference the company unless `force`
    /// is set, in which case those applications are deleted with it.
    pub fn delete(&self, caller: &Identity, id: &str, force: bool) -> Result<()> {
        let company = self.get(caller, id)?;

        let removed = self
            .store
            .delete_company(caller.user_id(), &company.id, force)
            .store_call("delete company")?
            .ok_or(Error::NotFound)?;

        tracing::info!(
            "Deleted company {} for {} ({} application(s) removed)",
            company.id,
            caller,
            removed
        );
        Ok(())
    }
}
