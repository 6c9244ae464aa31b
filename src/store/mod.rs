mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Every company and application query takes the owner id alongside the row id;
/// the store itself enforces no business rules beyond that equality filter.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_name(&self, name: &str) -> Result<Option<User>>;
    fn list_users(&self, cursor: &str, limit: i32) -> Result<Vec<User>>;
    fn delete_user(&self, id: &str) -> Result<bool>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn list_user_tokens(&self, user_id: &str) -> Result<Vec<Token>>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;

    // Company operations
    fn insert_company(&self, company: &Company) -> Result<()>;
    fn get_company(&self, owner_id: &str, id: &str) -> Result<Option<Company>>;
    fn list_companies(&self, owner_id: &str) -> Result<Vec<Company>>;
    fn update_company(&self, company: &Company) -> Result<()>;
    /// Returns how many applications went with the company, or `None` if no
    /// such company exists for the owner. Without `cascade`, a company that is
    /// still referenced yields `Error::Conflict` and nothing is deleted.
    fn delete_company(&self, owner_id: &str, id: &str, cascade: bool) -> Result<Option<usize>>;

    // Application operations
    fn insert_application(&self, app: &Application) -> Result<()>;
    fn get_application(&self, owner_id: &str, id: &str) -> Result<Option<Application>>;
    /// Newest first by `created_at`, ties broken by insertion order.
    fn list_applications(&self, owner_id: &str) -> Result<Vec<Application>>;
    fn update_application(&self, app: &Application) -> Result<()>;
    fn delete_application(&self, owner_id: &str, id: &str) -> Result<bool>;

    // Admin token check
    fn has_admin_token(&self) -> Result<bool>;
}
