mod models;
mod status;

pub use models::{Application, ApplicationWithCompany, Company, Token, User};
pub use status::ApplicationStatus;
