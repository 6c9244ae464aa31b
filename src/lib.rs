//! # Jobtrack
//!
//! A job application tracker, usable both as a standalone server binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! jobtrack = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jobtrack::server::{AppState, create_router};
//! use jobtrack::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/jobtrack.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store)));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! The tracking core can also be driven directly:
//!
//! ```rust,ignore
//! use jobtrack::tracker::{ApplicationFilter, ApplicationRepository, Identity, compute_metrics};
//!
//! let caller = Identity::new(user_id)?;
//! let apps = ApplicationRepository::new(store).list(&caller, &ApplicationFilter::default())?;
//! let metrics = compute_metrics(apps.iter().map(|a| &a.application));
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `jobtrack` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod tracker;
pub mod types;
