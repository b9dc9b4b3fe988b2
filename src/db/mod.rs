//! Database module: view models and SQL repositories.
//!
//! - `model`: row slices returned by repositories that are not domain entities.
//! - `repo`: SQL-only functions for articles and the categorization job queue.
//!
//! Callers import from `newsdesk::db`; the repository API is re-exported here.

pub mod model;
pub mod repo;

pub use repo::*;

pub use model::ClaimedJob;
