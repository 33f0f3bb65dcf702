//! Core types shared across the mining pipeline.

mod error;
pub mod progress;
mod record;

pub use error::{Error, Result};
pub use progress::RepositoryProgress;
pub use record::{ChangeSummary, CommitRecord};
