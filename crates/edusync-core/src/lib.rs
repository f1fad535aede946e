//! edusync-core: Assessment model, question parsing, scoring and sessions.
//!
//! This crate defines the data model, the API and history traits, and the
//! assessment session handler that the rest of edusync builds on.

pub mod catalog;
pub mod context;
pub mod error;
pub mod history;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod session;
pub mod traits;

pub use context::SessionContext;
pub use error::{ApiError, ParseError, SessionError};
pub use session::{AssessmentSession, SessionWarning, Submission};
