//! edusync-client: LMS REST API client.
//!
//! Implements the `LmsApi` trait over HTTP and provides configuration loading
//! and session file storage for the CLI.

pub mod api;
pub mod config;
pub mod http;
pub mod mock;
pub mod session_store;

pub use api::RestApi;
pub use config::{load_config, load_config_from, EdusyncConfig};
pub use edusync_core::error::ApiError;
pub use http::HttpClient;
