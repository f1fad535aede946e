pub mod assessments;
pub mod auth;
pub mod history;
pub mod init;
pub mod results;
pub mod take;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use edusync_client::{load_config_from, EdusyncConfig, RestApi};

/// Load the config and build the API client for it.
pub(crate) fn client(config_path: Option<PathBuf>) -> Result<(EdusyncConfig, RestApi)> {
    let config = load_config_from(config_path.as_deref())?;
    let api = RestApi::from_config(&config)?;
    tracing::debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "API client ready");
    Ok((config, api))
}
