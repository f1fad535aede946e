//! Session file persistence.
//!
//! The CLI keeps the [`SessionContext`] from `login` in a JSON file until
//! `logout` removes it.

use std::path::Path;

use anyhow::{Context, Result};

use edusync_core::context::SessionContext;

use crate::config::EdusyncConfig;

/// Token override read by [`resolve_context`].
pub const TOKEN_ENV: &str = "EDUSYNC_TOKEN";

/// Read a saved session. A missing file is an anonymous session.
pub fn load_session(path: &Path) -> Result<SessionContext> {
    if !path.exists() {
        return Ok(SessionContext::anonymous());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse session: {}", path.display()))
}

/// Write `ctx` to `path`, creating parent directories.
pub fn save_session(path: &Path, ctx: &SessionContext) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(ctx)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write session: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "session saved");
    Ok(())
}

/// Remove the session file. Returns `false` if there was none.
pub fn clear_session(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            Err(e).with_context(|| format!("failed to remove session: {}", path.display()))
        }
    }
}

/// The session for `config`, with `EDUSYNC_TOKEN` taking precedence over the
/// saved token.
pub fn resolve_context(config: &EdusyncConfig) -> Result<SessionContext> {
    let ctx = load_session(&config.session_path())?;
    Ok(match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => ctx.with_token(token),
        _ => ctx,
    })
}
