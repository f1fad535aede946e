//! The `edusync login`, `logout` and `whoami` commands.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};

use edusync_client::load_config_from;
use edusync_client::session_store::{clear_session, resolve_context, save_session, TOKEN_ENV};
use edusync_core::context::SessionContext;
use edusync_core::model::Credentials;
use edusync_core::traits::LmsApi;

pub async fn login(
    config_path: Option<PathBuf>,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let (config, api) = super::client(config_path)?;

    let password = match password {
        Some(p) => p,
        None => {
            eprint!("Password: ");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read password")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let response = api
        .login(&Credentials { email, password })
        .await
        .context("login failed")?;
    let ctx = SessionContext::from_login(response);
    save_session(&config.session_path(), &ctx)?;

    if let Some(user) = ctx.user() {
        println!("Logged in as {} ({})", user.name, user.role);
    }
    Ok(())
}

pub fn logout(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    if clear_session(&config.session_path())? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let ctx = resolve_context(&config)?;

    match (ctx.is_authenticated(), ctx.user()) {
        (true, Some(user)) => println!("{} <{}> ({})", user.name, user.email, user.role),
        (true, None) => println!("Authenticated with a token from {TOKEN_ENV}."),
        (false, _) => println!("Not logged in."),
    }
    Ok(())
}
