//! The `edusync results` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use edusync_client::session_store::resolve_context;
use edusync_core::traits::LmsApi;

pub async fn execute(config_path: Option<PathBuf>, assessment_id: String) -> Result<()> {
    let (config, api) = super::client(config_path)?;
    let ctx = resolve_context(&config)?;

    let results = api.list_assessment_results(&ctx, &assessment_id).await?;
    if results.is_empty() {
        println!("No results found for this assessment.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["User", "Score", "Attempt Date", "Time"]);
    for r in &results {
        table.add_row(vec![
            Cell::new(r.user_id.as_deref().unwrap_or("-")),
            Cell::new(r.score),
            Cell::new(r.attempt_date.as_deref().unwrap_or("-")),
            Cell::new(
                r.time_taken
                    .map(|t| format!("{t}s"))
                    .unwrap_or_else(|| "-".into()),
            ),
        ]);
    }
    println!("{table}");

    Ok(())
}
