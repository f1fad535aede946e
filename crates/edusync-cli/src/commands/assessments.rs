//! The `edusync assessments` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use edusync_client::session_store::resolve_context;
use edusync_core::catalog::load_catalog;

pub async fn execute(config_path: Option<PathBuf>, course: Option<String>) -> Result<()> {
    let (config, api) = super::client(config_path)?;
    let ctx = resolve_context(&config)?;

    let catalog = load_catalog(&api, &ctx, course.as_deref()).await?;
    if catalog.iter().all(|c| c.assessments.is_empty()) {
        println!("No assessments found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Course", "Assessment ID", "Title", "Max Score"]);
    for group in &catalog {
        for a in &group.assessments {
            table.add_row(vec![
                Cell::new(&group.course_title),
                Cell::new(&a.assessment_id),
                Cell::new(&a.title),
                Cell::new(a.max_score),
            ]);
        }
    }
    println!("{table}");

    Ok(())
}
