//! The `edusync history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use edusync_client::load_config_from;
use edusync_core::history::JsonFileHistory;
use edusync_core::model::HistoryEntry;
use edusync_core::traits::ResultHistory;

pub async fn execute(config_path: Option<PathBuf>, assessment: Option<String>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let history = JsonFileHistory::new(config.history_path());
    tracing::debug!(path = %history.path().display(), "reading result history");

    let entries: Vec<_> = history
        .entries()
        .await?
        .into_iter()
        .filter(|e| assessment.as_deref().map_or(true, |id| e.assessment_id == id))
        .collect();

    if entries.is_empty() {
        println!("No results recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Assessment", "Score", "Correct", "Time"]);
    for e in &entries {
        table.add_row(vec![
            Cell::new(e.attempt_date.format("%Y-%m-%d %H:%M")),
            Cell::new(&e.assessment_title),
            Cell::new(format!("{} / {}", e.score, e.max_score)),
            Cell::new(format!("{} / {}", e.correct_answers, e.questions)),
            Cell::new(format!("{}s", e.time_taken)),
        ]);
    }
    println!("{table}");

    match average_percent(&entries) {
        Some(average) => println!("{} attempt(s), average {average:.1}%", entries.len()),
        None => println!("{} attempt(s)", entries.len()),
    }

    Ok(())
}

/// Mean of score / max score over attempts with a non-zero max score.
fn average_percent(entries: &[HistoryEntry]) -> Option<f64> {
    let ratios: Vec<f64> = entries
        .iter()
        .filter(|e| e.max_score > 0)
        .map(|e| e.score as f64 / e.max_score as f64)
        .collect();
    if ratios.is_empty() {
        return None;
    }
    Some(ratios.iter().sum::<f64>() / ratios.len() as f64 * 100.0)
}
