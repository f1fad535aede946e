//! The `edusync validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use edusync_core::parser::{parse_questions, validate_questions, PayloadFormat};

pub fn execute(payload_path: PathBuf, emit_json: bool) -> Result<()> {
    let payload = std::fs::read_to_string(&payload_path)
        .with_context(|| format!("failed to read payload: {}", payload_path.display()))?;

    let parsed = parse_questions(&payload);
    if let Some(err) = &parsed.error {
        anyhow::bail!("{}: {err}", payload_path.display());
    }

    // Keep stdout clean for the JSON output.
    let report = |line: String| {
        if emit_json {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    };

    let format = match parsed.format {
        PayloadFormat::Json => "json",
        PayloadFormat::Text => "text",
        PayloadFormat::Empty => "empty",
    };
    report(format!(
        "Payload: {} ({format}, {} question(s))",
        payload_path.display(),
        parsed.questions.len()
    ));
    if parsed.dropped_blocks > 0 {
        report(format!(
            "  WARNING: {} malformed block(s) dropped",
            parsed.dropped_blocks
        ));
    }

    let warnings = validate_questions(&parsed.questions);
    for w in &warnings {
        report(format!("  [Q{}] WARNING: {}", w.index + 1, w.message));
    }

    let total = warnings.len() + usize::from(parsed.dropped_blocks > 0);
    if total == 0 {
        report("Payload valid.".to_string());
    } else {
        report(format!("\n{total} warning(s) found."));
    }

    if emit_json {
        println!("{}", serde_json::to_string_pretty(&parsed.questions)?);
    }

    Ok(())
}
