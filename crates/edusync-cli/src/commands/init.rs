//! The `edusync init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("edusync.toml").exists() {
        println!("edusync.toml already exists, skipping.");
    } else {
        std::fs::write("edusync.toml", SAMPLE_CONFIG)?;
        println!("Created edusync.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit base_url in edusync.toml to point at your LMS API");
    println!("  2. Run: edusync login --email you@example.com");
    println!("  3. Run: edusync assessments");
    println!("  4. Run: edusync take --assessment <ID>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# edusync configuration

base_url = "https://edusync-webapp-g3esaqdqhygjckbq.centralindia-01.azurewebsites.net/api"
timeout_secs = 30

# Session file and result history live here.
data_dir = "${HOME}/.config/edusync"

# history_file = "${HOME}/.config/edusync/results.json"
# session_file = "${HOME}/.config/edusync/session.json"
"#;
