//! edusync CLI: take assessments against an LMS REST API.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "edusync", version, about = "Take LMS assessments from the terminal")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List assessments grouped by course
    Assessments {
        /// Only show this course
        #[arg(long)]
        course: Option<String>,
    },

    /// Take an assessment
    Take {
        /// Assessment ID
        #[arg(long)]
        assessment: String,

        /// Answers by question as option numbers, e.g. "1,3,,2" (blank skips)
        #[arg(long)]
        answers: Option<String>,
    },

    /// Show locally recorded attempts
    History {
        /// Only show this assessment
        #[arg(long)]
        assessment: Option<String>,
    },

    /// Show server-side results for an assessment
    Results {
        /// Assessment ID
        #[arg(long)]
        assessment: String,
    },

    /// Check a question payload file
    Validate {
        /// Path to the payload (JSON array or Q/Options/Answer text)
        #[arg(long)]
        payload: PathBuf,

        /// Print the parsed questions as a JSON array
        #[arg(long)]
        emit_json: bool,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("edusync=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(config, email, password).await
        }
        Commands::Logout => commands::auth::logout(config),
        Commands::Whoami => commands::auth::whoami(config),
        Commands::Assessments { course } => commands::assessments::execute(config, course).await,
        Commands::Take {
            assessment,
            answers,
        } => commands::take::execute(config, assessment, answers).await,
        Commands::History { assessment } => commands::history::execute(config, assessment).await,
        Commands::Results { assessment } => commands::results::execute(config, assessment).await,
        Commands::Validate { payload, emit_json } => commands::validate::execute(payload, emit_json),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
