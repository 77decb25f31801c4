//! rehearse CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rehearse", version, about = "Mock interview practice and scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a mock interview
    Run {
        /// Job role (e.g. "Backend Developer")
        #[arg(long)]
        role: Option<String>,

        /// Experience level: entry, mid, senior
        #[arg(long)]
        experience: Option<String>,

        /// JSON file with one answer per question; skips interactive input
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Question bank TOML file (overrides config)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Directory of question-<n>.txt transcripts for /dictate
        #[arg(long)]
        transcripts: Option<PathBuf>,

        /// Pause before each answer is scored, in milliseconds
        #[arg(long)]
        latency_ms: Option<u64>,

        /// Directory to export the report to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export format: json, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a single answer
    Score {
        /// The answer text
        answer: String,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,
    },

    /// List job roles and their question sets
    Roles {
        /// Question bank TOML file (overrides config)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a question bank TOML file
    Validate {
        /// Path to the question bank
        #[arg(long)]
        questions: PathBuf,
    },

    /// Compare an interview report against an earlier one
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if the overall score went down
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rehearse=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            role,
            experience,
            answers,
            questions,
            transcripts,
            latency_ms,
            output,
            format,
            config,
        } => {
            commands::run::execute(commands::run::RunArgs {
                role,
                experience,
                answers,
                questions,
                transcripts,
                latency_ms,
                output,
                format,
                config,
            })
            .await
        }
        Commands::Score { answer, json } => commands::score::execute(answer, json),
        Commands::Roles { questions, config } => commands::roles::execute(questions, config),
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
