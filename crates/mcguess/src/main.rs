mod evaluate;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mcguess_common::{logger, AppConfig};
use mcguess_guesser::{Candidate, Resources};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "mcguess")]
#[command(about = "mcguess - word2vec multiple choice question answering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
struct ConfigArgs {
    /// Config file (YAML/TOML/JSON); environment variables are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self) -> Result<AppConfig> {
        let config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::from_env()?,
        };
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Answer a single question and print the chosen answer
    Guess {
        /// Question text
        #[arg(long, short)]
        question: String,

        #[arg(long)]
        a: Option<String>,

        #[arg(long)]
        b: Option<String>,

        #[arg(long)]
        c: Option<String>,

        #[arg(long)]
        d: Option<String>,

        /// Print every candidate's tokens and score as JSON
        #[arg(long)]
        report: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Measure accuracy over a JSON-lines question bank
    Evaluate {
        /// Question bank; each line is a request with the gold answer under "^"
        #[arg(long)]
        bank: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load .env at project root before AppConfig reads the environment
    load_dotenv_from_project_root();

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        config: ConfigArgs::default(),
    });

    match command {
        Commands::Serve { host, port, config } => {
            let mut config = config.load()?;
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            config.validate()?;

            logger::setup_logging(&config.log_dir, &config.log_level)?;

            tracing::info!("mcguess starting...");
            tracing::info!("Configuration loaded:");
            tracing::info!("  Vectors: {}", config.w2v_model.display());
            tracing::info!("  Stop words: {}", config.stop_words.display());
            tracing::info!("  POS lexicon: {}", config.pos_model.display());
            tracing::info!("  Filtered tags: {}", config.filtered_tags.join(","));

            // Fatal: never serve with partially loaded resources
            let resources = Resources::load(&config).context("Failed to load resources")?;

            println!("Server listening on http://{}", config.server_bind_address());
            mcguess_server::start_server(config, resources).await?;
        }
        Commands::Guess {
            question,
            a,
            b,
            c,
            d,
            report,
            config,
        } => {
            let config = config.load()?;
            logger::setup_console_logging(&config.log_level)?;

            let resources = Resources::load(&config).context("Failed to load resources")?;
            let guesser = resources.guesser(1)?;

            let candidates: Vec<Candidate> = [("A", a), ("B", b), ("C", c), ("D", d)]
                .into_iter()
                .filter_map(|(label, text)| text.map(|t| Candidate::new(label, t)))
                .collect();

            let result = guesser.report(&question, &candidates);
            if report {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }

            match result.answer() {
                Some(answer) => {
                    if !report {
                        println!("{}", answer);
                    }
                }
                None => {
                    eprintln!("No answer could be scored");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Evaluate { bank, config } => {
            let config = config.load()?;
            logger::setup_console_logging(&config.log_level)?;

            let resources = Resources::load(&config).context("Failed to load resources")?;
            let guesser = resources.guesser(1)?;

            let file = File::open(&bank)
                .with_context(|| format!("Failed to open question bank {}", bank.display()))?;
            let eval = evaluate::evaluate(&guesser, BufReader::new(file))?;

            println!(
                "Got {} correct out of {} which is {:.2}%",
                eval.correct,
                eval.total,
                eval.accuracy()
            );
            if eval.unanswered > 0 || eval.skipped > 0 {
                println!("{} unanswered, {} skipped", eval.unanswered, eval.skipped);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
