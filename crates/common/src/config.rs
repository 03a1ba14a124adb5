use crate::error::McGuessError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tags dropped by default: closed-class words that carry little meaning
pub const DEFAULT_FILTERED_TAGS: &[&str] = &[
    "CC", "CD", "DT", "EX", "IN", "LS", "MD", "PDT", "POS", "PRP", "PRP$", "RP", "SYM", "TO",
    "UH", "WDT", "WP", "WP$", "WRB",
];

/// mcguess application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Word2vec binary model path
    pub w2v_model: PathBuf,

    /// Stop word list path (one word per line)
    pub stop_words: PathBuf,

    /// POS lexicon path (word<TAB>TAG per line)
    pub pos_model: PathBuf,

    /// POS tags whose tokens are excluded from scoring
    pub filtered_tags: Vec<String>,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// HTTP worker count (0 = one per CPU)
    pub workers: usize,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            w2v_model: PathBuf::from("./models/vectors.bin"),
            stop_words: PathBuf::from("./models/stop_words.txt"),
            pos_model: PathBuf::from("./models/pos_lexicon.tsv"),
            filtered_tags: DEFAULT_FILTERED_TAGS.iter().map(|t| t.to_string()).collect(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            workers: 0,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, McGuessError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();
        let config = Self {
            w2v_model: Self::get_env_path("W2V_MODEL").unwrap_or(defaults.w2v_model),
            stop_words: Self::get_env_path("STOP_WORDS").unwrap_or(defaults.stop_words),
            pos_model: Self::get_env_path("POS_MODEL").unwrap_or(defaults.pos_model),
            filtered_tags: std::env::var("FILTERED_TAGS")
                .map(|s| parse_tag_list(&s))
                .unwrap_or(defaults.filtered_tags),
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            workers: std::env::var("WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.workers),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a YAML/TOML/JSON file, overlaid with
    /// `MCGUESS_`-prefixed environment variables
    pub fn load(path: &Path) -> Result<Self, McGuessError> {
        let _ = dotenv::dotenv();

        if !path.exists() {
            return Err(McGuessError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        // Missing keys fall back to Default via #[serde(default)]
        let config: Self = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix("MCGUESS")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("filtered_tags"),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                McGuessError::config(format!("Failed to load {}: {}", path.display(), e))
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), McGuessError> {
        let paths = [
            ("w2v_model", &self.w2v_model),
            ("stop_words", &self.stop_words),
            ("pos_model", &self.pos_model),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(McGuessError::config(format!("{} path cannot be empty", name)));
            }
        }

        if self.filtered_tags.iter().any(|t| t.trim().is_empty()) {
            return Err(McGuessError::config("Filtered tags cannot contain an empty tag"));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(McGuessError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

/// Split a comma separated tag list, dropping blanks
fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
