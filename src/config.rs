use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub llm_base_url: String,
    pub llm_model: String,
    /// Only read from the environment; absent is allowed at startup.
    pub llm_api_key: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "AI-assisted student task organizer")]
pub struct Args {
    /// Host to bind to (overrides STUDY_BUCKETS_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides STUDY_BUCKETS_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides STUDY_BUCKETS_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Base URL of the OpenAI-compatible API (overrides STUDY_BUCKETS_LLM_BASE_URL)
    #[arg(long)]
    pub llm_base_url: Option<String>,

    /// Model used for task classification (overrides STUDY_BUCKETS_LLM_MODEL)
    #[arg(long)]
    pub llm_model: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("STUDY_BUCKETS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("STUDY_BUCKETS_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing STUDY_BUCKETS_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading STUDY_BUCKETS_PORT"),
        };
        let env_db = env::var("STUDY_BUCKETS_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/study_buckets.db".into());
        let env_llm_base = env::var("STUDY_BUCKETS_LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let env_llm_model =
            env::var("STUDY_BUCKETS_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        let llm_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            llm_base_url: args.llm_base_url.unwrap_or(env_llm_base),
            llm_model: args.llm_model.unwrap_or(env_llm_model),
            llm_api_key,
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Hand-written so the API key never reaches the startup log line.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
