use std::env;

/// Process configuration, loaded once at startup from the environment.
/// `dotenvy` populates `std::env` from a `.env` file first, if present.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,

    pub openai_api_key: Option<String>,
    pub xai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub arc_api_key: Option<String>,

    pub xai_max_concurrency: Option<u32>,
    pub xai_max_retries: Option<u32>,
    pub xai_retry_base_delay_ms: Option<u64>,

    pub puzzle_dataset_root: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} is not a valid {1}: {2}")]
    Invalid(&'static str, &'static str, String),
}

impl Config {
    /// Loads configuration from the process environment. `.env` (if
    /// present) is read first via `dotenvy::dotenv()` — real environment
    /// variables still take precedence over anything in the file.
    pub fn load() -> Result<Config, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Config {
            port: parse_opt("PORT")?.unwrap_or(8080),
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_opt("DATABASE_MAX_CONNECTIONS")?.unwrap_or(20),

            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            xai_api_key: env::var("XAI_API_KEY").ok(),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
            deepseek_api_key: env::var("DEEPSEEK_API_KEY").ok(),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok(),
            arc_api_key: env::var("ARC_API_KEY").ok(),

            xai_max_concurrency: parse_opt("XAI_MAX_CONCURRENCY")?,
            xai_max_retries: parse_opt("XAI_MAX_RETRIES")?,
            xai_retry_base_delay_ms: parse_opt("XAI_RETRY_BASE_DELAY_MS")?,

            puzzle_dataset_root: env::var("PUZZLE_DATASET_ROOT").unwrap_or_else(|_| "./datasets".to_string()),
        })
    }
}

fn parse_opt<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, std::any::type_name::<T>(), raw)),
        Err(_) => Ok(None),
    }
}
