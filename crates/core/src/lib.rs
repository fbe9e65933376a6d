pub mod catalog;
pub mod error;
pub mod genre;
pub mod llm;
pub mod mood;

#[cfg(test)]
mod test_support;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 5000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub openrouter_api_key: Option<String>,
        pub openrouter_base_url: Option<String>,
        pub openrouter_model: Option<String>,
        pub openrouter_timeout_secs: Option<u64>,
        pub tmdb_api_key: Option<String>,
        pub tmdb_base_url: Option<String>,
        pub tmdb_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
                openrouter_base_url: non_empty_var("OPENROUTER_BASE_URL"),
                openrouter_model: non_empty_var("OPENROUTER_MODEL"),
                openrouter_timeout_secs: parsed_var("OPENROUTER_TIMEOUT_SECS")?,
                tmdb_api_key: non_empty_var("TMDB_API_KEY"),
                tmdb_base_url: non_empty_var("TMDB_BASE_URL"),
                tmdb_timeout_secs: parsed_var("TMDB_TIMEOUT_SECS")?,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                port: parsed_var("PORT")?.unwrap_or(DEFAULT_PORT),
            })
        }

        pub fn require_openrouter_api_key(&self) -> anyhow::Result<&str> {
            self.openrouter_api_key
                .as_deref()
                .context("OPENROUTER_API_KEY is required")
        }

        pub fn require_tmdb_api_key(&self) -> anyhow::Result<&str> {
            self.tmdb_api_key
                .as_deref()
                .context("TMDB_API_KEY is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    fn parsed_var<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        non_empty_var(key)
            .map(|s| s.trim().parse::<T>())
            .transpose()
            .with_context(|| format!("{key} is not a valid value"))
    }
}
