use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Public base URL used when printing short links, e.g. "http://localhost:3000"
    /// Must NOT have a trailing slash.
    pub base_url: String,

    /// Fixed PRNG seed for fixture generation. When set, every restart
    /// serves the exact same data; when unset, fixtures are randomized.
    pub seed: Option<u64>,

    /// Whether store operations sleep their simulated network delay.
    /// Disable for fast local iteration against the mock.
    pub mock_latency: bool,

    /// How many hours a session token remains valid
    pub session_duration_hours: u64,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let seed = match std::env::var("SEED") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .context("SEED must be an unsigned 64-bit integer")?,
            ),
            Err(_) => None,
        };

        let mock_latency = std::env::var("MOCK_LATENCY")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "off"))
            .unwrap_or(true);

        let session_duration_hours = std::env::var("SESSION_DURATION_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse::<u64>()
            .context("SESSION_DURATION_HOURS must be a whole number of hours")?;

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            base_url,
            seed,
            mock_latency,
            session_duration_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in the crate that touches these env vars, so there is
    // no cross-test interference.
    #[test]
    fn malformed_session_duration_fails_loudly() {
        std::env::set_var("SESSION_DURATION_HOURS", "soon");
        let result = AppConfig::from_env();
        std::env::remove_var("SESSION_DURATION_HOURS");
        let err = result.expect_err("bad SESSION_DURATION_HOURS must not fall back silently");
        assert!(err.to_string().contains("SESSION_DURATION_HOURS"));

        std::env::set_var("SESSION_DURATION_HOURS", "48");
        let config = AppConfig::from_env().unwrap();
        std::env::remove_var("SESSION_DURATION_HOURS");
        assert_eq!(config.session_duration_hours, 48);
    }
}
