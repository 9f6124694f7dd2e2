use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the shortening API, e.g. `http://localhost:8080/api/v1`
    pub api_base_url: String,
    /// Base URL of the public redirect endpoint (distinct from the API base)
    pub public_base_url: String,
    pub request_timeout_secs: u64,
    pub health: HealthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Poll period for the liveness probe
    #[serde(default = "HealthConfig::default_interval_secs")]
    pub interval_secs: u64,
    /// Upper bound on a single probe; a hung probe must not block the next run
    #[serde(default = "HealthConfig::default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl HealthConfig {
    const fn default_interval_secs() -> u64 {
        30
    }

    const fn default_probe_timeout_secs() -> u64 {
        5
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            interval_secs: Self::default_interval_secs(),
            probe_timeout_secs: Self::default_probe_timeout_secs(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api/v1".to_string());
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()?;

        let interval_secs = std::env::var("HEALTH_INTERVAL_SECS")
            .unwrap_or_else(|_| HealthConfig::default_interval_secs().to_string())
            .parse::<u64>()?;
        let probe_timeout_secs = std::env::var("HEALTH_PROBE_TIMEOUT_SECS")
            .unwrap_or_else(|_| HealthConfig::default_probe_timeout_secs().to_string())
            .parse::<u64>()?;

        Ok(Config {
            api_base_url: normalize_base(&api_base_url),
            public_base_url: normalize_base(&public_base_url),
            request_timeout_secs,
            health: HealthConfig {
                interval_secs,
                probe_timeout_secs,
            },
        })
    }

    /// Build a configuration pointing at a known service, bypassing the
    /// environment. Used by embedders that manage their own settings.
    pub fn for_service(api_base_url: &str, public_base_url: &str) -> Self {
        Config {
            api_base_url: normalize_base(api_base_url),
            public_base_url: normalize_base(public_base_url),
            request_timeout_secs: 10,
            health: HealthConfig::default(),
        }
    }
}

/// Bases are joined with `/{path}` everywhere, so a trailing slash would
/// produce double slashes in request URLs.
fn normalize_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
