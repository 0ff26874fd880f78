use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Provider credential. Optional at startup; provider routes fail without it.
    pub google_maps_api_key: Option<String>,
    pub allowed_origins: Vec<String>,
    pub allowed_origin_suffixes: Vec<String>,
    pub vibes_path: Option<PathBuf>,
    pub maps_base_url: String,
    pub maps_timeout_secs: u64,
    pub geocode_region: String,
    pub rng_seed: Option<u64>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("allowed_origins", &self.allowed_origins)
            .field("allowed_origin_suffixes", &self.allowed_origin_suffixes)
            .field("vibes_path", &self.vibes_path)
            .field("maps_base_url", &self.maps_base_url)
            .field("maps_timeout_secs", &self.maps_timeout_secs)
            .field("geocode_region", &self.geocode_region)
            .field("rng_seed", &self.rng_seed)
            .finish()
    }
}
