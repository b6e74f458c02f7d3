use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub request_timeout_secs: u64,
    pub max_radius_km: f64,
    pub search_debounce_ms: u64,
    pub search_min_length: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            supabase_url: env::var("SUPABASE_URL")?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .map(|v| v.parse().unwrap_or(15))
                .unwrap_or(15),
            max_radius_km: env::var("MAX_RADIUS_KM")
                .map(|v| v.parse().unwrap_or(50.0))
                .unwrap_or(50.0),
            search_debounce_ms: env::var("SEARCH_DEBOUNCE_MS")
                .map(|v| v.parse().unwrap_or(300))
                .unwrap_or(300),
            search_min_length: env::var("SEARCH_MIN_LENGTH")
                .map(|v| v.parse().unwrap_or(1))
                .unwrap_or(1),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            request_timeout_secs: 15,
            max_radius_km: 50.0,
            search_debounce_ms: 300,
            search_min_length: 1,
        }
    }
}
