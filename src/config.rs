use crate::services::open_meteo::DEFAULT_BASE_URL;

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Open-Meteo endpoint; overridable for tests and self-hosted instances.
    pub open_meteo_base_url: String,
    pub open_meteo_user_agent: String,
    /// Forecast cache entry lifetime in seconds.
    pub cache_ttl_secs: u64,
    /// Directory containing the mountain registry JSON file.
    pub data_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            open_meteo_base_url: std::env::var("OPEN_METEO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            open_meteo_user_agent: std::env::var("OPEN_METEO_USER_AGENT")
                .unwrap_or_else(|_| "HikecastApi/0.1".to_string()),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("CACHE_TTL_SECS must be a valid u64"),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        std::env::remove_var("PORT");
        std::env::remove_var("OPEN_METEO_BASE_URL");
        std::env::remove_var("OPEN_METEO_USER_AGENT");
        std::env::remove_var("CACHE_TTL_SECS");
        std::env::remove_var("DATA_DIR");

        let config = AppConfig::from_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.open_meteo_base_url, DEFAULT_BASE_URL);
        assert!(config.open_meteo_user_agent.contains("Hikecast"));
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.data_dir, "./data");
    }
}
