use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::models::{PriorityThresholds, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub vendor_api: VendorApiSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub budget: BudgetSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct VendorApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// One of `fail`, `empty`, `listings`
    #[serde(default = "default_fallback")]
    pub fallback: String,
    /// JSON array of services, required by the `listings` policy
    pub fallback_listings: Option<PathBuf>,
}

impl Default for VendorApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            fallback: default_fallback(),
            fallback_listings: None,
        }
    }
}

fn default_base_url() -> String { crate::services::DEFAULT_BASE_URL.to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_fallback() -> String { "fail".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

/// Maximum points per scoring term
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_popularity_weight")]
    pub popularity: f64,
    #[serde(default = "default_price_fit_weight")]
    pub price_fit: f64,
    #[serde(default = "default_suitability_weight")]
    pub suitability: f64,
    #[serde(default = "default_priority_weight")]
    pub priority: f64,
    #[serde(default = "default_essential_bonus")]
    pub essential_bonus: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            rating: default_rating_weight(),
            popularity: default_popularity_weight(),
            price_fit: default_price_fit_weight(),
            suitability: default_suitability_weight(),
            priority: default_priority_weight(),
            essential_bonus: default_essential_bonus(),
        }
    }
}

fn default_rating_weight() -> f64 { 25.0 }
fn default_popularity_weight() -> f64 { 25.0 }
fn default_price_fit_weight() -> f64 { 30.0 }
fn default_suitability_weight() -> f64 { 15.0 }
fn default_priority_weight() -> f64 { 10.0 }
fn default_essential_bonus() -> f64 { 2.0 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            rating: config.rating,
            popularity: config.popularity,
            price_fit: config.price_fit,
            suitability: config.suitability,
            priority: config.priority,
            essential_bonus: config.essential_bonus,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_high_threshold")]
    pub high: u8,
    #[serde(default = "default_medium_threshold")]
    pub medium: u8,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

fn default_high_threshold() -> u8 { 65 }
fn default_medium_threshold() -> u8 { 40 }

impl From<&ThresholdsConfig> for PriorityThresholds {
    fn from(config: &ThresholdsConfig) -> Self {
        PriorityThresholds {
            high: config.high,
            medium: config.medium.min(config.high),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self { top_n: default_top_n() }
    }
}

fn default_top_n() -> usize { crate::core::budget::DEFAULT_TOP_N }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with BAZAAR__)
    /// 5. VITE_API_URL, shared with the front end, for the backend URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., BAZAAR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("BAZAAR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("BAZAAR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply overrides from well-known environment variables
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_url) = std::env::var("VITE_API_URL") {
        if !api_url.trim().is_empty() {
            builder = builder.set_override("vendor_api.base_url", api_url)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // Tests that read or write process env vars hold this
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights.rating, 25.0);
        assert_eq!(weights.popularity, 25.0);
        assert_eq!(weights.price_fit, 30.0);
        assert_eq!(weights.suitability, 15.0);
        assert_eq!(weights.priority, 10.0);
        assert_eq!(weights.essential_bonus, 2.0);
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = PriorityThresholds::from(&ThresholdsConfig::default());
        assert_eq!(thresholds.high, 65);
        assert_eq!(thresholds.medium, 40);
    }

    #[test]
    fn test_medium_threshold_capped_at_high() {
        let thresholds = PriorityThresholds::from(&ThresholdsConfig { high: 50, medium: 70 });
        assert_eq!(thresholds.medium, 50);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let _guard = env_lock();
        let path = std::env::temp_dir().join(format!("bazaar-settings-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[server]\nport = 9090\n\n[vendor_api]\nbase_url = \"http://localhost:3001\"\nfallback = \"empty\"\n\n[scoring.weights]\nprice_fit = 20.0\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.vendor_api.base_url, "http://localhost:3001");
        assert_eq!(settings.vendor_api.fallback, "empty");
        assert_eq!(settings.vendor_api.timeout_secs, 10);
        assert_eq!(settings.scoring.weights.price_fit, 20.0);
        assert_eq!(settings.scoring.weights.rating, 25.0);
        assert_eq!(settings.budget.top_n, 10);
    }

    #[test]
    fn test_env_overrides_layer_over_defaults() {
        let _guard = env_lock();
        std::env::set_var("VITE_API_URL", "http://localhost:3001");
        std::env::set_var("BAZAAR__SERVER__PORT", "9191");
        std::env::set_var("BAZAAR__SCORING__THRESHOLDS__HIGH", "70");

        let loaded = Settings::load();

        std::env::remove_var("VITE_API_URL");
        std::env::remove_var("BAZAAR__SERVER__PORT");
        std::env::remove_var("BAZAAR__SCORING__THRESHOLDS__HIGH");

        let settings = loaded.unwrap();
        assert_eq!(settings.vendor_api.base_url, "http://localhost:3001");
        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.scoring.thresholds.high, 70);
        assert_eq!(settings.scoring.thresholds.medium, 40);
        assert_eq!(settings.vendor_api.fallback, "fail");
    }

    #[test]
    fn test_blank_api_url_keeps_configured_base() {
        let _guard = env_lock();
        std::env::set_var("VITE_API_URL", "  ");

        let loaded = Settings::load();

        std::env::remove_var("VITE_API_URL");

        let settings = loaded.unwrap();
        assert_eq!(settings.vendor_api.base_url, default_base_url());
    }
}
