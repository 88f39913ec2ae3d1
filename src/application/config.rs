use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::analytics::EngineSettings;
use crate::domain::value_objects::settings::{ForecastSettings, LookbackWindow};
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub lookback: LookbackConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General settings: default tenant, request timeout, schedule interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_tenant")]
    pub tenant: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

/// How much history the aggregator reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookbackConfig {
    #[serde(default = "default_sales_days")]
    pub sales_days: u32,
    #[serde(default = "default_order_limit")]
    pub order_limit: usize,
}

/// Forecast confidence model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_max_confidence")]
    pub max_confidence: f64,
    #[serde(default = "default_decay")]
    pub decay_per_day: f64,
    #[serde(default = "default_full_history")]
    pub full_history_days: u32,
    #[serde(default = "default_insufficient_penalty")]
    pub insufficient_data_penalty: f64,
}

/// Risk bands, alert thresholds and health score weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_risk_high")]
    pub risk_high_percent: f64,
    #[serde(default = "default_risk_medium")]
    pub risk_medium_percent: f64,
    #[serde(default = "default_overstock_multiple")]
    pub overstock_multiple: f64,
    #[serde(default = "default_safety_cover")]
    pub stockout_safety_cover: f64,
    #[serde(default = "default_stockout_warn")]
    pub stockout_warn_percent: f64,
    #[serde(default = "default_stockout_critical")]
    pub stockout_critical_percent: f64,
    #[serde(default = "default_waste_warn")]
    pub waste_warn_percent: f64,
    #[serde(default = "default_health_critical")]
    pub health_critical_score: f64,
    #[serde(default = "default_critical_products")]
    pub critical_products: usize,
    #[serde(default = "default_expiry_warning")]
    pub expiry_warning_days: i64,
    #[serde(default = "default_expiry_critical")]
    pub expiry_critical_days: i64,
    #[serde(default = "default_waste_penalty")]
    pub waste_penalty: f64,
    #[serde(default = "default_stockout_penalty")]
    pub stockout_penalty: f64,
    #[serde(default = "default_volatility_penalty")]
    pub volatility_penalty: f64,
}

/// Database storage path (tilde-expanded at point of use).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Snapshot cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

// --- Defaults ---

fn default_tenant() -> String {
    "default".into()
}

const fn default_timeout() -> u64 {
    20
}

// Nightly
const fn default_interval() -> u64 {
    86_400
}

const fn default_sales_days() -> u32 {
    90
}

const fn default_order_limit() -> usize {
    100
}

const fn default_min_confidence() -> f64 {
    60.0
}

const fn default_max_confidence() -> f64 {
    95.0
}

const fn default_decay() -> f64 {
    2.0
}

const fn default_full_history() -> u32 {
    28
}

const fn default_insufficient_penalty() -> f64 {
    15.0
}

const fn default_risk_high() -> f64 {
    50.0
}

const fn default_risk_medium() -> f64 {
    25.0
}

const fn default_overstock_multiple() -> f64 {
    2.0
}

const fn default_safety_cover() -> f64 {
    1.5
}

const fn default_stockout_warn() -> f64 {
    5.0
}

const fn default_stockout_critical() -> f64 {
    15.0
}

const fn default_waste_warn() -> f64 {
    5.0
}

const fn default_health_critical() -> f64 {
    50.0
}

const fn default_critical_products() -> usize {
    5
}

const fn default_expiry_warning() -> i64 {
    7
}

const fn default_expiry_critical() -> i64 {
    3
}

const fn default_waste_penalty() -> f64 {
    2.5
}

const fn default_stockout_penalty() -> f64 {
    1.5
}

const fn default_volatility_penalty() -> f64 {
    0.2
}

const fn default_true() -> bool {
    true
}

// NOTE: Stored with the tilde; expanded by `AppConfig::database_path`.
fn default_database_path() -> String {
    "~/.local/share/stockpulse/stockpulse.db".into()
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tenant: default_tenant(),
            timeout_secs: default_timeout(),
            interval_secs: default_interval(),
        }
    }
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            sales_days: default_sales_days(),
            order_limit: default_order_limit(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            max_confidence: default_max_confidence(),
            decay_per_day: default_decay(),
            full_history_days: default_full_history(),
            insufficient_data_penalty: default_insufficient_penalty(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            risk_high_percent: default_risk_high(),
            risk_medium_percent: default_risk_medium(),
            overstock_multiple: default_overstock_multiple(),
            stockout_safety_cover: default_safety_cover(),
            stockout_warn_percent: default_stockout_warn(),
            stockout_critical_percent: default_stockout_critical(),
            waste_warn_percent: default_waste_warn(),
            health_critical_score: default_health_critical(),
            critical_products: default_critical_products(),
            expiry_warning_days: default_expiry_warning(),
            expiry_critical_days: default_expiry_critical(),
            waste_penalty: default_waste_penalty(),
            stockout_penalty: default_stockout_penalty(),
            volatility_penalty: default_volatility_penalty(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Effective configuration rendered back to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            forecast: ForecastSettings::from(&self.forecast),
            thresholds: ThresholdSet::from(&self.thresholds),
        }
    }

    #[must_use]
    pub fn lookback_window(&self) -> LookbackWindow {
        LookbackWindow::from(&self.lookback)
    }

    /// Request timeout, at least one second.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.general.timeout_secs.max(1))
    }

    /// Expanded sqlite path.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database.path).into_owned())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("stockpulse").join("config.toml"))
    }
}

impl From<&LookbackConfig> for LookbackWindow {
    fn from(config: &LookbackConfig) -> Self {
        Self {
            sales_days: config.sales_days.clamp(7, 730),
            order_limit: config.order_limit.clamp(1, 10_000),
        }
    }
}

impl From<&ForecastConfig> for ForecastSettings {
    fn from(config: &ForecastConfig) -> Self {
        let min_confidence = config.min_confidence.clamp(0.0, 100.0);
        let max_confidence = config.max_confidence.clamp(0.0, 100.0).max(min_confidence);
        Self {
            min_confidence,
            max_confidence,
            decay_per_day: config.decay_per_day.max(0.0),
            full_history_days: config.full_history_days.max(1),
            insufficient_data_penalty: config.insufficient_data_penalty.max(0.0),
        }
    }
}

impl From<&ThresholdConfig> for ThresholdSet {
    fn from(config: &ThresholdConfig) -> Self {
        let defaults = Self::default();

        // Clamp percentages to valid range, keep bands ordered
        let risk_medium = config.risk_medium_percent.clamp(0.0, 100.0);
        let risk_high = config.risk_high_percent.clamp(0.0, 100.0).max(risk_medium);
        let stockout_warning = config.stockout_warn_percent.clamp(0.0, 100.0);
        let stockout_critical = config
            .stockout_critical_percent
            .clamp(0.0, 100.0)
            .max(stockout_warning);
        let expiry_warning_days = config.expiry_warning_days.max(0);

        Self {
            risk_high,
            risk_medium,
            overstock_multiple: config.overstock_multiple.max(1.1),
            stockout_safety_cover: config.stockout_safety_cover.max(1.0),
            stockout_warning,
            stockout_critical,
            waste_warning: config.waste_warn_percent.clamp(0.0, 100.0),
            health_critical: config.health_critical_score.clamp(0.0, 100.0),
            critical_products: config.critical_products.max(1),
            expiry_warning_days,
            expiry_critical_days: config.expiry_critical_days.clamp(0, expiry_warning_days),
            waste_penalty: config.waste_penalty.max(0.0),
            stockout_penalty: config.stockout_penalty.max(0.0),
            volatility_penalty: config.volatility_penalty.max(0.0),
            ..defaults
        }
    }
}
