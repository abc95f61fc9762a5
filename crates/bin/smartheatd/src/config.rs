//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `smartheat.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.
//!
//! The `[common]` and `[[zones]]` tables form the heating configuration
//! snapshot handed to the supervisor.

use serde::Deserialize;

use smartheat_domain::error::ValidationError;
use smartheat_domain::zone::{CommonSettings, HeatingConfig, ZoneSettings};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Virtual home simulation.
    pub simulation: SimulationConfig,
    /// Settings shared by every zone.
    pub common: Option<CommonSettings>,
    /// One entry per heating zone.
    pub zones: Vec<ZoneSettings>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Drive zone sensors with the thermal model.
    pub enabled: bool,
    /// Seconds between two simulated readings.
    pub period_secs: u64,
    /// Reading every zone sensor starts from.
    pub initial_temperature: f64,
    /// Fixed reading for the outdoor sensor, when one is configured.
    pub outdoor_temperature: Option<f64>,
}

impl Config {
    /// Load configuration from `smartheat.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("smartheat.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SMARTHEAT_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("SMARTHEAT_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("SMARTHEAT_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SMARTHEAT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("SMARTHEAT_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.simulation.enabled && self.simulation.period_secs == 0 {
            return Err(ConfigError::Validation(
                "simulation period must be non-zero".to_string(),
            ));
        }
        if !self.zones.is_empty() {
            self.heating().zone_configs()?;
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// The heating configuration snapshot.
    #[must_use]
    pub fn heating(&self) -> HeatingConfig {
        HeatingConfig {
            common: self.common.clone(),
            zones: self.zones.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:smartheat.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smartheatd=info,smartheat=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period_secs: 60,
            initial_temperature: 18.0,
            outdoor_temperature: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Invalid heating configuration.
    #[error("invalid heating configuration")]
    Heating(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use smartheat_domain::hysteresis::HeatingMode;

    use super::*;

    const TWO_ZONES: &str = "
        [common]
        boiler_relay = 'switch.boiler'
        hysteresis = 0.3

        [[zones]]
        name = 'living'
        sensor = 'sensor.living_temperature'
        relays = ['switch.living_valve']

        [[zones.schedule]]
        label = 'day'
        start = '06:00'
        end = '22:00'
        temp = 21.5

        [[zones]]
        name = 'bath'
        sensor = 'sensor.bath_temperature'
        relays = ['switch.bath_floor']
        heating_mode = 'underfloor'
    ";

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:smartheat.db?mode=rwc");
        assert!(config.simulation.enabled);
        assert!(config.common.is_none());
        assert!(config.zones.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [simulation]
            enabled = false
            period_secs = 5
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert!(!config.simulation.enabled);
        assert_eq!(config.simulation.period_secs, 5);
    }

    #[test]
    fn should_parse_zones_and_schedule() {
        let config: Config = toml::from_str(TWO_ZONES).unwrap();
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.zones[0].schedule.len(), 1);
        assert_eq!(config.zones[1].heating_mode, HeatingMode::Underfloor);

        let zones = config.heating().zone_configs().unwrap();
        assert_eq!(zones[0].boiler_relay.as_deref(), Some("switch.boiler"));
        assert!(!zones[0].schedule.is_empty());
        assert!(zones[1].schedule.is_empty());
    }

    #[test]
    fn should_accept_valid_heating_config() {
        let config: Config = toml::from_str(TWO_ZONES).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_reject_zones_without_common_settings() {
        let toml = "
            [[zones]]
            name = 'living'
            sensor = 'sensor.living_temperature'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Heating(ValidationError::MissingCommonSettings))
        ));
    }

    #[test]
    fn should_accept_default_config_without_zones() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_simulation_period() {
        let mut config = Config::default();
        config.simulation.period_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
