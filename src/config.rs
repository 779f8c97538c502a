//! Application-level configuration loading: player colors, roster limits,
//! snapshot location and the public address used in share links.

use std::{env, fs, io::ErrorKind, path::PathBuf, str::FromStr};

use palette::Srgb;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::state::game::{DEFAULT_TARGET_SCORE, MIN_PLAYERS, RosterLimits};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "UNO_SCORE_CONFIG_PATH";
/// Environment variable that overrides the snapshot location.
const SNAPSHOT_PATH_ENV: &str = "UNO_SCORE_SNAPSHOT_PATH";
const DEFAULT_SNAPSHOT_PATH: &str = "data/game.json";
const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:8080/";
/// Built-in player colors, assigned by join order.
const DEFAULT_COLORS: [&str; 8] = [
    "#E53E3E", "#FFD700", "#3182CE", "#38A169", "#9F7AEA", "#F56500", "#ED64A6", "#4FD1C7",
];

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    colors: Vec<String>,
    default_target_score: u32,
    limits: RosterLimits,
    snapshot_path: PathBuf,
    share_base_url: Url,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        colors = app_config.colors.len(),
                        target = app_config.default_target_score,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };
        config.with_env_overrides()
    }

    /// Parse and validate a JSON document; omitted keys keep their defaults.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let raw = serde_json::from_str::<RawConfig>(contents)?;
        raw.try_into()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env::var_os(SNAPSHOT_PATH_ENV).filter(|path| !path.is_empty()) {
            self.snapshot_path = PathBuf::from(path);
        }
        self
    }

    /// Player colors as normalized `#RRGGBB` strings.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Target used when a start request omits one.
    pub fn default_target_score(&self) -> u32 {
        self.default_target_score
    }

    /// Roster bounds applied when a game starts.
    pub fn limits(&self) -> &RosterLimits {
        &self.limits
    }

    /// File the snapshot is mirrored to.
    pub fn snapshot_path(&self) -> &PathBuf {
        &self.snapshot_path
    }

    /// Public page that renders shared games.
    pub fn share_base_url(&self) -> &Url {
        &self.share_base_url
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|hex| hex.to_string()).collect(),
            default_target_score: DEFAULT_TARGET_SCORE,
            limits: RosterLimits::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            share_base_url: default_share_base_url(),
        }
    }
}

/// Reasons a configuration document is refused.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid color `{0}`")]
    Color(String),
    #[error("colors list must not be empty")]
    NoColors,
    #[error("target bounds are inverted ({min} > {max})")]
    InvertedBounds { min: u32, max: u32 },
    #[error("default target {target} is outside {min}..={max}")]
    DefaultOutOfRange { target: u32, min: u32, max: u32 },
    #[error("max_players must allow at least two players")]
    TooFewSeats,
    #[error("invalid share base URL: {0}")]
    ShareUrl(#[from] url::ParseError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    colors: Option<Vec<String>>,
    default_target_score: Option<u32>,
    min_target_score: Option<u32>,
    max_target_score: Option<u32>,
    max_players: Option<usize>,
    snapshot_path: Option<PathBuf>,
    share_base_url: Option<String>,
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        let defaults = AppConfig::default();

        let colors = match value.colors {
            Some(colors) => colors
                .iter()
                .map(|raw| normalize_color(raw))
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.colors,
        };
        if colors.is_empty() {
            return Err(ConfigError::NoColors);
        }

        let limits = RosterLimits {
            max_players: value.max_players.unwrap_or(defaults.limits.max_players),
            min_target_score: value
                .min_target_score
                .unwrap_or(defaults.limits.min_target_score),
            max_target_score: value
                .max_target_score
                .unwrap_or(defaults.limits.max_target_score),
        };
        if limits.min_target_score > limits.max_target_score {
            return Err(ConfigError::InvertedBounds {
                min: limits.min_target_score,
                max: limits.max_target_score,
            });
        }
        if limits.max_players < MIN_PLAYERS {
            return Err(ConfigError::TooFewSeats);
        }

        let default_target_score = value
            .default_target_score
            .unwrap_or(defaults.default_target_score);
        if !(limits.min_target_score..=limits.max_target_score).contains(&default_target_score) {
            return Err(ConfigError::DefaultOutOfRange {
                target: default_target_score,
                min: limits.min_target_score,
                max: limits.max_target_score,
            });
        }

        let share_base_url = match value.share_base_url {
            Some(raw) => Url::parse(&raw)?,
            None => defaults.share_base_url,
        };

        Ok(Self {
            colors,
            default_target_score,
            limits,
            snapshot_path: value.snapshot_path.unwrap_or(defaults.snapshot_path),
            share_base_url,
        })
    }
}

/// Parse a hex color and render it back as uppercase `#RRGGBB`.
fn normalize_color(raw: &str) -> Result<String, ConfigError> {
    let color =
        Srgb::<u8>::from_str(raw.trim()).map_err(|_| ConfigError::Color(raw.to_string()))?;
    Ok(format!(
        "#{:02X}{:02X}{:02X}",
        color.red, color.green, color.blue
    ))
}

fn default_share_base_url() -> Url {
    Url::parse(DEFAULT_SHARE_BASE_URL).expect("default share base URL is valid")
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.colors().len(), 8);
        assert_eq!(config.colors()[0], "#E53E3E");
        assert_eq!(config.default_target_score(), 250);
        assert_eq!(*config.limits(), RosterLimits::default());
        assert_eq!(config.snapshot_path(), &PathBuf::from("data/game.json"));
    }

    #[test]
    fn colors_are_normalized() {
        let config = AppConfig::from_json(r##"{"colors": ["#ff0000", "00aa11"]}"##).unwrap();
        assert_eq!(config.colors(), &["#FF0000".to_string(), "#00AA11".to_string()]);
    }

    #[test]
    fn rejects_bad_colors_and_bounds() {
        assert!(matches!(
            AppConfig::from_json(r#"{"colors": ["not-a-color"]}"#),
            Err(ConfigError::Color(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"colors": []}"#),
            Err(ConfigError::NoColors)
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"min_target_score": 500, "max_target_score": 100}"#),
            Err(ConfigError::InvertedBounds { .. })
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"default_target_score": 20}"#),
            Err(ConfigError::DefaultOutOfRange { .. })
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"share_base_url": "no scheme"}"#),
            Err(ConfigError::ShareUrl(_))
        ));
    }

    #[test]
    fn custom_values_are_applied() {
        let config = AppConfig::from_json(
            r#"{
                "default_target_score": 500,
                "max_players": 4,
                "share_base_url": "https://uno.example.com/view"
            }"#,
        )
        .unwrap();
        assert_eq!(config.default_target_score(), 500);
        assert_eq!(config.limits().max_players, 4);
        assert_eq!(config.share_base_url().as_str(), "https://uno.example.com/view");
    }
}
