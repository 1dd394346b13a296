use crate::assets::AssetLoader;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Rounds per session unless configured otherwise
pub const TOTAL_ROUNDS: u32 = 5;

/// Per-round countdown in seconds unless configured otherwise
pub const SECONDS_PER_ROUND: u32 = 10;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Round engine timing
    #[serde(default)]
    pub game: GameConfig,

    /// Results aggregation policies
    #[serde(default)]
    pub results: ResultsConfig,

    /// Session store location
    #[serde(default)]
    pub store: StoreConfig,
}

/// Timing and pacing of a game session
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_total_rounds")]
    pub total_rounds: u32,

    #[serde(default = "default_seconds_per_round")]
    pub seconds_per_round: u32,

    /// First value shown by the pre-game countdown
    #[serde(default = "default_countdown_from")]
    pub countdown_from: u32,

    /// Pause after each round before the next one starts
    #[serde(default = "default_round_end_delay_ms")]
    pub round_end_delay_ms: u64,

    /// Whether a round may be ended early by an explicit submit
    #[serde(default = "default_allow_submit")]
    pub allow_submit: bool,
}

fn default_total_rounds() -> u32 {
    TOTAL_ROUNDS
}

fn default_seconds_per_round() -> u32 {
    SECONDS_PER_ROUND
}

fn default_countdown_from() -> u32 {
    3
}

fn default_round_end_delay_ms() -> u64 {
    500
}

fn default_allow_submit() -> bool {
    true
}

impl GameConfig {
    pub fn round_end_delay(&self) -> Duration {
        Duration::from_millis(self.round_end_delay_ms)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), String> {
        if self.total_rounds == 0 {
            return Err("total_rounds must be at least 1".to_string());
        }
        if self.seconds_per_round == 0 {
            return Err("seconds_per_round must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_rounds: default_total_rounds(),
            seconds_per_round: default_seconds_per_round(),
            countdown_from: default_countdown_from(),
            round_end_delay_ms: default_round_end_delay_ms(),
            allow_submit: default_allow_submit(),
        }
    }
}

/// How the first persisted round is treated by the results screen
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FirstRoundPolicy {
    /// Drop it only if it looks like a placeholder round
    #[default]
    Detect,
    /// Always drop it
    AlwaysDrop,
    /// Never drop it
    Keep,
}

/// Denominator used for the displayed score fraction
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaxScorePolicy {
    /// 100 points per displayed round
    #[default]
    FilteredCount,
    /// 100 points per expected displayed round, whatever was filtered
    Fixed,
}

/// Results aggregation policies
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultsConfig {
    #[serde(default)]
    pub first_round: FirstRoundPolicy,

    #[serde(default)]
    pub max_score: MaxScorePolicy,
}

/// Where the session store lives
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StoreConfig {
    /// JSON file path; `None` keeps the store in memory
    #[serde(default = "default_store_path")]
    pub path: Option<PathBuf>,
}

fn default_store_path() -> Option<PathBuf> {
    Some(PathBuf::from("colorete-store.json"))
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => Self::from_yaml(&content),
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML, falling back to defaults on error or invalid values
    pub fn from_yaml(content: &str) -> Self {
        match serde_yaml::from_str::<Self>(content) {
            Ok(config) => {
                if let Err(e) = config.game.validate() {
                    tracing::warn!(%e, "Invalid game config, using default game settings");
                    return Self {
                        game: GameConfig::default(),
                        ..config
                    };
                }
                tracing::info!(
                    rounds = config.game.total_rounds,
                    seconds = config.game.seconds_per_round,
                    first_round = ?config.results.first_round,
                    max_score = ?config.results.max_score,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }
}
