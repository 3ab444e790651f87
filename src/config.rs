use log::Level;
use thiserror::Error;

pub const WORLD_WIDTH: f64 = 1024.0;
pub const WORLD_HEIGHT: f64 = 768.0;

pub const FIXED_STEP: f64 = 1.0 / 60.0;
pub const MAX_FRAME_DELTA: f64 = 0.25;
pub const MAX_STEPS_PER_FRAME: u32 = 5;

pub const SHIP_RADIUS: f64 = 12.0;
pub const SHIP_TURN_RATE: f64 = 4.8;
pub const SHIP_THRUST: f64 = 340.0;
// Fraction of velocity kept after one second of coasting.
pub const SHIP_DAMPING: f64 = 0.45;
pub const SHIP_MAX_SPEED: f64 = 420.0;
pub const SHIP_FIRE_COOLDOWN: f64 = 0.18;
pub const SHIP_RESPAWN_DELAY: f64 = 1.5;
pub const SHIP_INVULNERABLE: f64 = 3.0;

pub const BULLET_SPEED: f64 = 540.0;
pub const BULLET_LIFETIME: f64 = 1.05;
pub const BULLET_RADIUS: f64 = 2.0;
pub const MAX_BULLETS: usize = 6;

pub const ASTEROID_OUTLINE_POINTS: usize = 11;
pub const ASTEROID_SPLIT_SPREAD: f64 = 0.6;
pub const ASTEROID_SPLIT_SPEEDUP: f64 = 1.25;
pub const ATTRACT_ASTEROIDS: usize = 6;

pub const WAVE_BASE_ASTEROIDS: u32 = 3;
pub const WAVE_MAX_ASTEROIDS: u32 = 11;
pub const WAVE_DELAY: f64 = 2.0;
pub const WAVE_SPEEDUP: f64 = 0.08;
pub const WAVE_MAX_SPEED_SCALE: f64 = 2.0;
pub const SAFE_SPAWN_DISTANCE: f64 = 180.0;

pub const EXTRA_LIFE_SCORE: u32 = 10_000;
pub const MAX_LIVES: u32 = 9;

pub const MESSAGE_TTL: f64 = 2.5;
pub const MESSAGE_FADE: f64 = 0.5;
pub const MAX_MESSAGES: usize = 4;

pub const MINIMAP_WIDTH: f64 = 160.0;
pub const MINIMAP_HEIGHT: f64 = 120.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: `{value}` is not a number")]
    InvalidNumber { key: String, value: String },
    #[error("{key}: {value} is outside {min}..={max}")]
    OutOfRange {
        key: String,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("{key}: expected 0 or 1, got `{value}`")]
    InvalidFlag { key: String, value: String },
    #[error("log: unknown level `{0}`")]
    InvalidLogLevel(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub starting_lives: u32,
    pub starting_wave: u32,
    pub seed: Option<u64>,
    pub debug: bool,
    pub minimap: bool,
    pub log_level: Level,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            starting_wave: 1,
            seed: None,
            debug: false,
            minimap: true,
            log_level: Level::Info,
        }
    }
}

impl GameConfig {
    /// Builds a config from a page query string such as `?lives=5&debug=1`.
    ///
    /// Parameters that fail to parse are reported in the returned error list
    /// and leave the default in place. Unknown keys are skipped.
    pub fn from_query(query: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut errors = Vec::new();

        for (key, value) in query_pairs(query) {
            if let Err(err) = config.apply(key, value) {
                errors.push(err);
            }
        }

        (config, errors)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "lives" => self.starting_lives = parse_ranged(key, value, 1, MAX_LIVES as u64)? as u32,
            "wave" => self.starting_wave = parse_ranged(key, value, 1, 20)? as u32,
            "seed" => self.seed = Some(parse_number(key, value)?),
            "debug" => self.debug = parse_flag(key, value)?,
            "minimap" => self.minimap = parse_flag(key, value)?,
            "log" => {
                self.log_level = value
                    .parse::<Level>()
                    .map_err(|_| ConfigError::InvalidLogLevel(value.to_string()))?
            }
            _ => {}
        }
        Ok(())
    }
}

fn query_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_ranged(key: &str, value: &str, min: u64, max: u64) -> Result<u64, ConfigError> {
    let n = parse_number(key, value)?;
    if !(min..=max).contains(&n) {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value: n,
            min,
            max,
        });
    }
    Ok(n)
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "" => Ok(true),
        "0" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gives_defaults() {
        let (config, errors) = GameConfig::from_query("");
        assert_eq!(config, GameConfig::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn known_keys_override_defaults() {
        let (config, errors) =
            GameConfig::from_query("?lives=5&wave=3&seed=42&debug=1&minimap=0&log=debug");
        assert!(errors.is_empty());
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.starting_wave, 3);
        assert_eq!(config.seed, Some(42));
        assert!(config.debug);
        assert!(!config.minimap);
        assert_eq!(config.log_level, Level::Debug);
    }

    #[test]
    fn bare_flag_enables() {
        let (config, _) = GameConfig::from_query("debug");
        assert!(config.debug);
    }

    #[test]
    fn bad_values_keep_defaults_and_report() {
        let (config, errors) = GameConfig::from_query("lives=0&wave=abc&log=loud&debug=yes&foo=1");
        assert_eq!(config, GameConfig::default());
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors[0],
            ConfigError::OutOfRange {
                key: "lives".into(),
                value: 0,
                min: 1,
                max: 9
            }
        );
        assert_eq!(errors[2].to_string(), "log: unknown level `loud`");
    }
}
