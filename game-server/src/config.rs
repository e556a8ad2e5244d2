use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use game_types::{MAX_MAX_GUESSES, MIN_MAX_GUESSES};

use crate::router::RoomSettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("MIN_PLAYERS_TO_START ({min}) exceeds MAX_PLAYERS_PER_ROOM ({max})")]
    PlayerBounds { min: usize, max: usize },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub default_max_guesses: u32,
    pub max_players_per_room: usize,
    pub min_players_to_start: usize,
    pub room_code_attempts: usize,
    pub rate_limit_burst: u32,
    pub rate_limit_refill_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any key lookup, so parsing can be tested without
    /// touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT", defaults.port)?,
            default_max_guesses: parse(
                &lookup,
                "DEFAULT_MAX_GUESSES",
                defaults.default_max_guesses,
            )?,
            max_players_per_room: parse(
                &lookup,
                "MAX_PLAYERS_PER_ROOM",
                defaults.max_players_per_room,
            )?,
            min_players_to_start: parse(
                &lookup,
                "MIN_PLAYERS_TO_START",
                defaults.min_players_to_start,
            )?,
            room_code_attempts: parse(&lookup, "ROOM_CODE_ATTEMPTS", defaults.room_code_attempts)?,
            rate_limit_burst: parse(&lookup, "RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
            rate_limit_refill_ms: parse(
                &lookup,
                "RATE_LIMIT_REFILL_MS",
                defaults.rate_limit_refill_ms,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        in_range(
            "DEFAULT_MAX_GUESSES",
            u64::from(self.default_max_guesses),
            u64::from(MIN_MAX_GUESSES),
            u64::from(MAX_MAX_GUESSES),
        )?;
        // Role rotation needs a word-giver and a distinct guesser.
        in_range("MIN_PLAYERS_TO_START", self.min_players_to_start as u64, 2, u64::MAX)?;
        if self.min_players_to_start > self.max_players_per_room {
            return Err(ConfigError::PlayerBounds {
                min: self.min_players_to_start,
                max: self.max_players_per_room,
            });
        }
        in_range("ROOM_CODE_ATTEMPTS", self.room_code_attempts as u64, 1, u64::MAX)?;
        in_range("RATE_LIMIT_BURST", u64::from(self.rate_limit_burst), 1, u64::MAX)?;
        in_range("RATE_LIMIT_REFILL_MS", self.rate_limit_refill_ms, 1, u64::MAX)?;
        Ok(())
    }

    pub fn room_settings(&self) -> RoomSettings {
        RoomSettings {
            default_max_guesses: self.default_max_guesses,
            max_players_per_room: self.max_players_per_room,
            min_players_to_start: self.min_players_to_start,
            room_code_attempts: self.room_code_attempts,
        }
    }

    pub fn rate_limit_refill(&self) -> Duration {
        Duration::from_millis(self.rate_limit_refill_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            default_max_guesses: 6,
            max_players_per_room: 2,
            min_players_to_start: 2,
            room_code_attempts: 32,
            rate_limit_burst: 30,
            rate_limit_refill_ms: 500,
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn in_range(name: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
