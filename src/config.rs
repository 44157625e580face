//! Session tunables and command-line parsing.

use std::iter::Peekable;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

use crate::constants::*;
use crate::error::ConfigError;

/// Headless run: render into an in-memory buffer and stop after `max_frames`.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugConfig {
    pub columns: u16,
    pub rows: u16,
    pub max_frames: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        DebugConfig {
            columns: DEBUG_COLUMNS,
            rows: DEBUG_ROWS,
            max_frames: DEBUG_MAX_FRAMES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub max_asteroids: usize,
    pub max_bullets: usize,
    /// Session length in ticks.
    pub game_duration: u32,
    pub tick_interval_ms: u64,
    pub bullet_speed: f64,
    pub hit_reach: f64,
    pub pad_step: f64,
    pub key_step: f64,
    pub play_width: f64,
    pub play_height: f64,
    pub ship_width: f64,
    pub ship_height: f64,
    pub ship_margin: f64,
    pub high_score_path: PathBuf,
    pub seed: Option<u64>,
    pub debug: Option<DebugConfig>,
    pub log_level: LevelFilter,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_asteroids: MAX_ASTEROIDS,
            max_bullets: MAX_BULLETS,
            game_duration: GAME_DURATION_TICKS,
            tick_interval_ms: TICK_INTERVAL_MS,
            bullet_speed: BULLET_SPEED,
            hit_reach: HIT_REACH,
            pad_step: PAD_MOVE_STEP,
            key_step: KEY_MOVE_STEP,
            play_width: PLAY_AREA_WIDTH,
            play_height: PLAY_AREA_HEIGHT,
            ship_width: SHIP_WIDTH,
            ship_height: SHIP_HEIGHT,
            ship_margin: SHIP_BOTTOM_MARGIN,
            high_score_path: PathBuf::from(HIGH_SCORE_FILE),
            seed: None,
            debug: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl GameConfig {
    /// Builds a config from the arguments after the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = GameConfig::default();
        let mut args = args.into_iter().peekable();

        while let Some(option) = args.next() {
            match option.as_str() {
                "--max-asteroids" => config.max_asteroids = parse_value(&option, &mut args)?,
                "--max-bullets" => config.max_bullets = parse_value(&option, &mut args)?,
                "--duration" => config.game_duration = parse_value(&option, &mut args)?,
                "--tick-ms" => config.tick_interval_ms = parse_value(&option, &mut args)?,
                "--bullet-speed" => config.bullet_speed = parse_value(&option, &mut args)?,
                "--hit-reach" => config.hit_reach = parse_value(&option, &mut args)?,
                "--pad-step" => config.pad_step = parse_value(&option, &mut args)?,
                "--key-step" => config.key_step = parse_value(&option, &mut args)?,
                "--width" => config.play_width = parse_value(&option, &mut args)?,
                "--height" => config.play_height = parse_value(&option, &mut args)?,
                "--ship-width" => config.ship_width = parse_value(&option, &mut args)?,
                "--ship-height" => config.ship_height = parse_value(&option, &mut args)?,
                "--high-score-file" => config.high_score_path = parse_value(&option, &mut args)?,
                "--seed" => config.seed = Some(parse_value(&option, &mut args)?),
                "--log-level" => config.log_level = parse_value(&option, &mut args)?,
                "--debug" => {
                    let mut debug = DebugConfig::default();
                    if let Some(columns) = parse_positional(&option, &mut args)? {
                        debug.columns = columns;
                        debug.rows = parse_positional(&option, &mut args)?
                            .ok_or_else(|| ConfigError::MissingValue(option.clone()))?;
                        if let Some(frames) = parse_positional(&option, &mut args)? {
                            debug.max_frames = frames;
                        }
                    }
                    config.debug = Some(debug);
                }
                other => return Err(ConfigError::UnknownOption(other.to_string())),
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_asteroids == 0 {
            return Err(ConfigError::OutOfRange { option: "--max-asteroids", reason: "must be at least 1" });
        }
        if self.max_bullets == 0 {
            return Err(ConfigError::OutOfRange { option: "--max-bullets", reason: "must be at least 1" });
        }
        if self.game_duration == 0 {
            return Err(ConfigError::OutOfRange { option: "--duration", reason: "must be at least 1 tick" });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::OutOfRange { option: "--tick-ms", reason: "must be at least 1 ms" });
        }
        let distances = [
            ("--width", self.play_width),
            ("--height", self.play_height),
            ("--ship-width", self.ship_width),
            ("--ship-height", self.ship_height),
            ("--bullet-speed", self.bullet_speed),
            ("--hit-reach", self.hit_reach),
            ("--pad-step", self.pad_step),
            ("--key-step", self.key_step),
        ];
        for (option, value) in distances {
            if !value.is_finite() {
                return Err(ConfigError::OutOfRange { option, reason: "must be a finite number" });
            }
            if value < 0.0 {
                return Err(ConfigError::OutOfRange { option, reason: "must not be negative" });
            }
        }
        if !self.ship_margin.is_finite() || self.ship_margin < 0.0 {
            return Err(ConfigError::OutOfRange { option: "ship margin", reason: "must be finite and not negative" });
        }
        if self.play_width == 0.0 || self.play_height == 0.0 {
            return Err(ConfigError::OutOfRange { option: "--width/--height", reason: "play area must be positive" });
        }
        if self.ship_width > self.play_width {
            return Err(ConfigError::OutOfRange { option: "--ship-width", reason: "ship must fit in the play area" });
        }
        if let Some(debug) = &self.debug {
            if debug.columns == 0 || debug.rows == 0 {
                return Err(ConfigError::OutOfRange { option: "--debug", reason: "screen must be at least 1x1" });
            }
        }
        Ok(())
    }

    /// Whole ticks per second for the countdown display; 33 ms gives 30.
    pub fn ticks_per_second(&self) -> u32 {
        (1000 / self.tick_interval_ms.max(1)).max(1) as u32
    }
}

fn parse_value<T, I>(option: &str, args: &mut Peekable<I>) -> Result<T, ConfigError>
where
    T: FromStr,
    I: Iterator<Item = String>,
{
    let value = args.next().ok_or_else(|| ConfigError::MissingValue(option.to_string()))?;
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        option: option.to_string(),
        value,
    })
}

// Consumes the next argument only if it is not another option.
fn parse_positional<T, I>(option: &str, args: &mut Peekable<I>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    I: Iterator<Item = String>,
{
    match args.peek() {
        Some(next) if !next.starts_with("--") => parse_value(option, args).map(Some),
        _ => Ok(None),
    }
}
