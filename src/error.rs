use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// Problems with command-line options.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("option `{0}` expects a value")]
    MissingValue(String),
    #[error("invalid value `{value}` for `{option}`")]
    InvalidValue { option: String, value: String },
    #[error("`{option}` is out of range: {reason}")]
    OutOfRange { option: &'static str, reason: &'static str },
}

/// Reading or writing the persisted high score.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("high score file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is not a number: {0}")]
    Parse(#[from] ParseIntError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
