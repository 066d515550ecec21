//! Error type shared by the game core and the JS bridge

use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, GameError>;

/// Errors that can occur while feeding data into a session
#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid landmark data length: {got} (expected {expected})")]
    LandmarkCount { got: usize, expected: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },

    #[error("invalid hitbox data length: {got} (expected {expected})")]
    HitboxCount { got: usize, expected: usize },

    #[error("unknown visual mode '{0}'")]
    UnknownMode(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
