use thiserror::Error;

use crate::game::Action;

#[derive(Debug, Error)]
pub enum KuhnError {
    #[error("action {action} is not legal after [{history}]")]
    IllegalAction {
        action: Action,
        history: String,
    },

    #[error("the hand is already over")]
    GameOver,

    #[error("unknown action token: {0:?}")]
    InvalidAction(String),

    #[error("malformed info set key: {0:?}")]
    InvalidInfoSetKey(String),

    #[error("a deck needs between 2 and {max} cards, got {got}")]
    InvalidDeck {
        got: usize,
        max: usize,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
