use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid dice configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Selection {index} is not available (choose from: {available})")]
    OutOfRangeSelection { index: usize, available: String },

    #[error("Response {value} is outside the range 0..{range}")]
    InvalidResponse { value: u32, range: u32 },

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Secure random source failed: {0}")]
    Entropy(String),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Problems with the dice given on the command line. Each carries the
/// offending input so it can be echoed back to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("at least {min} dice are required, got {found} ({})", .inputs.join(" "))]
    TooFewDice {
        min: usize,
        found: usize,
        inputs: Vec<String>,
    },

    #[error("dice #{position} is empty ('{input}')")]
    EmptyDice { position: usize, input: String },

    #[error("dice #{position} ('{input}'): '{face}' is not an integer")]
    InvalidFace {
        position: usize,
        input: String,
        face: String,
    },

    #[error("dice #{position} ('{input}') has {found} faces, expected {expected}")]
    FaceCountMismatch {
        position: usize,
        input: String,
        expected: usize,
        found: usize,
    },
}

impl GameError {
    pub fn out_of_range(index: usize, available: &[usize]) -> Self {
        let available = available
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::OutOfRangeSelection { index, available }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn entropy(msg: impl Into<String>) -> Self {
        Self::Entropy(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Errors after which the session cannot continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            GameError::OutOfRangeSelection { .. } | GameError::InvalidResponse { .. }
        )
    }
}
