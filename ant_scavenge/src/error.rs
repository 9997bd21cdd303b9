use thiserror::Error;

/// Errors raised by board generation, view extraction and the step engine.
#[derive(Debug, Error)]
pub enum ScavengeError {
    /// The configuration (board shape, probabilities, retry budget) cannot produce a valid board.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A policy returned an action id outside of the fixed action set.
    #[error("invalid action {0}, expected an id in 0..=4")]
    InvalidAction(i64),
    /// A coordinate fell outside of the board.
    #[error("position out of bounds: ({x}, {y})")]
    OutOfBounds { x: i32, y: i32 },
    /// A point was built from a collection that did not hold exactly two values.
    #[error("a point needs exactly 2 components, got {0}")]
    PointArity(usize),
    /// A textual board could not be parsed.
    #[error("could not parse board: {0}")]
    Parse(String),
    /// An external policy failed to produce an action.
    #[error("policy failed: {0}")]
    Policy(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScavengeError>;
