//! Errors raised by engines, surfaces, and the player task.

/// Playback error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    /// The managed engine could not be instantiated.
    #[error("failed to create engine: {0}")]
    EngineCreate(String),

    /// The rendering surface refused an operation.
    #[error("surface error: {0}")]
    Surface(String),

    /// A play command was rejected (typically an autoplay policy).
    #[error("play rejected: {0}")]
    PlayRejected(String),

    /// The player task has shut down.
    #[error("player task is closed")]
    Closed,
}

impl PlayerError {
    pub fn engine_create<S: Into<String>>(msg: S) -> Self {
        Self::EngineCreate(msg.into())
    }

    pub fn surface<S: Into<String>>(msg: S) -> Self {
        Self::Surface(msg.into())
    }

    pub fn play_rejected<S: Into<String>>(msg: S) -> Self {
        Self::PlayRejected(msg.into())
    }
}

/// Result type alias for playback operations.
pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            PlayerError::engine_create("out of memory").to_string(),
            "failed to create engine: out of memory"
        );
        assert_eq!(
            PlayerError::play_rejected("NotAllowedError").to_string(),
            "play rejected: NotAllowedError"
        );
        assert_eq!(PlayerError::Closed.to_string(), "player task is closed");
    }
}
