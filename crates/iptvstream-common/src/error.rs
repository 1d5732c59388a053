//! Errors raised outside of playback.
//!
//! Playback failures are reported through the session state of
//! `iptvstream-player` and never surface here.

/// Catalog, lookup and clipboard failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn catalog(reason: impl Into<String>) -> Self {
        Self::Catalog(reason.into())
    }

    pub fn unknown_channel(id: impl Into<String>) -> Self {
        Self::UnknownChannel(id.into())
    }

    pub fn clipboard(reason: impl Into<String>) -> Self {
        Self::Clipboard(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cause() {
        assert_eq!(
            Error::catalog("duplicate channel id 'ptv-home'").to_string(),
            "Invalid catalog: duplicate channel id 'ptv-home'"
        );
        assert_eq!(
            Error::unknown_channel("ptv").to_string(),
            "Unknown channel: ptv"
        );
        assert_eq!(
            Error::clipboard("xclip exited with 1").to_string(),
            "Clipboard unavailable: xclip exited with 1"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "pipe closed");
    }
}
