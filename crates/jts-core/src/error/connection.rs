use super::Error;

/// Error when the transport to the database is unavailable.
///
/// This covers failing to establish a connection as well as a connection that
/// was closed before or during the run. Raised before any catalog query is
/// issued when the handle is already closed.
#[derive(Debug)]
pub(super) struct ConnectionError {
    message: Box<str>,
    inner: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .as_ref()
            .map(|err| err.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl core::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection unavailable: {}", self.message)
    }
}

impl Error {
    /// Creates a connection error from a message.
    pub fn connection(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Connection(ConnectionError {
            message: message.into().into(),
            inner: None,
        }))
    }

    /// Creates a connection error wrapping a transport error (postgres, I/O).
    ///
    /// The message is the wrapped error's display text, which already
    /// includes its causes.
    pub fn connection_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Connection(ConnectionError {
            message: err.to_string().into(),
            inner: Some(Box::new(err)),
        }))
    }

    /// Returns `true` if this error, or any error it was given as context for,
    /// is a connection error.
    pub fn is_connection(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Connection(_)))
    }
}
