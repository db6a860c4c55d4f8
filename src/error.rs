use thiserror::Error;

/// Failures surfaced by the remote-API client. None of these are fatal:
/// every caller converts them into local view state (banner, empty list,
/// inline message) and no request is retried automatically.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing or expired credentials. Raising this also clears the
    /// session store so the front end can redirect to login.
    #[error("not authenticated")]
    NotAuthenticated,

    /// A request that is malformed from the service's point of view
    /// (empty required field, bad payload). Surfaced inline.
    #[error("{0}")]
    Validation(String),

    /// 404/409 on a mutate. Carries the server-provided message when the
    /// response body had one, a generic fallback otherwise.
    #[error("{0}")]
    Conflict(String),

    /// Network failure or 5xx. Logged and shown as a generic banner or
    /// empty-state message.
    #[error("remote service failure: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Remote(err.to_string())
    }
}
