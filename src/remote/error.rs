/// Error type for the optional network collaborators
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Missing credential: set {0}")]
    MissingCredential(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Service returned an empty answer")]
    Empty,

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl From<ureq::Error> for RemoteError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, resp) => {
                let body = resp.into_string().unwrap_or_default();
                RemoteError::Status { code, body }
            }
            other => RemoteError::Transport(other.to_string()),
        }
    }
}
