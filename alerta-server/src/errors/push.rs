#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("Missing credential: {0}")]
    MissingCredentials(&'static str),

    #[error("Invalid credential: {0}")]
    Credentials(#[from] jsonwebtoken::errors::Error),
}
