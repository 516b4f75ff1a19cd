use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlossaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key not set: export {0} or add it to .env")]
    MissingApiKey(String),
}

pub type Result<T> = std::result::Result<T, GlossaError>;
