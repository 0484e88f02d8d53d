use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote service returned {status}: {message}")]
    Protocol { status: u16, message: String },

    #[error("Response decoding failed: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
