use thiserror::Error;

pub type Result<T> = std::result::Result<T, BloomError>;

#[derive(Error, Debug)]
pub enum BloomError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown hash function '{0}', expected 'sha256' or 'fast'")]
    UnknownHashFunction(String),

    #[error("Failed to parse environment variable {var_name}: value '{value}' - {error}")]
    EnvParseError {
        var_name: String,
        value: String,
        error: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BloomError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BloomError::InvalidParameter(msg.into())
    }
}
