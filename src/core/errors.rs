use thiserror::Error;

#[derive(Error, Debug)]
pub enum TangochoError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Word not found.")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("TangochoError: {0}")]
    Custom(String),
}

impl TangochoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TangochoError::NotFound)
    }
}

impl From<std::io::Error> for TangochoError {
    fn from(error: std::io::Error) -> Self {
        TangochoError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for TangochoError {
    fn from(error: reqwest::Error) -> Self {
        TangochoError::Reqwest(Box::new(error))
    }
}
