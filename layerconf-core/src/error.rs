use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("source '{source_name}' failed to load: {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("value of '{key}' is not a valid {expected}: '{value}'")]
    Coercion {
        key: String,
        expected: &'static str,
        value: String,
    },
}

impl Error {
    pub fn source_failure(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
