/// Application-level errors
///
/// The prediction engine is total and never produces these; they surface only
/// while loading rating data, reading configuration, or driving a batch run.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Unable to open {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_message_names_path() {
        let err = AppError::SourceUnavailable {
            path: "data/movies.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Unable to open data/movies.csv: missing");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
