//! Error types for the PDF chatbot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Entity recognition error: {0}")]
    Ner(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_pdf() {
        let err = Error::Pdf("report.pdf: invalid header".to_string());
        assert!(err.to_string().contains("PDF extraction error"));
        assert!(err.to_string().contains("report.pdf"));
    }

    #[test]
    fn test_error_display_embedding() {
        let err = Error::Embedding("model not loaded".to_string());
        assert!(err.to_string().contains("Embedding error"));
        assert!(err.to_string().contains("model not loaded"));
    }

    #[test]
    fn test_error_display_generation() {
        let err = Error::Generation("Ollama error 500".to_string());
        assert!(err.to_string().contains("Generation error"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_error_display_ner() {
        let err = Error::Ner("not a JSON array".to_string());
        assert!(err.to_string().contains("Entity recognition error"));
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("unknown backend 'foo'".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("foo"));
    }

    #[test]
    fn test_error_display_invalid_argument() {
        let err = Error::InvalidArgument("no PDF files given".to_string());
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<Vec<String>>("[1, 2,]").unwrap_err();
        let err: Error = json_err.into();

        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_from_serde_yaml() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{ not: [a list").unwrap_err();
        let err: Error = yaml_err.into();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_error_all_variants_debug() {
        let variants: Vec<Error> = vec![
            Error::Pdf("pdf".to_string()),
            Error::Embedding("embed".to_string()),
            Error::Generation("gen".to_string()),
            Error::Ner("ner".to_string()),
            Error::Config("config".to_string()),
            Error::InvalidArgument("arg".to_string()),
            Error::Serialization("serial".to_string()),
        ];

        for err in variants {
            let debug_str = format!("{:?}", err);
            assert!(!debug_str.is_empty());
        }
    }

    #[test]
    fn test_result_unwrap_or_else() {
        let result: Result<i32> = Err(Error::Generation("error".to_string()));
        let value = result.unwrap_or_else(|_| 42);
        assert_eq!(value, 42);
    }
}
