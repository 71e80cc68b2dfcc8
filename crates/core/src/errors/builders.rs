//! Builder methods for creating errors with context

use super::types::{Error, SwapStage};
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create a serialization error
    #[must_use]
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Serialization {
            format: format.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a serialization error with a source error
    #[must_use]
    pub fn serialization_with_source(
        format: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            format: format.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a compression error
    #[must_use]
    pub fn compression(codec: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Compression {
            codec: codec.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a compression error with a source error
    #[must_use]
    pub fn compression_with_source(
        codec: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Compression {
            codec: codec.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a sink I/O error
    #[must_use]
    pub fn sink(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Sink {
            operation: operation.into(),
            source,
        }
    }

    /// Create an interrupted swap error
    #[must_use]
    pub fn swap_interrupted(
        destination: impl Into<PathBuf>,
        temp_path: impl Into<PathBuf>,
        stage: SwapStage,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::SwapInterrupted {
            destination: destination.into(),
            temp_path: temp_path.into(),
            stage,
            source: source.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an unsupported feature error
    #[must_use]
    pub fn unsupported(feature: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Unsupported {
            feature: feature.into(),
            message: message.into(),
        }
    }

    /// The orphaned temporary file left behind by an interrupted swap
    #[must_use]
    pub fn orphaned_temp_path(&self) -> Option<&std::path::Path> {
        match self {
            Error::SwapInterrupted { temp_path, .. } => Some(temp_path),
            _ => None,
        }
    }
}
