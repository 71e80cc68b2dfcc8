//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serialization {
                format, message, ..
            } => {
                write!(f, "failed to serialize '{format}': {message}")
            }
            Error::Compression { codec, message, .. } => {
                write!(f, "{codec} compression failed: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::SwapInterrupted {
                destination,
                temp_path,
                stage,
                source,
            } => {
                write!(
                    f,
                    "atomic swap into '{}' failed at {} step: {} (new content kept at '{}')",
                    destination.display(),
                    stage,
                    source,
                    temp_path.display()
                )
            }
            Error::Sink { operation, source } => {
                write!(f, "sink {operation} failed: {source}")
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::Unsupported { feature, message } => {
                write!(f, "unsupported feature '{feature}': {message}")
            }
        }
    }
}
