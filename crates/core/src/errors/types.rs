//! Core error type definitions

use std::fmt;
use std::path::PathBuf;

/// Result type alias for toolbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for toolbox operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file format failed to write (or read) its own byte layout
    Serialization {
        format: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A compression codec rejected or failed on its input
    Compression {
        codec: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// An atomic swap failed after its temporary file was fully written.
    /// The temporary file is left at `temp_path`.
    SwapInterrupted {
        destination: PathBuf,
        temp_path: PathBuf,
        stage: SwapStage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing to a caller-supplied sink that has no path
    Sink {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    Configuration { message: String },

    /// Unsupported operation errors
    Unsupported { feature: String, message: String },
}

/// The step of an atomic swap that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStage {
    /// Releasing the format's handles on the original file
    Release,
    /// Deleting the original destination
    RemoveOriginal,
    /// Renaming the temporary file onto the destination
    Rename,
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapStage::Release => "release",
            SwapStage::RemoveOriginal => "remove original",
            SwapStage::Rename => "rename",
        };
        f.write_str(name)
    }
}
