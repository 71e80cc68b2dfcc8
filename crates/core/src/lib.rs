//! Core contracts and errors for the toolbox persistence pipeline.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by every crate
//!   in the workspace.
//! - **`format`**: the `FileFormat` trait implemented by every persistable
//!   file type, and its `FileInfo` descriptor.
//! - **`compression`**: the `CompressionFormat` trait codecs implement.

pub mod compression;
pub mod errors;
pub mod format;

pub use self::{
    compression::{CompressionFormat, CompressionSettings},
    errors::{Error, IoResultExt, Result, ResultExt, SwapStage},
    format::{FileFormat, FileInfo, FormatSink, FormatSource},
};
