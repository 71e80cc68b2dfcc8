//! The persistable file format contract and its descriptor

use crate::compression::{CompressionFormat, CompressionSettings};
use crate::errors::Result;
use std::io::{Read, Seek, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Byte-oriented destination a format serializes itself into
pub trait FormatSink: Write + Seek {}

impl<T: Write + Seek + ?Sized> FormatSink for T {}

/// Byte-oriented source a format reads itself from
pub trait FormatSource: Read + Seek + Send {}

impl<T: Read + Seek + Send + ?Sized> FormatSource for T {}

/// Descriptor carried by every file format.
///
/// `compressed_size` and `decompressed_size` are bookkeeping written by the
/// persistence engine after a compressed save.
#[derive(Debug, Clone, Default)]
pub struct FileInfo {
    pub file_name: String,
    /// Last location the format was loaded from or saved to
    pub file_path: Option<PathBuf>,
    /// Codec applied on save; `None` stores the bytes uncompressed
    pub compression: Option<Arc<dyn CompressionFormat>>,
    /// True while another part of the program may read from the file on disk
    pub keep_open: bool,
    pub compressed_size: u64,
    pub decompressed_size: u64,
    pub alignment: u32,
    pub compression_level: Option<i32>,
}

impl FileInfo {
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_compression(mut self, compression: Arc<dyn CompressionFormat>) -> Self {
        self.compression = Some(compression);
        self
    }

    #[must_use]
    pub fn with_keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = keep_open;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: u32) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Codec settings taken from this descriptor
    #[must_use]
    pub fn compression_settings(&self) -> CompressionSettings {
        CompressionSettings::new(self.alignment, self.compression_level)
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.compression.is_some()
    }
}

/// An in-memory file that can write itself to and read itself from bytes.
pub trait FileFormat {
    fn file_info(&self) -> &FileInfo;

    fn file_info_mut(&mut self) -> &mut FileInfo;

    /// Serialize the whole file into `sink`
    fn save(&mut self, sink: &mut dyn FormatSink) -> Result<()>;

    /// Replace the in-memory state with the contents of `source`.
    ///
    /// Formats that stream lazily may keep `source` as their backing handle.
    fn load(&mut self, source: Box<dyn FormatSource>) -> Result<()>;

    /// Drop every handle held on the backing file.
    ///
    /// Called before the original is deleted during an atomic swap. The
    /// format is not usable again until the next [`load`](Self::load).
    fn release(&mut self) -> Result<()> {
        Ok(())
    }

    fn can_save(&self) -> bool {
        true
    }
}
