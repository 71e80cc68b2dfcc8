//! The compression contract consumed by the persistence engine

use crate::errors::Result;

/// Codec settings derived from a format's [`FileInfo`](crate::FileInfo)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionSettings {
    /// Alignment requested by the format; 0 means codec default
    pub alignment: u32,
    /// Codec-specific level; `None` means codec default
    pub level: Option<i32>,
}

impl CompressionSettings {
    #[must_use]
    pub fn new(alignment: u32, level: Option<i32>) -> Self {
        Self { alignment, level }
    }
}

/// A pluggable byte-to-byte compression transform.
///
/// Implementations must be side-effect free: the engine hands over a fully
/// populated buffer and uses the returned length verbatim as the format's
/// compressed size.
pub trait CompressionFormat: Send + Sync {
    /// Short codec name used in errors and diagnostics
    fn name(&self) -> &'static str;

    /// Compress a closed, fully-populated buffer
    fn compress(&self, input: &[u8], settings: &CompressionSettings) -> Result<Vec<u8>>;

    /// Reverse [`compress`](Self::compress)
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Whether `header` starts with this codec's magic bytes
    fn identify(&self, header: &[u8]) -> bool;
}

impl std::fmt::Debug for dyn CompressionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CompressionFormat").field(&self.name()).finish()
    }
}
