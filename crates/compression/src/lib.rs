//! Compression codec adapters
//!
//! Every codec implements [`CompressionFormat`] so a file format can select one
//! through its descriptor and the persistence engine can apply it blindly:
//! - zstd via the `zstd` crate
//! - zlib and gzip via `flate2`

pub mod deflate;
pub mod zstd;

pub use self::deflate::{GzipCompression, ZlibCompression};
pub use self::zstd::ZstdCompression;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolbox_core::{CompressionFormat, CompressionSettings, Error, Result};

/// Selectable codec, as named in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    Zstd,
    Zlib,
    Gzip,
}

impl CompressionKind {
    pub const ALL: [CompressionKind; 3] = [
        CompressionKind::Zstd,
        CompressionKind::Zlib,
        CompressionKind::Gzip,
    ];

    /// Instantiate the codec with default settings
    #[must_use]
    pub fn into_format(self) -> Arc<dyn CompressionFormat> {
        match self {
            CompressionKind::Zstd => Arc::new(ZstdCompression),
            CompressionKind::Zlib => Arc::new(ZlibCompression),
            CompressionKind::Gzip => Arc::new(GzipCompression),
        }
    }

    /// Identify the codec of a compressed file from its leading bytes
    #[must_use]
    pub fn detect(header: &[u8]) -> Option<CompressionKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.into_format().identify(header))
    }
}

impl std::str::FromStr for CompressionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "zstd" | "zst" => Ok(CompressionKind::Zstd),
            "zlib" => Ok(CompressionKind::Zlib),
            "gzip" | "gz" => Ok(CompressionKind::Gzip),
            other => Err(Error::unsupported(
                "compression",
                format!("unknown codec '{other}'"),
            )),
        }
    }
}

/// Reject settings no codec can honour, and levels outside `levels`
pub(crate) fn validate_settings(
    codec: &'static str,
    settings: &CompressionSettings,
    levels: std::ops::RangeInclusive<i32>,
) -> Result<()> {
    if settings.alignment != 0 && !settings.alignment.is_power_of_two() {
        return Err(Error::compression(
            codec,
            format!("alignment {} is not a power of two", settings.alignment),
        ));
    }

    if let Some(level) = settings.level {
        if !levels.contains(&level) {
            return Err(Error::compression(
                codec,
                format!(
                    "level {level} outside {}..={}",
                    levels.start(),
                    levels.end()
                ),
            ));
        }
    }

    Ok(())
}
