//! Zstandard compression

use crate::validate_settings;
use toolbox_core::{CompressionFormat, CompressionSettings, Error, Result};

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Default zstd compression level (3 = fast with good compression)
const DEFAULT_LEVEL: i32 = 3;

/// Zstd codec
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdCompression;

impl CompressionFormat for ZstdCompression {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, input: &[u8], settings: &CompressionSettings) -> Result<Vec<u8>> {
        validate_settings(self.name(), settings, 1..=22)?;
        let level = settings.level.unwrap_or(DEFAULT_LEVEL);

        let compressed = ::zstd::bulk::compress(input, level)
            .map_err(|e| Error::compression_with_source(self.name(), "encode failed", e))?;

        tracing::trace!(
            input = input.len(),
            output = compressed.len(),
            level,
            "zstd compressed"
        );
        Ok(compressed)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        ::zstd::stream::decode_all(input)
            .map_err(|e| Error::compression_with_source(self.name(), "decode failed", e))
    }

    fn identify(&self, header: &[u8]) -> bool {
        header.starts_with(&ZSTD_MAGIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let data = b"hello world hello world hello world";
        let compressed = ZstdCompression
            .compress(data, &CompressionSettings::default())
            .unwrap();
        let decompressed = ZstdCompression.decompress(&compressed).unwrap();

        assert_eq!(data.as_slice(), decompressed.as_slice());
        assert!(ZstdCompression.identify(&compressed));
    }

    #[test]
    fn test_invalid_level() {
        let err = ZstdCompression
            .compress(b"abc", &CompressionSettings::new(0, Some(30)))
            .unwrap_err();
        assert!(matches!(err, Error::Compression { .. }));
    }

    #[test]
    fn test_decompress_garbage() {
        assert!(ZstdCompression.decompress(b"not a zstd frame").is_err());
    }
}
