//! Deflate-based codecs (zlib and gzip framing) backed by flate2

use crate::validate_settings;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use std::io::{Read, Write};
use toolbox_core::{CompressionFormat, CompressionSettings, Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

fn level_of(settings: &CompressionSettings) -> Compression {
    settings
        .level
        .map_or_else(Compression::default, |level| Compression::new(level as u32))
}

/// zlib (RFC 1950) codec
#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibCompression;

impl CompressionFormat for ZlibCompression {
    fn name(&self) -> &'static str {
        "zlib"
    }

    fn compress(&self, input: &[u8], settings: &CompressionSettings) -> Result<Vec<u8>> {
        validate_settings(self.name(), settings, 0..=9)?;

        let mut encoder = ZlibEncoder::new(Vec::with_capacity(input.len() / 2), level_of(settings));
        encoder
            .write_all(input)
            .map_err(|e| Error::compression_with_source(self.name(), "encode failed", e))?;
        encoder
            .finish()
            .map_err(|e| Error::compression_with_source(self.name(), "finish failed", e))
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        ZlibDecoder::new(input)
            .read_to_end(&mut out)
            .map_err(|e| Error::compression_with_source(self.name(), "decode failed", e))?;
        Ok(out)
    }

    fn identify(&self, header: &[u8]) -> bool {
        // CMF/FLG pair: deflate method, 32K window, checksum divisible by 31
        match header {
            [cmf, flg, ..] => {
                *cmf == 0x78 && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0
            }
            _ => false,
        }
    }
}

/// gzip (RFC 1952) codec
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipCompression;

impl CompressionFormat for GzipCompression {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress(&self, input: &[u8], settings: &CompressionSettings) -> Result<Vec<u8>> {
        validate_settings(self.name(), settings, 0..=9)?;

        let mut encoder = GzEncoder::new(Vec::with_capacity(input.len() / 2), level_of(settings));
        encoder
            .write_all(input)
            .map_err(|e| Error::compression_with_source(self.name(), "encode failed", e))?;
        encoder
            .finish()
            .map_err(|e| Error::compression_with_source(self.name(), "finish failed", e))
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        GzDecoder::new(input)
            .read_to_end(&mut out)
            .map_err(|e| Error::compression_with_source(self.name(), "decode failed", e))?;
        Ok(out)
    }

    fn identify(&self, header: &[u8]) -> bool {
        header.starts_with(&GZIP_MAGIC)
    }
}
