//! Glue between a format's descriptor and its codec

use std::io::Cursor;
use toolbox_core::{CompressionFormat, FileFormat, FileInfo, Result};

/// Codec output together with the sizes a successful save records
pub(crate) struct CompressedBuffer {
    pub bytes: Vec<u8>,
    pub decompressed_size: u64,
}

impl CompressedBuffer {
    pub fn compressed_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Write the sizes into the descriptor once the bytes have landed
    pub fn record(&self, info: &mut FileInfo) {
        info.compressed_size = self.compressed_size();
        info.decompressed_size = self.decompressed_size;
    }
}

/// Serialize the whole format into a fresh in-memory buffer
pub(crate) fn serialize_to_buffer<F: FileFormat + ?Sized>(format: &mut F) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    format.save(&mut buffer)?;
    Ok(buffer.into_inner())
}

/// Compress `buffer` with the descriptor's settings.
///
/// The descriptor is left alone; callers [`record`](CompressedBuffer::record)
/// the sizes after the output is written.
pub(crate) fn compress_buffer(
    info: &FileInfo,
    codec: &dyn CompressionFormat,
    buffer: &[u8],
) -> Result<CompressedBuffer> {
    let bytes = codec.compress(buffer, &info.compression_settings())?;

    tracing::debug!(
        codec = codec.name(),
        decompressed = buffer.len(),
        compressed = bytes.len(),
        "compressed save buffer"
    );
    Ok(CompressedBuffer {
        bytes,
        decompressed_size: buffer.len() as u64,
    })
}
