//! Test formats shared by the integration tests

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use toolbox_core::{
    CompressionFormat, CompressionSettings, Error, FileFormat, FileInfo, FormatSink,
    FormatSource, Result,
};
use toolbox_utils::atomic_file::is_scratch_name;

const BLOB_MAGIC: &[u8; 4] = b"BLOB";

/// Minimal container: magic, little-endian payload length, payload.
///
/// When loaded from a file it keeps the handle open, like a format that
/// streams its sections lazily.
pub struct BlobFormat {
    pub info: FileInfo,
    pub payload: Vec<u8>,
    pub handle: Option<Box<dyn FormatSource>>,
    pub released: bool,
    pub loads: usize,
    pub fail_save: bool,
    pub fail_release: bool,
}

impl BlobFormat {
    pub fn new(name: &str, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            info: FileInfo::new(name),
            payload: payload.into(),
            handle: None,
            released: false,
            loads: 0,
            fail_save: false,
            fail_release: false,
        }
    }

    /// Open `path` and keep it open, marking the descriptor keep-open
    pub fn open(path: &Path) -> Self {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let mut format = Self::new(&name, Vec::new());
        format.info.keep_open = true;
        format.info.file_path = Some(path.to_path_buf());
        format.load(Box::new(File::open(path).unwrap())).unwrap();
        format
    }

    /// Bytes `save` produces, without going through the engine
    pub fn encoded(payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(payload.len() + 8);
        out.extend_from_slice(BLOB_MAGIC);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.len() < 8 || &bytes[..4] != BLOB_MAGIC {
            return Err(Error::serialization("blob", "bad header"));
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        bytes
            .get(8..8 + len)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::serialization("blob", "truncated payload"))
    }
}

impl FileFormat for BlobFormat {
    fn file_info(&self) -> &FileInfo {
        &self.info
    }

    fn file_info_mut(&mut self) -> &mut FileInfo {
        &mut self.info
    }

    fn save(&mut self, sink: &mut dyn FormatSink) -> Result<()> {
        if self.released {
            return Err(Error::serialization("blob", "saved after release"));
        }
        if self.fail_save {
            let _ = sink.write_all(b"BL");
            return Err(Error::serialization("blob", "refusing to encode"));
        }
        sink.write_all(&Self::encoded(&self.payload))
            .map_err(|e| Error::serialization_with_source("blob", "write", e))
    }

    fn load(&mut self, mut source: Box<dyn FormatSource>) -> Result<()> {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|e| Error::serialization_with_source("blob", "read", e))?;
        source
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::serialization_with_source("blob", "rewind", e))?;

        self.payload = Self::decode(&bytes)?;
        self.handle = Some(source);
        self.released = false;
        self.loads += 1;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        if self.fail_release {
            return Err(Error::serialization("blob", "handle still borrowed"));
        }
        self.handle = None;
        self.released = true;
        Ok(())
    }
}

/// Codec that always fails
pub struct RejectingCodec;

impl CompressionFormat for RejectingCodec {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn compress(&self, _input: &[u8], _settings: &CompressionSettings) -> Result<Vec<u8>> {
        Err(Error::compression(self.name(), "input rejected"))
    }

    fn decompress(&self, _input: &[u8]) -> Result<Vec<u8>> {
        Err(Error::compression(self.name(), "input rejected"))
    }

    fn identify(&self, _header: &[u8]) -> bool {
        false
    }
}

/// Sink that accepts nothing
pub struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "sink closed",
        ))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Names of scratch files left in `dir`
pub fn scratch_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| is_scratch_name(name))
        .collect()
}

pub fn read_all(path: &Path) -> Vec<u8> {
    let mut bytes = Vec::new();
    File::open(path).unwrap().read_to_end(&mut bytes).unwrap();
    bytes
}
