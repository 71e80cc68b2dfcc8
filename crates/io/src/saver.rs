//! The persistence engine
//!
//! Saves a [`FileFormat`] either to a filesystem path, choosing one of three
//! write strategies from the format's descriptor, or to an arbitrary sink.

use crate::compress::{compress_buffer, serialize_to_buffer};
use crate::config::SaverConfig;
use crate::log::SaveLog;
use crate::strategy::SaveStrategy;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use toolbox_core::{Error, FileFormat, IoResultExt, Result, SwapStage};
use toolbox_utils::atomic_file::{create_scratch, discard_scratch, swap_into_place};

/// Saves file formats according to a [`SaverConfig`].
///
/// A saver holds no per-call state, so one instance may serve concurrent
/// saves of different formats.
#[derive(Debug, Clone, Default)]
pub struct FileSaver {
    config: SaverConfig,
}

impl FileSaver {
    #[must_use]
    pub fn new(config: SaverConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SaverConfig {
        &self.config
    }

    /// Save `format` to `destination`.
    ///
    /// After an atomic swap the format has been released and reloaded from
    /// the new file; any handle the caller derived from it earlier is stale.
    pub fn save<F>(&self, format: &mut F, destination: impl AsRef<Path>) -> Result<SaveLog>
    where
        F: FileFormat + ?Sized,
    {
        let destination = destination.as_ref();
        ensure_saveable(format)?;

        let started = Instant::now();
        let exists = destination
            .try_exists()
            .fs_context(destination, "check destination")?;
        let strategy = SaveStrategy::select(format.file_info(), exists);

        let _span = tracing::debug_span!(
            "save",
            file = %format.file_info().file_name,
            destination = %destination.display(),
            %strategy
        )
        .entered();

        let (bytes_written, compressed_size) = match strategy {
            SaveStrategy::Compressed => {
                let written = self.write_compressed(format, destination)?;
                (written, Some(written))
            }
            SaveStrategy::AtomicSwap => (self.write_swapped(format, destination)?, None),
            SaveStrategy::Direct => (self.write_direct(format, destination)?, None),
        };

        let log = SaveLog::new(started.elapsed(), Some(strategy), bytes_written, compressed_size);
        format.file_info_mut().file_path = Some(destination.to_path_buf());

        tracing::debug!(save_time = %log.save_time, bytes_written, "saved file");
        Ok(log)
    }

    /// Save `format` into a caller-supplied sink.
    ///
    /// The format is always serialized to memory first; `keep_open` is not
    /// consulted since a sink has no file identity to protect.
    pub fn save_to_sink<F, W>(&self, format: &mut F, sink: &mut W) -> Result<SaveLog>
    where
        F: FileFormat + ?Sized,
        W: Write + ?Sized,
    {
        ensure_saveable(format)?;
        let started = Instant::now();

        let buffer = serialize_to_buffer(format)?;
        let compressed = match format.file_info().compression.clone() {
            Some(codec) => Some(compress_buffer(format.file_info(), codec.as_ref(), &buffer)?),
            None => None,
        };
        let bytes = compressed.as_ref().map_or(buffer.as_slice(), |c| c.bytes.as_slice());

        sink.write_all(bytes)
            .map_err(|e| Error::sink("write", e))?;
        sink.flush().map_err(|e| Error::sink("flush", e))?;

        let compressed_size = compressed.as_ref().map(|c| {
            c.record(format.file_info_mut());
            c.compressed_size()
        });

        let log = SaveLog::new(started.elapsed(), None, bytes.len() as u64, compressed_size);
        tracing::debug!(
            file = %format.file_info().file_name,
            save_time = %log.save_time,
            bytes_written = log.bytes_written,
            "saved file to sink"
        );
        Ok(log)
    }

    fn write_compressed<F>(&self, format: &mut F, destination: &Path) -> Result<u64>
    where
        F: FileFormat + ?Sized,
    {
        let codec = format.file_info().compression.clone().ok_or_else(|| {
            Error::configuration("compressed save requested without a codec")
        })?;

        let buffer = serialize_to_buffer(format)?;
        let compressed = compress_buffer(format.file_info(), codec.as_ref(), &buffer)?;

        let mut file = File::create(destination).fs_context(destination, "create")?;
        file.write_all(&compressed.bytes)
            .fs_context(destination, "write compressed data")?;
        self.finish_file(&file, destination)?;

        compressed.record(format.file_info_mut());
        Ok(compressed.compressed_size())
    }

    fn write_direct<F>(&self, format: &mut F, destination: &Path) -> Result<u64>
    where
        F: FileFormat + ?Sized,
    {
        let file = File::create(destination).fs_context(destination, "create")?;
        self.serialize_into_file(format, file, destination)
    }

    /// Write to a scratch file beside `destination`, release the format, move
    /// the scratch file over the original and reload the format from it.
    fn write_swapped<F>(&self, format: &mut F, destination: &Path) -> Result<u64>
    where
        F: FileFormat + ?Sized,
    {
        let (file, temp_path) = create_scratch(destination, &self.config.temp_prefix)?;

        // Nothing destructive has happened yet, so a failed write can be undone
        let written = match self.serialize_into_file(format, file, &temp_path) {
            Ok(written) => written,
            Err(e) => {
                discard_scratch(&temp_path);
                return Err(e);
            }
        };

        format
            .release()
            .map_err(|e| Error::swap_interrupted(destination, &temp_path, SwapStage::Release, e))?;

        swap_into_place(&temp_path, destination, self.config.swap_order)?;

        let reopened = File::open(destination).fs_context(destination, "reopen saved file")?;
        format.load(Box::new(reopened))?;

        Ok(written)
    }

    /// Serialize into `file` through a buffer, then flush and optionally sync.
    /// The file is closed on return.
    fn serialize_into_file<F>(&self, format: &mut F, file: File, path: &Path) -> Result<u64>
    where
        F: FileFormat + ?Sized,
    {
        let mut writer = BufWriter::new(file);
        format.save(&mut writer)?;

        let file = writer
            .into_inner()
            .map_err(|e| Error::file_system(path, "flush", e.into_error()))?;
        self.finish_file(&file, path)?;

        let metadata = file.metadata().fs_context(path, "stat written file")?;
        Ok(metadata.len())
    }

    fn finish_file(&self, file: &File, path: &Path) -> Result<()> {
        if self.config.sync {
            file.sync_all().fs_context(path, "sync")?;
        }
        Ok(())
    }
}

fn ensure_saveable<F: FileFormat + ?Sized>(format: &F) -> Result<()> {
    if format.can_save() {
        Ok(())
    } else {
        Err(Error::unsupported(
            "save",
            format!("'{}' cannot be saved", format.file_info().file_name),
        ))
    }
}

/// Save `format` to `destination` with the default configuration
pub fn save_file_format<F>(format: &mut F, destination: impl AsRef<Path>) -> Result<SaveLog>
where
    F: FileFormat + ?Sized,
{
    FileSaver::default().save(format, destination)
}

/// Save `format` into `sink` with the default configuration
pub fn save_file_format_to_sink<F, W>(format: &mut F, sink: &mut W) -> Result<SaveLog>
where
    F: FileFormat + ?Sized,
    W: Write + ?Sized,
{
    FileSaver::default().save_to_sink(format, sink)
}
