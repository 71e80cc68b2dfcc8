//! Persistence engine for toolbox file formats.
//!
//! [`FileSaver::save`] writes a [`FileFormat`](toolbox_core::FileFormat) to a
//! path using one of three strategies picked from its descriptor:
//!
//! 1. **compressed**: serialize to memory, compress, overwrite the destination
//! 2. **atomic swap**: the file may be open elsewhere, so write a scratch file
//!    next to it, release the format, replace the original and reload
//! 3. **direct**: serialize straight into the truncated destination
//!
//! [`FileSaver::save_to_sink`] serializes to memory, optionally compresses and
//! copies the bytes into any [`std::io::Write`].

mod compress;
pub mod config;
pub mod log;
pub mod saver;
pub mod strategy;

pub use config::{ConfigSource, SaverConfig, SaverConfigBuilder, SaverConfigLoader};
pub use log::{format_elapsed, SaveLog};
pub use saver::{save_file_format, save_file_format_to_sink, FileSaver};
pub use strategy::SaveStrategy;
pub use toolbox_utils::SwapOrder;
