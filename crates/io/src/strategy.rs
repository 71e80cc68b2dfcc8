//! Write strategy selection for path saves

use std::fmt;
use toolbox_core::FileInfo;

/// The three mutually exclusive ways a format reaches a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveStrategy {
    /// Serialize to memory, compress, overwrite the destination
    Compressed,
    /// Serialize to a scratch file and swap it over a destination that may be open
    AtomicSwap,
    /// Serialize straight into the truncated destination
    Direct,
}

impl SaveStrategy {
    /// Pick the strategy for a descriptor. First match wins:
    /// compression, then keep-open over an existing file, then direct.
    #[must_use]
    pub fn select(info: &FileInfo, destination_exists: bool) -> Self {
        if info.compression.is_some() {
            SaveStrategy::Compressed
        } else if info.keep_open && destination_exists {
            SaveStrategy::AtomicSwap
        } else {
            SaveStrategy::Direct
        }
    }
}

impl fmt::Display for SaveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveStrategy::Compressed => "compressed",
            SaveStrategy::AtomicSwap => "atomic-swap",
            SaveStrategy::Direct => "direct",
        };
        f.write_str(name)
    }
}
