//! Recording configuration types

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// TIFF compression methods for recorded depth maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    #[default]
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

impl FromStr for TiffCompression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(TiffCompression::None),
            "lzw" => Ok(TiffCompression::Lzw),
            "deflate-fast" | "deflate" => Ok(TiffCompression::DeflateFast),
            "deflate-balanced" => Ok(TiffCompression::DeflateBalanced),
            "deflate-best" => Ok(TiffCompression::DeflateBest),
            other => Err(format!(
                "unknown TIFF compression '{}', expected none, lzw, deflate-fast, deflate-balanced or deflate-best",
                other
            )),
        }
    }
}

impl fmt::Display for TiffCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TiffCompression::None => "none",
            TiffCompression::Lzw => "lzw",
            TiffCompression::DeflateFast => "deflate-fast",
            TiffCompression::DeflateBalanced => "deflate-balanced",
            TiffCompression::DeflateBest => "deflate-best",
        })
    }
}

/// When the recorder writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordMode {
    /// Only when the user asks for a snapshot
    #[default]
    SnapshotOnly,
    EveryFrame,
}

impl RecordMode {
    pub fn should_record(self, snapshot_requested: bool) -> bool {
        match self {
            RecordMode::SnapshotOnly => snapshot_requested,
            RecordMode::EveryFrame => true,
        }
    }
}

/// Where and how a session records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConfig {
    pub dir: PathBuf,
    pub mode: RecordMode,
    pub compression: TiffCompression,
}

impl RecordConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            mode: RecordMode::default(),
            compression: TiffCompression::default(),
        }
    }

    pub fn mode(mut self, mode: RecordMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = compression;
        self
    }
}
