use std::path::PathBuf;

/// A block name that does not match any [`crate::BlockType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type: {name:?}")]
pub struct ParseBlockError {
    pub name: String,
}

/// Errors from building a grid out of an ASCII picture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseGridError {
    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: u32, y: u32 },

    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid world size {width}x{height}: both dimensions must be non-zero")]
    EmptyWorld { width: u32, height: u32 },

    #[error("invalid {field}: {value} (must be greater than zero)")]
    ZeroRate { field: &'static str, value: u32 },

    #[error("invalid step tolerance {0}: must be in (0, 1]")]
    StepTolerance(f32),
}
