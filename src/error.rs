//! Error types for loading scenes, parsing .bvh files and reading configuration.

use std::path::PathBuf;

/// Why a scene could not be loaded.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The path does not exist.
    #[error("scene file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The provider could not build a scene out of the file.
    #[error("failed to parse {}: {reason}", path.display())]
    ParseFailure { path: PathBuf, reason: String },

    /// Nothing was left to load after filtering the input paths.
    #[error("no loadable scene files in the input")]
    EmptyInput,
}

impl LoadError {
    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound { path } | Self::ParseFailure { path, .. } => Some(path),
            Self::EmptyInput => None,
        }
    }
}

/// Syntax errors of the .bvh reader. Line numbers are 1-based.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of file while reading the {0} section")]
    UnexpectedEof(&'static str),

    #[error("line {line}: expected a joint name after ROOT/JOINT")]
    MissingJointName { line: usize },

    #[error("line {line}: `{token}` is not a number")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: OFFSET needs 3 values, got {count}")]
    InvalidOffset { line: usize, count: usize },

    #[error("line {line}: unknown channel `{channel}`")]
    UnknownChannel { line: usize, channel: String },

    #[error("line {line}: `{token}` found outside of a joint")]
    OrphanStatement { line: usize, token: String },

    #[error("line {line}: unbalanced braces")]
    UnbalancedBraces { line: usize },

    #[error("the file does not declare a ROOT joint")]
    NoRoot,

    #[error("line {line}: motion frame has {actual} values, expected {expected}")]
    FrameLength {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: unexpected `{token}`")]
    Unexpected { line: usize, token: String },
}

impl ParseError {
    /// Wrap into the load error reported for `path`.
    pub fn into_load_error(self, path: impl Into<PathBuf>) -> LoadError {
        LoadError::ParseFailure {
            path: path.into(),
            reason: self.to_string(),
        }
    }
}

/// Failures reading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
