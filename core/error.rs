use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("TOML Serialization Error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("YAML Parsing/Serialization Error: {0}")]
    YamlError(#[from] serde_yml::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Glob Pattern Error: {0}")]
    Glob(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("TikToken Error: {0}")]
    TikToken(String),
}

impl AppError {
    /// True for the kinds that abort a run before traversal starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::TomlParse(_) | AppError::YamlError(_) | AppError::Glob(_)
        )
    }

    /// True for failures of the final report write.
    pub fn is_output_write(&self) -> bool {
        matches!(self, AppError::FileWrite { .. } | AppError::DirCreation { .. })
    }
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}

/// What the traversal was doing when a node failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOperation {
    List,
    Read,
}

impl fmt::Display for NodeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOperation::List => f.write_str("list directory"),
            NodeOperation::Read => f.write_str("read"),
        }
    }
}

/// A failure confined to a single directory or file.
///
/// Walkers never propagate this as a run-level error: it is rendered in place
/// of the node's children or contents and traversal moves on.
#[derive(Error, Debug)]
#[error("could not {operation} '{}': {source}", .path.display())]
pub struct NodeAccessError {
    pub path: PathBuf,
    pub operation: NodeOperation,
    #[source]
    pub source: std::io::Error,
}

impl NodeAccessError {
    pub fn new(path: impl Into<PathBuf>, operation: NodeOperation, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Base name of the failing node, falling back to the full path.
    pub fn node_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// The OS-level reason, without the path.
    pub fn reason(&self) -> String {
        self.source.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn node_error_reports_name_and_reason() {
        let err = NodeAccessError::new(
            "/tmp/project/secret",
            NodeOperation::List,
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );
        assert_eq!(err.node_name(), "secret");
        assert_eq!(err.reason(), "Permission denied");
        assert_eq!(
            err.to_string(),
            "could not list directory '/tmp/project/secret': Permission denied"
        );
    }

    #[test]
    fn error_kinds_are_classified() {
        assert!(AppError::Config("bad root".into()).is_configuration());
        assert!(AppError::Glob("bad".into()).is_configuration());
        let write = AppError::FileWrite {
            path: PathBuf::from("out.txt"),
            source: io::Error::other("disk full"),
        };
        assert!(write.is_output_write());
        assert!(!write.is_configuration());
    }
}
