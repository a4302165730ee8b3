use thiserror::Error;

/// Failure reported by a real UI node backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("node {child} is not a child of node {parent}")]
    NotAChild { parent: String, child: String },

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Failure while loading a render configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
