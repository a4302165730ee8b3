use crate::error::{BackendError, ConfigError};

/// Result of a backend mutation
pub type BackendResult<T> = Result<T, BackendError>;

/// Result of loading configuration
pub type ConfigResult<T> = Result<T, ConfigError>;
