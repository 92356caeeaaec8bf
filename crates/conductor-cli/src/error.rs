use conductor_core::{ConfigurationError, CoreError, DispatchError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Dispatch(_) => 2,
            Self::Configuration(_) => 3,
            Self::Core(CoreError::Configuration(_)) => 3,
            Self::Core(_) => 10,
            Self::Logging(_) => 10,
            Self::Serialization(_) => 10,
            Self::Io(_) => 10,
        }
    }
}
