use fitgoose_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid environment variable {name}: {reason}")]
    Env { name: &'static str, reason: String },
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
