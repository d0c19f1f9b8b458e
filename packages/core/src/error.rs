use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("pose frame has {actual} landmarks, expected at least {expected}")]
    FrameShape { expected: usize, actual: usize },
    #[error("unknown exercise: {0}")]
    UnknownExercise(String),
    #[error("cannot {action} while workout is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("invalid config: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
