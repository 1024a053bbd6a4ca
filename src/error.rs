use thiserror::Error;

#[derive(Error, Debug)]
pub enum AncError {
    #[error("Filter length must be at least 1, got {0}")]
    InvalidFilterLength(usize),

    #[error("Step size must be positive and finite, got {0}")]
    InvalidStepSize(f32),

    #[error("Block size must be at least 1")]
    InvalidBlockSize,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AncError>;
