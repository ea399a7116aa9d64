use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid viewport {width}x{height}: both sides must be finite and greater than 1")]
    InvalidViewport { width: f64, height: f64 },

    #[error("Invalid interpolation breakpoints: {0}")]
    InvalidBreakpoints(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
