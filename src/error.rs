use thiserror::Error;

#[derive(Error, Debug)]
pub enum TruckflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not find a \"loads\" array in the input file.")]
    MissingLoads,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, TruckflowError>;
