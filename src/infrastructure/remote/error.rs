use crate::shared::error::AppError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteStoreError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote store responded {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<RemoteStoreError> for AppError {
    fn from(err: RemoteStoreError) -> Self {
        AppError::Network(err.to_string())
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteStoreError>;
