// src/api/errors.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("API returned an error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Response did not contain any text")]
    EmptyResponse,
}

impl ApiError {
    /// True when the provider rejected the model name itself.
    pub fn is_model_not_found(&self) -> bool {
        match self {
            ApiError::ApiError { status, message } => {
                *status == 404
                    || message.contains("model_not_found")
                    || message.to_lowercase().contains("model")
            }
            _ => false,
        }
    }
}
