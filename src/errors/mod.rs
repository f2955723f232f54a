use crate::api::errors::ApiError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    IoError(std::io::Error),
    ApiError(ApiError),
    TomlError(toml::de::Error),
    TomlSerializeError(toml::ser::Error),
    JsonError(serde_json::Error),
    ZipError(zip::result::ZipError),
    WalkError(walkdir::Error),
    MissingPrompt,
    MissingApiKey,
    MissingErrorReport,
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::IoError(e) => write!(f, "IO error: {}", e),
            AppError::ApiError(e) => write!(f, "AI provider error: {}", e),
            AppError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            AppError::TomlSerializeError(e) => write!(f, "TOML serialization error: {}", e),
            AppError::JsonError(e) => write!(f, "JSON error: {}", e),
            AppError::ZipError(e) => write!(f, "Zip error: {}", e),
            AppError::WalkError(e) => write!(f, "Directory walk error: {}", e),
            AppError::MissingPrompt => write!(f, "Prompt is required"),
            AppError::MissingApiKey => write!(
                f,
                "API key is required (set it with `vibe model-config --set-api-key <key>`)"
            ),
            AppError::MissingErrorReport => {
                write!(f, "Either --error or a preview-error report is required")
            }
            AppError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::TomlError(err)
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::TomlSerializeError(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::ApiError(err)
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::ZipError(err)
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::WalkError(err)
    }
}
