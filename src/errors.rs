// SPDX-License-Identifier: GPL-3.0-only

//! Application-level error types
//!
//! Backend and snapshot errors have their own enums next to their
//! modules; this is the umbrella the UI and CLI boundaries convert to.

use crate::backends::camera::types::BackendError;
use crate::pipelines::snapshot::SnapshotError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera backend errors (enumeration, pipeline, capture)
    Camera(BackendError),
    /// Snapshot errors (encoding, saving)
    Snapshot(SnapshotError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Snapshot(e) => write!(f, "Snapshot error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Camera(err)
    }
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        AppError::Snapshot(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<gstreamer::glib::Error> for AppError {
    fn from(err: gstreamer::glib::Error) -> Self {
        AppError::Camera(BackendError::InitializationFailed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_converts_to_camera_variant() {
        let err: AppError = BackendError::DeviceNotFound("gone".to_string()).into();
        assert!(matches!(err, AppError::Camera(_)));
        assert!(err.to_string().starts_with("Camera error:"));
    }

    #[test]
    fn test_snapshot_error_converts_to_snapshot_variant() {
        let err: AppError = SnapshotError::NoFrameAvailable.into();
        assert!(matches!(err, AppError::Snapshot(_)));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn test_str_message_passes_through_display() {
        let err: AppError = "No cameras found".into();
        assert_eq!(err.to_string(), "No cameras found");
    }
}
