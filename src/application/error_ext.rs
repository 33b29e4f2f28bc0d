//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with location context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// std::fs::write(&path, Settings::template())
    ///     .with_path_context("write config", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Mark a failed document fetch as a network error for `location`.
    fn with_fetch_context(self, location: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }

    fn with_fetch_context(self, location: &str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Network {
            location: location.to_string(),
            source,
        })
    }
}
