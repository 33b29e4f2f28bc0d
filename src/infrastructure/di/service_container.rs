//! Service container for dependency injection
//!
//! Wires the session controller to its I/O boundaries.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{SessionOptions, SessionService};
use crate::config::{expand_location, SelectorKind, Settings};
use crate::infrastructure::traits::{
    AnySource, Clipboard, DocumentSource, PromptSelector, Selector, SkimSelector,
    SystemClipboard,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding the configured I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Document fetch (file or HTTP)
    pub source: Arc<dyn DocumentSource>,

    /// System clipboard
    pub clipboard: Arc<dyn Clipboard>,

    /// Interactive selector for `walk`
    pub selector: Arc<dyn Selector>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let source = AnySource::new(Duration::from_secs(settings.http_timeout_secs))
            .map_err(|e| InfraError::io("create HTTP client", e))?;
        let selector: Arc<dyn Selector> = match settings.selector {
            SelectorKind::Skim => Arc::new(SkimSelector),
            SelectorKind::Prompt => Arc::new(PromptSelector),
        };

        Ok(Self::with_deps(
            settings,
            Arc::new(source),
            Arc::new(SystemClipboard::default()),
            selector,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        source: Arc<dyn DocumentSource>,
        clipboard: Arc<dyn Clipboard>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            source,
            clipboard,
            selector,
        }
    }

    /// New, not yet loaded session for `location` (default: configured source).
    pub fn session(&self, location: Option<&str>) -> SessionService {
        let location = location
            .map(expand_location)
            .unwrap_or_else(|| self.settings.source.clone());

        SessionService::new(
            Arc::clone(&self.source),
            Arc::clone(&self.clipboard),
            SessionOptions {
                location,
                duplicate_ids: self.settings.duplicate_ids,
                summary_header: self.settings.summary_header.clone(),
            },
        )
    }
}
