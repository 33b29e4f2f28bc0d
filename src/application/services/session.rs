//! Session controller
//!
//! Owns the loaded tree, the navigation state and the status line. Front-ends
//! never touch these directly: they render [`SessionService::view`] and feed
//! user input back through [`SessionService::apply`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    build_summary_text, render, Action, Breadcrumb, DuplicateIdPolicy, Navigator, Node,
    TreeStore, View, DEFAULT_SUMMARY_HEADER,
};
use crate::infrastructure::traits::{Clipboard, DocumentSource};

pub const LOADING_MESSAGE: &str = "Loading decision tree …";
pub const RELOADED_MESSAGE: &str = "Decision tree reloaded.";
pub const COPIED_MESSAGE: &str = "Summary copied.";
pub const COPY_FAILED_MESSAGE: &str = "Copy not possible (clipboard permission).";

/// Transient status line shown below the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Info(String),
    Error(String),
}

impl Status {
    pub fn message(&self) -> Option<&str> {
        match self {
            Status::Idle => None,
            Status::Loading => Some(LOADING_MESSAGE),
            Status::Info(m) | Status::Error(m) => Some(m),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

/// Whether the front-end should keep going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// File path or http(s) URL of the document
    pub location: String,
    pub duplicate_ids: DuplicateIdPolicy,
    pub summary_header: String,
}

impl SessionOptions {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            duplicate_ids: DuplicateIdPolicy::default(),
            summary_header: DEFAULT_SUMMARY_HEADER.to_string(),
        }
    }
}

#[derive(Debug)]
struct Loaded {
    store: TreeStore,
    navigator: Navigator,
}

/// Called with the location right before a blocking fetch.
pub type LoadingListener = Box<dyn Fn(&str) + Send + Sync>;

/// Single owner of all mutable session state.
pub struct SessionService {
    source: Arc<dyn DocumentSource>,
    clipboard: Arc<dyn Clipboard>,
    options: SessionOptions,
    loaded: Option<Loaded>,
    status: Status,
    on_loading: Option<LoadingListener>,
}

impl SessionService {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        clipboard: Arc<dyn Clipboard>,
        options: SessionOptions,
    ) -> Self {
        Self {
            source,
            clipboard,
            options,
            loaded: None,
            status: Status::Idle,
            on_loading: None,
        }
    }

    /// Call `listener` with the location before every fetch, so a front-end
    /// can show [`Status::Loading`] while [`load`](Self::load) blocks.
    pub fn on_loading(mut self, listener: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_loading = Some(Box::new(listener));
        self
    }

    pub fn location(&self) -> &str {
        &self.options.location
    }

    /// Fetch and index the document, then reset navigation to the start node.
    ///
    /// On failure the previously loaded tree and its navigation state stay in
    /// place and the error is also put on the status line.
    pub fn load(&mut self) -> ApplicationResult<()> {
        info!("load: {}", self.options.location);
        self.status = Status::Loading;
        if let Some(listener) = &self.on_loading {
            listener(&self.options.location);
        }

        match self.fetch_store() {
            Ok(store) => {
                debug!(
                    "load: {} nodes, start={}",
                    store.len(),
                    store.start_node_id()
                );
                let navigator = Navigator::new(&store);
                self.loaded = Some(Loaded { store, navigator });
                self.status = Status::Idle;
                Ok(())
            }
            Err(e) => {
                warn!("load failed: {}", e);
                self.status = Status::Error(e.to_string());
                Err(e)
            }
        }
    }

    fn fetch_store(&self) -> ApplicationResult<TreeStore> {
        let location = &self.options.location;
        let content = self.source.fetch(location).with_fetch_context(location)?;
        Ok(TreeStore::from_json(&content, self.options.duplicate_ids)?)
    }

    /// [`load`](Self::load) again, reporting success on the status line.
    pub fn reload(&mut self) -> ApplicationResult<()> {
        self.load()?;
        self.status = Status::Info(RELOADED_MESSAGE.to_string());
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    fn loaded(&self) -> ApplicationResult<&Loaded> {
        self.loaded.as_ref().ok_or(ApplicationError::NotLoaded)
    }

    fn loaded_mut(&mut self) -> ApplicationResult<&mut Loaded> {
        self.loaded.as_mut().ok_or(ApplicationError::NotLoaded)
    }

    pub fn store(&self) -> ApplicationResult<&TreeStore> {
        Ok(&self.loaded()?.store)
    }

    pub fn navigator(&self) -> ApplicationResult<&Navigator> {
        Ok(&self.loaded()?.navigator)
    }

    pub fn current_node(&self) -> ApplicationResult<&Node> {
        let Loaded { store, navigator } = self.loaded()?;
        Ok(navigator.current_node(store)?)
    }

    pub fn view(&self) -> ApplicationResult<View> {
        let Loaded { store, navigator } = self.loaded()?;
        Ok(render(store, navigator))
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Return the status line and clear it.
    pub fn take_status(&mut self) -> Status {
        std::mem::take(&mut self.status)
    }

    pub fn select_answer(&mut self, index: usize) -> ApplicationResult<()> {
        let Loaded { store, navigator } = self.loaded_mut()?;
        navigator.select_answer(store, index)?;
        Ok(())
    }

    pub fn select_answer_by_label(&mut self, label: &str) -> ApplicationResult<()> {
        let Loaded { store, navigator } = self.loaded_mut()?;
        navigator.select_answer_by_label(store, label)?;
        Ok(())
    }

    pub fn go_back(&mut self) -> ApplicationResult<bool> {
        Ok(self.loaded_mut()?.navigator.go_back())
    }

    pub fn jump_to_breadcrumb(&mut self, crumb: Breadcrumb) -> ApplicationResult<()> {
        self.loaded_mut()?.navigator.jump_to_breadcrumb(crumb)?;
        Ok(())
    }

    pub fn restart(&mut self) -> ApplicationResult<()> {
        self.loaded_mut()?.navigator.restart();
        Ok(())
    }

    pub fn summary_text(&self) -> ApplicationResult<String> {
        let Loaded { store, navigator } = self.loaded()?;
        Ok(build_summary_text(
            &self.options.summary_header,
            store,
            navigator,
        )?)
    }

    /// Copy the transcript to the clipboard.
    ///
    /// Never fails: the outcome goes to the status line and navigation is
    /// left untouched. Returns whether the text was copied.
    pub fn copy_summary(&mut self) -> bool {
        let outcome = self.summary_text().and_then(|text| {
            self.clipboard
                .write_text(&text)
                .map_err(ApplicationError::ClipboardDenied)
        });

        match outcome {
            Ok(()) => {
                self.status = Status::Info(COPIED_MESSAGE.to_string());
                true
            }
            Err(ApplicationError::ClipboardDenied(reason)) => {
                warn!("copy summary: clipboard denied: {}", reason);
                self.status = Status::Error(COPY_FAILED_MESSAGE.to_string());
                false
            }
            Err(e) => {
                warn!("copy summary: {}", e);
                self.status = Status::Error(e.to_string());
                false
            }
        }
    }

    /// Route one user action to the navigator.
    pub fn apply(&mut self, action: Action) -> ApplicationResult<Flow> {
        debug!("apply: {:?}", action);
        match action {
            Action::Answer(index) => self.select_answer(index)?,
            Action::Breadcrumb(crumb) => self.jump_to_breadcrumb(crumb)?,
            Action::Back => {
                self.go_back()?;
            }
            Action::Restart => self.restart()?,
            Action::Reload => {
                // failure is already on the status line; keep the old tree
                if let Err(e) = self.reload() {
                    debug!("reload kept previous tree: {}", e);
                }
            }
            Action::CopySummary => {
                self.copy_summary();
            }
            Action::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
