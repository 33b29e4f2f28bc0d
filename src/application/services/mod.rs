//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (DocumentSource, Clipboard)
//! but are themselves concrete structs, not traits.

mod session;

pub use session::{
    Flow, LoadingListener, SessionOptions, SessionService, Status, COPIED_MESSAGE,
    COPY_FAILED_MESSAGE, LOADING_MESSAGE, RELOADED_MESSAGE,
};
