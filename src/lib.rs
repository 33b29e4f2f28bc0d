//! theramatch: navigate a JSON decision tree from the terminal
//!
//! The document is a flat list of question and result nodes. A session walks
//! it from `startNodeId`, records every answer, and can go back, jump to any
//! breadcrumb, restart, reload the document and copy a plain-text summary.
//!
//! Layers, innermost first: [`domain`] (pure tree, navigation and view
//! model), [`application`] (session controller), [`infrastructure`] (I/O
//! traits and wiring), [`cli`] (argument parsing and rendering).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
