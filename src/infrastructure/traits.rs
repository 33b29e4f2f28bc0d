//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing the session
//! controller to be tested with mock implementations.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use tracing::debug;

/// Where decision-tree documents come from.
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw document text at `location` (file path or URL).
    fn fetch(&self, location: &str) -> io::Result<String>;
}

/// System clipboard abstraction.
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// Item for FZF-style selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Display text shown in selector
    pub display: String,
    /// Actual value (e.g., action index)
    pub value: String,
}

/// Interactive FZF-style selector abstraction.
pub trait Selector: Send + Sync {
    /// Present items to user and return selected one.
    /// Returns None if user cancels (Esc/Ctrl-C).
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String>;
}

/// True for `http://` and `https://` locations.
pub fn is_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Reads documents from the local filesystem.
#[derive(Debug, Default)]
pub struct FileSource;

impl DocumentSource for FileSource {
    fn fetch(&self, location: &str) -> io::Result<String> {
        std::fs::read_to_string(location)
    }
}

/// Fetches documents over HTTP(S), bypassing caches.
#[derive(Debug)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> io::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(http_error)?;
        Ok(Self { client })
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, location: &str) -> io::Result<String> {
        debug!("GET {}", location);
        let response = self
            .client
            .get(location)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("HTTP status {}", status),
            ));
        }
        response.text().map_err(http_error)
    }
}

fn http_error(e: reqwest::Error) -> io::Error {
    let kind = if e.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    io::Error::new(kind, e)
}

/// Dispatches to [`HttpSource`] for URLs and [`FileSource`] otherwise.
#[derive(Debug)]
pub struct AnySource {
    file: FileSource,
    http: HttpSource,
}

impl AnySource {
    pub fn new(http_timeout: Duration) -> io::Result<Self> {
        Ok(Self {
            file: FileSource,
            http: HttpSource::new(http_timeout)?,
        })
    }
}

impl DocumentSource for AnySource {
    fn fetch(&self, location: &str) -> io::Result<String> {
        if is_url(location) {
            self.http.fetch(location)
        } else {
            self.file.fetch(location)
        }
    }
}

/// Real clipboard implementation using arboard.
///
/// The handle is kept alive after writing: on X11 the contents are only
/// served while it exists.
#[derive(Default)]
pub struct SystemClipboard {
    #[cfg(feature = "clipboard")]
    handle: std::sync::Mutex<Option<arboard::Clipboard>>,
}

impl Clipboard for SystemClipboard {
    #[cfg(feature = "clipboard")]
    fn write_text(&self, text: &str) -> Result<(), String> {
        let mut guard = self
            .handle
            .lock()
            .map_err(|_| "clipboard lock poisoned".to_string())?;
        if guard.is_none() {
            *guard = Some(arboard::Clipboard::new().map_err(|e| e.to_string())?);
        }
        match guard.as_mut() {
            Some(clipboard) => clipboard.set_text(text).map_err(|e| e.to_string()),
            None => Err("clipboard not available".to_string()),
        }
    }

    #[cfg(not(feature = "clipboard"))]
    fn write_text(&self, _text: &str) -> Result<(), String> {
        Err("built without clipboard support".to_string())
    }
}

/// Real selector implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimSelector;

impl Selector for SkimSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(None);
        }

        let input = skim_rows(items);

        let options = SkimOptionsBuilder::default()
            .prompt(Some(prompt))
            .height(Some("50%"))
            .multi(false)
            .build()
            .map_err(|e| format!("failed to build skim options: {e}"))?;

        let item_reader = SkimItemReader::default();
        let items_arc = item_reader.of_bufread(Cursor::new(input));

        let output = Skim::run_with(&options, Some(items_arc));

        match output {
            Some(out) if out.is_abort => Ok(None),
            Some(out) => Ok(out
                .selected_items
                .first()
                .and_then(|selected| item_for_row(items, &selected.output()))),
            None => Ok(None),
        }
    }
}

/// One skim row per item, `"<n>. <display>"` with `n` 1-based.
///
/// The number keeps equal labels apart; newlines are flattened so an item
/// never spans two rows.
fn skim_rows(items: &[SelectionItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.display.replace(['\r', '\n'], " ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map a row produced by [`skim_rows`] back to its item.
fn item_for_row(items: &[SelectionItem], row: &str) -> Option<SelectionItem> {
    let (number, _) = row.split_once(". ")?;
    let n: usize = number.trim().parse().ok()?;
    n.checked_sub(1).and_then(|i| items.get(i)).cloned()
}

/// Numbered-menu selector on stdin/stdout, for terminals without skim.
#[derive(Debug, Default)]
pub struct PromptSelector;

impl PromptSelector {
    /// Print a numbered menu to `out` and read one choice from `input`.
    ///
    /// Accepts a 1-based number; `q` or end of input cancels. Anything else
    /// re-prompts.
    pub fn select_from<R: BufRead, W: Write>(
        items: &[SelectionItem],
        prompt: &str,
        input: &mut R,
        out: &mut W,
    ) -> Result<Option<SelectionItem>, String> {
        if items.is_empty() {
            return Ok(None);
        }
        let io_err = |e: io::Error| e.to_string();

        for (i, item) in items.iter().enumerate() {
            writeln!(out, "  {:>2}) {}", i + 1, item.display).map_err(io_err)?;
        }

        loop {
            write!(out, "{} ", prompt).map_err(io_err)?;
            out.flush().map_err(io_err)?;

            let mut line = String::new();
            if input.read_line(&mut line).map_err(io_err)? == 0 {
                return Ok(None);
            }
            let choice = line.trim();
            if choice.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match choice.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(items[n - 1].clone())),
                _ => writeln!(out, "Enter a number between 1 and {}.", items.len())
                    .map_err(io_err)?,
            }
        }
    }
}

impl Selector for PromptSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        Self::select_from(items, prompt, &mut stdin.lock(), &mut stdout.lock())
    }
}
