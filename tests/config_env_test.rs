//! Environment layer of Settings loading.
//!
//! Kept in its own test binary: the variables are process-wide and would leak
//! into the file-layer tests in config_test.rs, which expect defaults.

use std::env;
use std::fs;

use tempfile::TempDir;

use theramatch::config::{SelectorKind, Settings};
use theramatch::domain::DuplicateIdPolicy;

const VARS: [(&str, &str); 4] = [
    ("THERAMATCH_SOURCE", "/srv/trees/from_env.json"),
    ("THERAMATCH_HTTP_TIMEOUT_SECS", "7"),
    ("THERAMATCH_DUPLICATE_IDS", "reject"),
    ("THERAMATCH_SELECTOR", "prompt"),
];

#[test]
fn given_single_underscore_env_vars_when_loading_then_override_files() {
    let dir = TempDir::new().unwrap();
    let local = dir.path().join("local.toml");
    fs::write(
        &local,
        r#"
source = "/srv/trees/local.json"
http_timeout_secs = 5
summary_header = "From file"
"#,
    )
    .unwrap();
    for (key, value) in VARS {
        env::set_var(key, value);
    }

    let settings = Settings::load_from(None, Some(&local));

    for (key, _) in VARS {
        env::remove_var(key);
    }
    let settings = settings.expect("load settings");
    assert_eq!(settings.source, "/srv/trees/from_env.json");
    assert_eq!(settings.http_timeout_secs, 7);
    assert_eq!(settings.duplicate_ids, DuplicateIdPolicy::Reject);
    assert_eq!(settings.selector, SelectorKind::Prompt);
    // not set in the environment, so the file value stays
    assert_eq!(settings.summary_header, "From file");
}
