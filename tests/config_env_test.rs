//! Environment variable overrides for Settings.
//!
//! Kept in its own test binary: it mutates the process environment.

use std::fs;

use tempfile::TempDir;

use treestore::config::{OutputFormat, Settings};

#[test]
fn given_env_vars_when_loading_then_they_override_config_files() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("local.toml");
    fs::write(&explicit, "format = \"table\"\nstrict = false\n").unwrap();

    std::env::set_var("TREESTORE_STRICT", "true");
    std::env::set_var("TREESTORE_FORMAT", "tree");
    let settings = Settings::load_from(None, Some(&explicit));
    std::env::remove_var("TREESTORE_STRICT");
    std::env::remove_var("TREESTORE_FORMAT");

    let settings = settings.unwrap();
    assert!(settings.strict);
    assert_eq!(settings.format, OutputFormat::Tree);
}
