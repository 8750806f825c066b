// harmonic-batch-lib/tests/config.rs

//! Configuration layering through the public API.
//!
//! Kept in its own test binary because it mutates process environment.

use harmonic_batch_lib::{resolve_config, HarmonicError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_resolve_config_layers_file_and_environment() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[defaults]\nworkers = 30\nsearch_page_size = 20\n")
        .unwrap();
    temp_file.flush().unwrap();

    std::env::set_var("HB_CONFIG", temp_file.path());
    std::env::set_var("HB_WORKERS", "4");
    std::env::remove_var("HB_SEARCH_PAGE_SIZE");
    std::env::remove_var("HB_SAVED_SEARCH_PAGE_SIZE");

    let config = resolve_config().unwrap();
    assert_eq!(config.workers, 4); // environment beats file
    assert_eq!(config.search_page_size, 20); // file beats default
    assert_eq!(config.saved_search_page_size, 100); // default

    // An explicit config file that can't be loaded is an error
    std::env::set_var("HB_CONFIG", "/nonexistent/harmonic-batch.toml");
    let result = resolve_config();
    assert!(matches!(result, Err(HarmonicError::File { .. })));

    std::env::remove_var("HB_CONFIG");
    std::env::remove_var("HB_WORKERS");
}
