//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `notex_core` linkage without the Flutter/FFI runtime.
//! - Optionally summarize the document stored in a given database file.
//!
//! Usage: `notex_cli [DB_PATH]`

use notex_core::{DocumentStorage, KeyValuePersistence, SqliteKeyValueStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("notex_core ping={}", notex_core::ping());
    println!("notex_core version={}", notex_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match SqliteKeyValueStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let document = KeyValuePersistence::new(store).load();
    println!(
        "notex_core sections={} links={} missing_titles={}",
        document.len(),
        document.link_count(),
        notex_core::missing_title_indices(&document).len()
    );
    ExitCode::SUCCESS
}
