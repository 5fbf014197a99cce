//! Low-level file utilities shared by the vrc-bind crates.
//!
//! Persisted state is always rewritten wholesale, so every writer goes through
//! the temp-file + rename helpers here.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::{write_json_pretty_atomic, write_text_atomic};
pub use time_utils::current_unix_timestamp_ms;
