//! Core utilities shared across the pipeline
//!
//! - `cache`: File system locations and the time-boxed in-memory cache
//! - `http`: Rotated browser-like request headers

pub mod cache;
pub mod http;

// Re-export commonly used items for convenience
pub use cache::{default_db_path, default_dump_path, try_read_to_string, write_string, TtlCache};
pub use http::browser_headers;
