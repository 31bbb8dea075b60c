//! COURSES PROFILE SCRAPER
//!
//! Fetches user profile pages over a numeric ID range with a bounded pool of
//! concurrent tasks, parses each page into a [`profile::ProfileRecord`], and
//! appends the successful records to a CSV file.

mod error;
mod macros;
pub mod parse;
pub mod process;
pub mod profile;
pub mod request;
pub mod write;

pub use error::{Error, Result};

/// Host the profile pages live on.
pub const BASE_URL: &str = "https://courses.finki.ukim.mk";
/// Name of the platform's session cookie.
pub const SESSION_COOKIE: &str = "MoodleSession";
/// Output file, relative to the current working directory.
pub const CSV_PATH: &str = "data.csv";
/// A progress line is printed after every this many collected records.
pub const PROGRESS_CHUNK: usize = 150;
/// Attempts per request before a retryable status is given up on.
pub const MAX_ATTEMPTS: u32 = 5;
/// Backoff factor in seconds; waits grow as `BACKOFF_FACTOR * 2^(attempt-1)`.
pub const BACKOFF_FACTOR: u64 = 4;
