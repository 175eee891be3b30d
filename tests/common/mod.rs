#![allow(dead_code)]

use std::path::PathBuf;

pub use hindsight_worker_test_utils::init_tracing;

/// The Chrome profile most tests resolve.
pub const CHROME_HINT: &str = r"C:\Users\Ryan\AppData\Local\Google\Chrome\User Data\Default";

/// The same profile as it appears inside an extracted collection.
pub const CHROME_DIR: &str = "C/Users/Ryan/AppData/Local/Google/Chrome/User Data/Default";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
