// src/resolve/hint.rs

//! Parsing of profile hints written in Windows path syntax.
//!
//! This is a pure string transform: it never consults the host filesystem or
//! `std::path`, so the same hint parses identically on every platform.

use crate::errors::{JobError, Result};

/// Segment at which the meaningful part of a hint starts.
const USERS_SEGMENT: &str = "users";

/// A validated, drive-rooted profile hint, e.g.
/// `C:\Users\Ryan\AppData\Local\Google\Chrome\User Data\Default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHint {
    raw: String,
    drive: char,
    segments: Vec<String>,
}

impl ProfileHint {
    /// Parse a hint. Either slash style is accepted, repeated separators and
    /// `.` segments are ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(JobError::Validation(
                "A browser profile path is required.".to_string(),
            ));
        }

        let Some(drive) = drive_letter(trimmed) else {
            return Err(JobError::Validation(format!(
                "Browser profile path must start with a drive letter (e.g., C:\\...); got '{trimmed}'."
            )));
        };

        let segments: Vec<String> = trimmed[2..]
            .split(['\\', '/'])
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(JobError::Validation(
                "Browser profile path is invalid or empty after drive removal.".to_string(),
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            drive,
            segments,
        })
    }

    /// The hint exactly as the user supplied it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn drive(&self) -> char {
        self.drive
    }

    /// All segments after the drive.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments used for matching: everything from the first `Users`
    /// segment (any case) onwards, or all segments when there is none.
    ///
    /// Collectors put varying prefixes in front of `Users` (archive name,
    /// host folder, a re-introduced drive folder); those are dropped here.
    pub fn search_segments(&self) -> &[String] {
        match self
            .segments
            .iter()
            .position(|s| s.eq_ignore_ascii_case(USERS_SEGMENT))
        {
            Some(idx) => &self.segments[idx..],
            None => &self.segments,
        }
    }

    /// Posix-style relative suffix, e.g. `Users/Ryan/AppData/...`.
    pub fn search_suffix(&self) -> String {
        self.search_segments().join("/")
    }
}

fn drive_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => Some(letter),
        _ => None,
    }
}
