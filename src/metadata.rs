// src/metadata.rs

//! Task registration metadata, printed by `--describe`.

use serde::Serialize;

/// Name the task is registered and routed under.
pub const TASK_NAME: &str = "openrelik-worker-hindsight.tasks.hindsight";

pub const DISPLAY_NAME: &str = "Hindsight Parser";

pub const DESCRIPTION: &str = "Parses browser artifacts with Hindsight from a supplied ZIP archive \
(Native Kape or Velociraptor triage) and a provided profile browser path";

#[derive(Debug, Clone, Serialize)]
pub struct TaskMetadata {
    pub task_name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub task_config: Vec<TaskOption>,
}

/// One user-settable option in `[task_config]`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOption {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
}

pub fn task_metadata() -> TaskMetadata {
    TaskMetadata {
        task_name: TASK_NAME,
        display_name: DISPLAY_NAME,
        description: DESCRIPTION,
        task_config: vec![
            TaskOption {
                name: "archive_password",
                label: "Archive password",
                description: "Password to decrypt the input ZIP archive if protected.",
                kind: "text",
                required: false,
            },
            TaskOption {
                name: "browser_profile",
                label: "Browser profile (Default Folder) to parse",
                description: "Insert an exact browser profile default folder to parse \
(e.g., C:\\Users\\Ryan\\AppData\\Local\\Google\\Chrome\\User Data\\Default), \
matching is case sensitive. Don't leave blank.",
                kind: "text",
                required: true,
            },
        ],
    }
}
