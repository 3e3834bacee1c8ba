//! User-facing notices emitted by garden operations.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::NOTICE_DURATION_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toast-style message for the UI shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration_ms: u64,
}

impl Notice {
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration_ms: NOTICE_DURATION_MS,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

// Message catalogue
pub const MSG_BANK_FULL: &str = "Seed bank is full! Reward discarded.";
pub const MSG_NOT_STARTED: &str = "Please start the plant growth first!";
pub const MSG_TOO_EARLY: &str = "Plant needs more time to grow!";
pub const MSG_ALREADY_HARVESTED: &str = "This plant has already been harvested!";
pub const MSG_BONUS_SEED: &str = "Received bonus seed to keep growing!";
pub const MSG_PLANT_REMOVED: &str = "Plant removed";
pub const MSG_NOTHING_TO_CLEAR: &str = "No harvested plants to clear";
pub const MSG_NO_SEEDS: &str = "No seeds available!";
pub const MSG_EMPTY_TITLE: &str = "Please enter a task title";
pub const MSG_PLANTED: &str = "Task planted!";
pub const MSG_GROWTH_STARTED: &str = "Plant growth started! 🌱";
pub const MSG_RESET: &str = "Game reset!";

#[must_use]
pub fn harvested_message(species_name: &str) -> String {
    format!("Harvested {species_name}!")
}

#[must_use]
pub fn cleared_message(count: usize) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("Cleared {count} harvested plant{plural}")
}
