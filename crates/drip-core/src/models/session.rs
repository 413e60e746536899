//! Runtime session record and its persisted snapshot.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::params::BrewParams;

/// The single in-progress (or idle) brew.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrewSession {
    /// When the brew was started; `None` while idle
    pub started_at: Option<Timestamp>,

    /// Most recent clock sample; `None` until the first tick after start or
    /// restore
    pub current_at: Option<Timestamp>,

    /// Whether the brew parameters should be read-only in the UI
    pub config_locked: bool,
}

impl BrewSession {
    /// A session that has just been started.
    pub fn started(at: Timestamp) -> Self {
        Self {
            started_at: Some(at),
            current_at: Some(at),
            config_locked: true,
        }
    }

    /// A session recovered from saved state; it has no clock sample yet.
    pub fn restored(started_at: Timestamp) -> Self {
        Self {
            started_at: Some(started_at),
            current_at: None,
            config_locked: true,
        }
    }

    /// Whether a brew is in progress.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether the session is running but has never been ticked.
    pub fn needs_tick(&self) -> bool {
        self.started_at.is_some() && self.current_at.is_none()
    }
}

/// UI state persisted across process restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Parameters the brew was configured with
    #[serde(flatten)]
    pub params: BrewParams,

    /// Start instant of the brew, if one was running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
}
