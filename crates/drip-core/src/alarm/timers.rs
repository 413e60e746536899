//! Alarm facility backed by tokio timers.
//!
//! Each pending alarm is a spawned task sleeping until its instant and then
//! handing the payload to a [`Notifier`]. Alarms live only as long as the
//! process; a restored session re-issues its future alarms on resume.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use jiff::Timestamp;
use log::debug;
use tokio::{runtime::Handle, task::JoinHandle};

use super::{AlarmFacility, Notifier};
use crate::{
    clock::Clock,
    error::{BrewError, Result, ResultExt},
};

/// Tokio-backed alarm facility.
pub struct TimerAlarms {
    runtime: Handle,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn Notifier>,
    permitted: bool,
    tasks: Mutex<HashMap<usize, JoinHandle<()>>>,
}

impl TimerAlarms {
    /// Creates a facility on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::Configuration` when called outside a runtime.
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn Notifier>) -> Result<Self> {
        let runtime = Handle::try_current().with_context("alarm timers need a tokio runtime")?;
        Ok(Self {
            runtime,
            clock,
            sink,
            permitted: true,
            tasks: Mutex::new(HashMap::new()),
        })
    }

    /// Grants or withholds permission to schedule alarms.
    ///
    /// A facility without permission refuses every request, which the engine
    /// treats as "no reminder for that step".
    pub fn with_permission(mut self, permitted: bool) -> Self {
        self.permitted = permitted;
        self
    }

    /// Keys whose alarm has not fired or been cancelled yet.
    pub fn pending_keys(&self) -> Vec<usize> {
        let mut keys: Vec<usize> = self
            .tasks()
            .iter()
            .filter(|(_, task)| !task.is_finished())
            .map(|(key, _)| *key)
            .collect();
        keys.sort_unstable();
        keys
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<usize, JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlarmFacility for TimerAlarms {
    fn schedule_once(&self, key: usize, fire_at: Timestamp, payload: &str) -> Result<()> {
        if !self.permitted {
            return Err(BrewError::PermissionDenied { key });
        }

        let until = fire_at.duration_since(self.clock.now());
        let delay = if until.is_negative() {
            Duration::ZERO
        } else {
            until.unsigned_abs()
        };

        let sink = Arc::clone(&self.sink);
        let payload = payload.to_string();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Alarm {key} fired");
            sink.notify_now(&payload);
        });

        if let Some(previous) = self.tasks().insert(key, task) {
            previous.abort();
        }
        Ok(())
    }

    fn cancel(&self, key: usize) {
        if let Some(task) = self.tasks().remove(&key) {
            task.abort();
        }
    }

    fn cancel_all(&self) {
        for (_, task) in self.tasks().drain() {
            task.abort();
        }
    }
}

impl Drop for TimerAlarms {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
