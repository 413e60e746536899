//! In-memory alarm facility and notifier.
//!
//! Both record what they are asked to do so tests can assert on it without
//! waiting on a real clock. [`MemoryAlarms::fire_due`] plays the role of the
//! operating system delivering alarms once their instant has passed.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use jiff::Timestamp;

use super::{AlarmFacility, Notifier};
use crate::error::{BrewError, Result};

/// An alarm waiting to fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAlarm {
    pub key: usize,
    pub fire_at: Timestamp,
    pub payload: String,
}

/// Alarm facility that keeps pending alarms in a map.
#[derive(Debug, Default)]
pub struct MemoryAlarms {
    pending: Mutex<BTreeMap<usize, PendingAlarm>>,
    requests: Mutex<Vec<usize>>,
    denied: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryAlarms {
    /// A facility that refuses every request, like a device without the
    /// exact-alarm permission.
    pub fn denying() -> Self {
        let alarms = Self::default();
        alarms.set_denied(true);
        alarms
    }

    /// Grants or revokes permission for later requests.
    pub fn set_denied(&self, denied: bool) {
        self.denied.store(denied, Ordering::SeqCst);
    }

    /// Pending alarms ordered by key.
    pub fn pending(&self) -> Vec<PendingAlarm> {
        lock(&self.pending).values().cloned().collect()
    }

    /// Pending alarm for `key`.
    pub fn get(&self, key: usize) -> Option<PendingAlarm> {
        lock(&self.pending).get(&key).cloned()
    }

    /// Keys of every schedule request, including refused ones, in call order.
    pub fn requests(&self) -> Vec<usize> {
        lock(&self.requests).clone()
    }

    /// Forgets the request log.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Removes and returns the alarms whose instant is at or before `now`.
    pub fn fire_due(&self, now: Timestamp) -> Vec<PendingAlarm> {
        let mut pending = lock(&self.pending);
        let due: Vec<usize> = pending
            .values()
            .filter(|alarm| alarm.fire_at <= now)
            .map(|alarm| alarm.key)
            .collect();
        due.into_iter()
            .filter_map(|key| pending.remove(&key))
            .collect()
    }
}

impl AlarmFacility for MemoryAlarms {
    fn schedule_once(&self, key: usize, fire_at: Timestamp, payload: &str) -> Result<()> {
        lock(&self.requests).push(key);
        if self.denied.load(Ordering::SeqCst) {
            return Err(BrewError::PermissionDenied { key });
        }
        lock(&self.pending).insert(
            key,
            PendingAlarm {
                key,
                fire_at,
                payload: payload.to_string(),
            },
        );
        Ok(())
    }

    fn cancel(&self, key: usize) {
        lock(&self.pending).remove(&key);
    }

    fn cancel_all(&self) {
        lock(&self.pending).clear();
    }
}

/// Notifier that collects messages.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    /// Every message shown so far.
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    /// Returns and forgets the messages shown so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.messages))
    }
}

impl Notifier for MemoryNotifier {
    fn notify_now(&self, payload: &str) {
        lock(&self.messages).push(payload.to_string());
    }
}
