//! Process-wide backend connectivity state.
//!
//! The request layer calls [`ConnectivityState::report`] after every
//! attempt; subscribers hear about edges only. Repeated identical
//! outcomes never re-emit a transition, so a sustained outage produces a
//! single offline event no matter how many requests fail during it.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

/// Minimum spacing between "backend is offline" log lines during a
/// sustained outage. Recovery is always logged immediately.
pub const OFFLINE_LOG_INTERVAL: Duration = Duration::from_secs(30);

/// Edge-triggered connectivity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State after the transition.
    pub is_online: bool,
    /// Whether the backend was offline before the transition.
    pub was_offline: bool,
}

/// Point-in-time view of the connectivity state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivitySnapshot {
    pub is_online: bool,
    pub last_transition_at: DateTime<Utc>,
}

type Listener = Arc<dyn Fn(Transition) + Send + Sync>;

struct ListenerEntry {
    id: u64,
    callback: Listener,
}

struct Flags {
    is_online: bool,
    last_transition_at: DateTime<Utc>,
    last_offline_log: Option<Instant>,
}

/// Single source of truth for backend reachability.
///
/// Starts optimistically online; only request outcomes move it. Intended
/// to be shared as an `Arc<ConnectivityState>` between the client and any
/// number of observers.
pub struct ConnectivityState {
    flags: Mutex<Flags>,
    listeners: Arc<Mutex<Vec<ListenerEntry>>>,
    next_id: AtomicU64,
}

impl ConnectivityState {
    /// Create a new state, initially online.
    pub fn new() -> Self {
        Self {
            flags: Mutex::new(Flags {
                is_online: true,
                last_transition_at: Utc::now(),
                last_offline_log: None,
            }),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Current reachability flag.
    pub fn is_online(&self) -> bool {
        self.flags.lock().unwrap().is_online
    }

    /// Current state with the time of the last transition.
    pub fn snapshot(&self) -> ConnectivitySnapshot {
        let flags = self.flags.lock().unwrap();
        ConnectivitySnapshot {
            is_online: flags.is_online,
            last_transition_at: flags.last_transition_at,
        }
    }

    /// Record the outcome of a request attempt.
    ///
    /// Flips the stored flag and notifies subscribers only when the
    /// outcome differs from the current state. Listeners run
    /// synchronously, in registration order, on the reporting task.
    pub fn report(&self, success: bool) {
        let transition = {
            let mut flags = self.flags.lock().unwrap();

            if !success {
                let due = flags
                    .last_offline_log
                    .map_or(true, |at| at.elapsed() >= OFFLINE_LOG_INTERVAL);
                if due {
                    tracing::warn!("backend is offline");
                    flags.last_offline_log = Some(Instant::now());
                }
            }

            if success == flags.is_online {
                None
            } else {
                let was_offline = !flags.is_online;
                flags.is_online = success;
                flags.last_transition_at = Utc::now();
                if success {
                    tracing::info!("backend is back online");
                    flags.last_offline_log = None;
                }
                Some(Transition {
                    is_online: success,
                    was_offline,
                })
            }
        };

        if let Some(transition) = transition {
            // Listener list is cloned out so callbacks run without the
            // lock held; a callback may subscribe or drop subscriptions.
            let callbacks: Vec<Listener> = self
                .listeners
                .lock()
                .unwrap()
                .iter()
                .map(|entry| entry.callback.clone())
                .collect();
            for callback in callbacks {
                (*callback)(transition);
            }
        }
    }

    /// Register a listener for transitions.
    ///
    /// The listener stays registered until the returned [`Subscription`]
    /// is dropped.
    pub fn subscribe(
        &self,
        listener: impl Fn(Transition) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().unwrap().push(ListenerEntry {
            id,
            callback: Arc::new(listener),
        });
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectivityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityState")
            .field("is_online", &self.is_online())
            .finish()
    }
}

/// Registration handle returned by [`ConnectivityState::subscribe`].
///
/// Dropping it unregisters the listener.
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Vec<ListenerEntry>>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut guard) = listeners.lock() {
                guard.retain(|entry| entry.id != self.id);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
