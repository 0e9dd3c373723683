//! Consumer-side connectivity handle.

use std::sync::Arc;

use super::state::{ConnectivitySnapshot, ConnectivityState, Subscription, Transition};

/// Event-driven view of [`ConnectivityState`] for UI-layer code.
///
/// Holds a subscription for its whole lifetime: the callback fires on
/// every transition and never from polling. Dropping the observer
/// unsubscribes it.
pub struct ConnectivityObserver {
    state: Arc<ConnectivityState>,
    _subscription: Subscription,
}

impl ConnectivityObserver {
    /// Attach to a connectivity state with a transition callback.
    pub fn new(
        state: Arc<ConnectivityState>,
        on_transition: impl Fn(Transition) + Send + Sync + 'static,
    ) -> Self {
        let subscription = state.subscribe(on_transition);
        Self {
            state,
            _subscription: subscription,
        }
    }

    /// Current reachability flag.
    pub fn is_online(&self) -> bool {
        self.state.is_online()
    }

    /// Current state with the time of the last transition.
    pub fn snapshot(&self) -> ConnectivitySnapshot {
        self.state.snapshot()
    }
}

impl std::fmt::Debug for ConnectivityObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityObserver")
            .field("is_online", &self.is_online())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_observer_reflects_current_state() {
        let state = Arc::new(ConnectivityState::new());
        let observer = ConnectivityObserver::new(state.clone(), |_| {});

        assert!(observer.is_online());
        state.report(false);
        assert!(!observer.is_online());
    }

    #[test]
    fn test_observer_receives_transitions() {
        let state = Arc::new(ConnectivityState::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _observer = ConnectivityObserver::new(state.clone(), move |t| {
            sink.lock().unwrap().push(t);
        });

        state.report(false);
        state.report(false);
        state.report(true);

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(!events[0].is_online);
        assert!(events[1].is_online);
        assert!(events[1].was_offline);
    }

    #[test]
    fn test_dropping_observer_unsubscribes() {
        let state = Arc::new(ConnectivityState::new());
        let seen = Arc::new(Mutex::new(0u32));
        let sink = seen.clone();
        let observer = ConnectivityObserver::new(state.clone(), move |_| {
            *sink.lock().unwrap() += 1;
        });

        state.report(false);
        drop(observer);
        state.report(true);

        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
