//! Backend connectivity tracking.
//!
//! This module is the single source of truth for "is the backend
//! reachable". [`ConnectivityState`] is fed by the request layer after
//! every attempt and broadcasts edge-triggered transitions to
//! subscribers; [`ConnectivityObserver`] is the consumer-side handle UI
//! code holds onto.

pub mod observer;
pub mod state;

pub use observer::ConnectivityObserver;
pub use state::{
    ConnectivitySnapshot, ConnectivityState, Subscription, Transition, OFFLINE_LOG_INTERVAL,
};
