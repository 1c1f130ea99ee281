//! Alert Cooldown Gatekeeper
//!
//! Decides, per DANGER verdict, whether a danger alert may be dispatched.
//! One global window; the read-check-update runs under a single lock so
//! concurrent verdicts can never both pass.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Timestamp of the last dispatched alert plus the window length.
/// `last_alert_at == None` means no alert has been sent yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CooldownState {
    pub last_alert_at: Option<DateTime<Utc>>,
    pub window_seconds: i64,
}

impl CooldownState {
    /// Negative windows are clamped to zero
    pub fn new(window_seconds: i64) -> Self {
        Self {
            last_alert_at: None,
            window_seconds: window_seconds.max(0),
        }
    }
}

/// ELIGIBLE when strictly more than `window_seconds` have passed since the
/// last alert (or none was ever sent). `last_alert_at` never moves backward.
pub fn on_danger(state: CooldownState, now: DateTime<Utc>) -> (bool, CooldownState) {
    let eligible = match state.last_alert_at {
        None => true,
        Some(last) => {
            // i128 so huge windows cannot overflow
            let elapsed_ms = i128::from((now - last).num_milliseconds());
            elapsed_ms > i128::from(state.window_seconds.max(0)) * 1000
        }
    };

    if eligible {
        let next = CooldownState {
            last_alert_at: Some(now),
            ..state
        };
        (true, next)
    } else {
        (false, state)
    }
}

/// Process-wide gate around the shared `CooldownState`
#[derive(Debug)]
pub struct AlertGate {
    state: Mutex<CooldownState>,
}

impl AlertGate {
    pub fn new(window_seconds: i64) -> Self {
        Self {
            state: Mutex::new(CooldownState::new(window_seconds)),
        }
    }

    /// Returns true if the caller should dispatch. The window is consumed
    /// immediately, whether or not the dispatch later succeeds.
    pub fn try_acquire(&self, now: DateTime<Utc>) -> bool {
        let mut state = self.state.lock();
        let (should_dispatch, next) = on_danger(*state, now);
        *state = next;
        should_dispatch
    }

    pub fn snapshot(&self) -> CooldownState {
        *self.state.lock()
    }
}
