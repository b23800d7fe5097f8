//! Ordering for realtime analysis loops
//!
//! A polling loop sends one request per video frame. Responses can arrive out
//! of order, so each request carries a [`FrameTicket`] and only the newest
//! ticket may publish its result. Starting a new frame supersedes every older
//! ticket still in flight. A gate built with a minimum interval also throttles
//! how often frames may start, so a per-display-frame callback does not flood
//! the backend.
//!
//! # Example
//!
//! ```
//! use affect_audio::realtime::FrameGate;
//!
//! let gate = FrameGate::new();
//! let older = gate.begin();
//! let newer = gate.begin();
//!
//! assert!(!older.is_current());
//! assert_eq!(gate.accept(&newer, "fresh"), Some("fresh"));
//! assert_eq!(gate.accept(&older, "stale"), None);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Default spacing between realtime frames
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// Hands out frame tickets and decides which results may be applied
#[derive(Debug, Clone, Default)]
pub struct FrameGate {
    inner: Arc<GateState>,
}

#[derive(Debug, Default)]
struct GateState {
    /// Latest issued generation
    issued: AtomicU64,
    /// Generation of the last applied result
    applied: AtomicU64,
    /// Minimum spacing enforced by `try_begin`
    min_interval: Duration,
    /// When `try_begin` last let a frame through
    last_started: Mutex<Option<Instant>>,
}

/// Identifies one in-flight frame request
#[derive(Debug, Clone)]
pub struct FrameTicket {
    generation: u64,
    state: Arc<GateState>,
}

impl FrameTicket {
    /// Generation number, increasing per frame
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a newer frame started or the gate was cancelled
    ///
    /// Callers can check this before sending to abort superseded work early.
    pub fn is_current(&self) -> bool {
        self.state.issued.load(Ordering::Acquire) == self.generation
    }
}

impl FrameGate {
    /// Create a gate with nothing in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gate that starts at most one frame per `min_interval`
    pub fn with_min_interval(min_interval: Duration) -> Self {
        Self {
            inner: Arc::new(GateState {
                min_interval,
                ..Default::default()
            }),
        }
    }

    /// Minimum spacing between frames started with [`try_begin`](Self::try_begin)
    pub fn min_interval(&self) -> Duration {
        self.inner.min_interval
    }

    /// Start a new frame unless the previous one started less than the
    /// minimum interval before `now`
    pub fn try_begin(&self, now: Instant) -> Option<FrameTicket> {
        {
            let mut last = self
                .inner
                .last_started
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(previous) = *last {
                if now.saturating_duration_since(previous) < self.inner.min_interval {
                    return None;
                }
            }
            *last = Some(now);
        }
        Some(self.begin())
    }

    /// Start a new frame, superseding all older tickets
    ///
    /// Ignores the minimum interval.
    pub fn begin(&self) -> FrameTicket {
        let generation = self.inner.issued.fetch_add(1, Ordering::AcqRel) + 1;
        FrameTicket {
            generation,
            state: Arc::clone(&self.inner),
        }
    }

    /// Supersede everything in flight without starting a frame
    pub fn cancel(&self) {
        self.inner.issued.fetch_add(1, Ordering::AcqRel);
        log::debug!("Realtime loop cancelled");
    }

    /// Latest issued generation
    pub fn latest(&self) -> u64 {
        self.inner.issued.load(Ordering::Acquire)
    }

    /// Let `value` through only if `ticket` is still the newest frame
    ///
    /// A result is also dropped if a result from a newer generation was
    /// already applied.
    pub fn accept<T>(&self, ticket: &FrameTicket, value: T) -> Option<T> {
        if !Arc::ptr_eq(&self.inner, &ticket.state) || !ticket.is_current() {
            log::debug!("Dropping stale frame result #{}", ticket.generation);
            return None;
        }
        let previous = self.inner.applied.fetch_max(ticket.generation, Ordering::AcqRel);
        if previous >= ticket.generation {
            return None;
        }
        Some(value)
    }
}
