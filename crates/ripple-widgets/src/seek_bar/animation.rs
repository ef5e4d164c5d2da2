//! Frame scheduling and easing for the seek bar morph
//!
//! Animations are chains of per-frame steps. Each step may request exactly one
//! successor for the next frame. The scheduler holds at most one pending step:
//! requesting a new one cancels whatever was pending, so two chains can never
//! drive the same state on the same frame.

use std::time::{Duration, Instant};

/// Ease the morph multiplier
///
/// While hovering the bars collapse on a cubic; otherwise they grow along a
/// bezier with an overshooting first control point.
pub fn ease(t: f32, hovering: bool) -> f32 {
    if hovering {
        t * t * t
    } else {
        let u = 1.0 - t;
        3.0 * t * u * u * 1.8 + 3.0 * t * t * u * 0.7 + t * t * t
    }
}

/// Identifies one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

#[derive(Debug)]
struct Pending<T> {
    token: FrameToken,
    task: T,
}

/// Single-active-task frame scheduler
#[derive(Debug)]
pub struct FrameScheduler<T> {
    pending: Option<Pending<T>>,
    next_token: u64,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            pending: None,
            next_token: 1,
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` on the next frame, cancelling any pending task
    pub fn request(&mut self, task: T) -> FrameToken {
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(Pending { token, task });
        token
    }

    /// Cancel the pending task, if any
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether `token` is the request that will run next
    pub fn is_current(&self, token: FrameToken) -> bool {
        self.pending.as_ref().is_some_and(|p| p.token == token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the task due on this frame
    pub fn take(&mut self) -> Option<(FrameToken, T)> {
        self.pending.take().map(|p| (p.token, p.task))
    }
}

/// One-shot deadline, re-armed on every restart
#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    due: Option<Instant>,
}

impl Timer {
    /// (Re)start the timer; an earlier deadline is discarded
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.due = Some(now + delay);
    }

    pub fn disarm(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Fire once if the deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
