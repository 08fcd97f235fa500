//! Suspension points of the wave task.
//!
//! The wave task is resumed once per tick. While it holds a [`Wait`] it only
//! polls it; a dropped wait is never polled again, which is how the task is
//! cancelled.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Resume on the next tick.
    NextTick { issued_at: u32 },
    /// Resume once the frame counter reaches `until`.
    Frames { until: u32 },
    /// Re-check a condition every `interval` frames until it holds or
    /// `deadline` is reached.
    Until {
        next_poll: u32,
        interval: u32,
        deadline: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Pending,
    Ready,
    TimedOut,
}

impl Wait {
    pub fn next_tick(now: u32) -> Self {
        Wait::NextTick { issued_at: now }
    }

    pub fn frames(now: u32, delay: u32) -> Self {
        Wait::Frames {
            until: now.saturating_add(delay),
        }
    }

    /// The first check happens one interval from now, not immediately.
    pub fn until(now: u32, interval: u32, timeout: u32) -> Self {
        Wait::Until {
            next_poll: now.saturating_add(interval.max(1)),
            interval: interval.max(1),
            deadline: now.saturating_add(timeout),
        }
    }

    pub fn poll(&mut self, now: u32, satisfied: impl FnOnce() -> bool) -> Poll {
        match self {
            Wait::NextTick { issued_at } => {
                if now > *issued_at {
                    Poll::Ready
                } else {
                    Poll::Pending
                }
            }
            Wait::Frames { until } => {
                if now >= *until {
                    Poll::Ready
                } else {
                    Poll::Pending
                }
            }
            Wait::Until {
                next_poll,
                interval,
                deadline,
            } => {
                let expired = now >= *deadline;
                if now < *next_poll && !expired {
                    return Poll::Pending;
                }
                if satisfied() {
                    return Poll::Ready;
                }
                if expired {
                    return Poll::TimedOut;
                }
                *next_poll = now.saturating_add(*interval);
                Poll::Pending
            }
        }
    }
}
