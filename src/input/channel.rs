//! Event channel between the encoder sampler and the logic loop.
//!
//! This is the only state the two cores share. Every access goes through
//! a critical-section mutex and holds it just long enough to accumulate or
//! to read-and-clear.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::EncoderEvent;
use crate::config::DEFAULT_DELTA_CAP;

#[derive(Clone, Copy)]
struct Pending {
    steps: i32,
    clicked: bool,
    cap: i32,
    /// Set by `reset()`; the sampler re-reads its pins when it sees this.
    resync: bool,
}

impl Pending {
    const fn new() -> Self {
        Self {
            steps: 0,
            clicked: false,
            cap: DEFAULT_DELTA_CAP,
            resync: false,
        }
    }
}

/// Lock-guarded step accumulator and click flag.
pub struct EventChannel {
    pending: Mutex<CriticalSectionRawMutex, RefCell<Pending>>,
}

impl EventChannel {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(RefCell::new(Pending::new())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Pending) -> R) -> R {
        self.pending.lock(|cell| f(&mut cell.borrow_mut()))
    }

    // Sampler side

    // Pushes that land between `reset()` and the sampler's resync were
    // decoded against pre-reset state and are dropped.

    /// Add decoded steps. Called by the decoder only.
    pub fn push_steps(&self, steps: i32) {
        self.with(|p| {
            if !p.resync {
                p.steps = p.steps.saturating_add(steps);
            }
        });
    }

    /// Record a completed click. Called by the decoder only.
    pub fn push_click(&self) {
        self.with(|p| {
            if !p.resync {
                p.clicked = true;
            }
        });
    }

    /// Consume a pending resync request, if any.
    pub fn take_resync(&self) -> bool {
        self.with(|p| core::mem::replace(&mut p.resync, false))
    }

    // Consumer side

    /// Take and clear everything accumulated since the last read.
    ///
    /// Bursts larger than the delta cap are absorbed, not replayed.
    pub fn read(&self) -> EncoderEvent {
        let (steps, clicked, cap) = self.with(|p| {
            let taken = (p.steps, p.clicked, p.cap);
            p.steps = 0;
            p.clicked = false;
            taken
        });
        EncoderEvent {
            steps: steps.clamp(-cap, cap),
            clicked,
        }
    }

    /// Drop pending input and ask the sampler to resynchronise its pins.
    pub fn reset(&self) {
        self.with(|p| {
            p.steps = 0;
            p.clicked = false;
            p.resync = true;
        });
    }

    pub fn delta_cap(&self) -> i32 {
        self.with(|p| p.cap)
    }

    /// Set the largest step magnitude `read()` reports. Values below 1 are
    /// treated as 1.
    pub fn set_delta_cap(&self, cap: i32) {
        let cap = cap.max(1);
        self.with(|p| p.cap = cap);
    }

    /// Raise the delta cap until the returned guard drops.
    pub fn raise_cap(&self, cap: i32) -> CapGuard<'_> {
        let previous = self.delta_cap();
        self.set_delta_cap(cap);
        CapGuard {
            channel: self,
            previous,
        }
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores the previous delta cap on drop.
pub struct CapGuard<'a> {
    channel: &'a EventChannel,
    previous: i32,
}

impl Drop for CapGuard<'_> {
    fn drop(&mut self) {
        self.channel.set_delta_cap(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn read_drains_exactly_once() {
        let ch = EventChannel::new();
        ch.push_steps(1);
        ch.push_click();
        assert_eq!(
            ch.read(),
            EncoderEvent {
                steps: 1,
                clicked: true
            }
        );
        assert_eq!(ch.read(), EncoderEvent::NONE);
    }

    #[test]
    fn read_on_fresh_channel_is_empty() {
        let ch = EventChannel::new();
        assert_eq!(ch.read(), EncoderEvent::NONE);
    }

    #[test]
    fn bursts_are_clamped_to_cap_and_not_replayed() {
        let ch = EventChannel::new();
        ch.push_steps(5);
        assert_eq!(ch.read().steps, 1);
        assert_eq!(ch.read().steps, 0);

        ch.push_steps(-7);
        assert_eq!(ch.read().steps, -1);
    }

    #[test]
    fn raised_cap_is_restored_by_guard() {
        let ch = EventChannel::new();
        {
            let _guard = ch.raise_cap(8);
            ch.push_steps(5);
            assert_eq!(ch.read().steps, 5);
            ch.push_steps(20);
            assert_eq!(ch.read().steps, 8);
        }
        assert_eq!(ch.delta_cap(), DEFAULT_DELTA_CAP);
        ch.push_steps(5);
        assert_eq!(ch.read().steps, 1);
    }

    #[test]
    fn cap_never_drops_below_one() {
        let ch = EventChannel::new();
        ch.set_delta_cap(0);
        assert_eq!(ch.delta_cap(), 1);
        ch.set_delta_cap(-3);
        assert_eq!(ch.delta_cap(), 1);
    }

    #[test]
    fn reset_clears_and_requests_resync_once() {
        let ch = EventChannel::new();
        ch.push_steps(3);
        ch.push_click();
        ch.reset();
        assert_eq!(ch.read(), EncoderEvent::NONE);
        assert!(ch.take_resync());
        assert!(!ch.take_resync());
    }

    #[test]
    fn pushes_before_resync_is_taken_are_dropped() {
        let ch = EventChannel::new();
        ch.reset();
        ch.push_steps(1);
        ch.push_click();
        assert_eq!(ch.read(), EncoderEvent::NONE);

        assert!(ch.take_resync());
        ch.push_steps(-1);
        ch.push_click();
        assert_eq!(
            ch.read(),
            EncoderEvent {
                steps: -1,
                clicked: true
            }
        );
    }

    #[test]
    fn accumulator_is_consistent_across_threads() {
        let ch = Arc::new(EventChannel::new());
        ch.set_delta_cap(i32::MAX);

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let ch = Arc::clone(&ch);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        ch.push_steps(1);
                    }
                })
            })
            .collect();

        let mut total = 0;
        while writers.iter().any(|w| !w.is_finished()) {
            total += ch.read().steps;
        }
        for w in writers {
            w.join().unwrap();
        }
        total += ch.read().steps;

        assert_eq!(total, 4000);
    }
}
