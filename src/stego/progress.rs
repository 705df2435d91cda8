// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Frame progress tracking and cooperative cancellation.
//!
//! A [`Progress`] belongs to one call, not to the process, so concurrent
//! operations never share counters. It uses atomics so rayon workers can
//! advance it and callers on other threads can poll or cancel it.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::error::StegoError;

/// Step counter plus cancellation flag for one operation.
#[derive(Debug, Default)]
pub struct Progress {
    step: AtomicU32,
    total: AtomicU32,
    cancelled: AtomicBool,
}

impl Progress {
    pub fn new(total: u32) -> Self {
        Self { step: AtomicU32::new(0), total: AtomicU32::new(total), cancelled: AtomicBool::new(false) }
    }

    /// Reset to step 0 of `total` and clear cancellation.
    pub fn reset(&self, total: u32) {
        self.cancelled.store(false, Ordering::Relaxed);
        self.step.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    /// Set the total without resetting the current step or the flag.
    pub fn set_total(&self, total: u32) {
        self.total.store(total, Ordering::Relaxed);
    }

    /// Advance by one step.
    /// Capped at total-1 so the count never reads complete before `finish()`.
    /// With a total of 0 the step advances freely.
    pub fn advance(&self) {
        let total = self.total.load(Ordering::Relaxed);
        if total == 0 {
            self.step.fetch_add(1, Ordering::Relaxed);
        } else {
            let _ = self
                .step
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| if s + 1 < total { Some(s + 1) } else { Some(s) });
        }
    }

    /// Current (step, total).
    pub fn get(&self) -> (u32, u32) {
        (self.step.load(Ordering::Relaxed), self.total.load(Ordering::Relaxed))
    }

    /// Mark complete (step = total).
    pub fn finish(&self) {
        let t = self.total.load(Ordering::Relaxed);
        self.step.store(t, Ordering::Relaxed);
    }

    /// Request cancellation. Frames already running finish; new ones don't start.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    pub fn check_cancelled(&self) -> Result<(), StegoError> {
        if self.is_cancelled() {
            Err(StegoError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_caps_below_total() {
        let p = Progress::new(3);
        for _ in 0..10 {
            p.advance();
        }
        assert_eq!(p.get(), (2, 3));
        p.finish();
        assert_eq!(p.get(), (3, 3));
    }

    #[test]
    fn indeterminate_total_advances_freely() {
        let p = Progress::new(0);
        p.advance();
        p.advance();
        assert_eq!(p.get(), (2, 0));
    }

    #[test]
    fn cancellation() {
        let p = Progress::new(5);
        assert!(p.check_cancelled().is_ok());
        p.cancel();
        assert!(matches!(p.check_cancelled(), Err(StegoError::Cancelled)));
        p.reset(4);
        assert!(!p.is_cancelled());
        assert_eq!(p.get(), (0, 4));
    }
}
