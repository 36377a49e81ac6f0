//! Countdown timers that post an event to an owning task on expiry.
use core::cell::Cell;

use crate::event::set_event;
use crate::klock::CpuLockGuard;
use crate::os::Kernel;
use crate::port::Port;
use crate::task::{EventMask, TaskId};

/// Index of a [`Timer`] into the table passed to [`crate::os::start_os`] /
/// [`Kernel::new`]. See [`crate::task::TaskId`] for the same out-of-range
/// panic-on-index contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(pub u8);

/// A countdown timer descriptor: one per timer, fixed for the process
/// lifetime.
///
/// `owner` and `event` are immutable; `remaining` is the only field any
/// kernel service mutates, always from inside a [`CpuLockGuard`].
pub struct Timer {
    remaining: Cell<u32>,
    owner: TaskId,
    event: EventMask,
}

// SAFETY: see `Task`'s identical justification — only ever touched with
// global interrupts disabled.
unsafe impl Sync for Timer {}

impl Timer {
    /// Build a disarmed timer (`remaining == 0`) that will post `event` to
    /// `owner` once armed and ticked down to zero.
    pub const fn new(owner: TaskId, event: EventMask) -> Self {
        Self {
            remaining: Cell::new(0),
            owner,
            event,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.get()
    }

    pub fn owner(&self) -> TaskId {
        self.owner
    }

    pub fn event(&self) -> EventMask {
        self.event
    }
}

/// Write `value` into the timer's remaining count. `0` disarms it.
pub fn set_timer<P: Port>(kernel: &Kernel<'_, P>, timer_id: TimerId, value: u32) {
    let _lock = CpuLockGuard::<P>::new();
    kernel.timers[timer_id.0 as usize].remaining.set(value);
}

/// Decrement one timer's remaining count if armed; post its event to its
/// owner when it reaches zero.
///
/// The forced-reschedule signal this can trigger comes from [`set_event`],
/// not from `tick_timer` itself.
pub fn tick_timer<P: Port>(kernel: &Kernel<'_, P>, timer_id: TimerId) {
    let fired = {
        let _lock = CpuLockGuard::<P>::new();
        let timer = &kernel.timers[timer_id.0 as usize];
        let remaining = timer.remaining.get();
        if remaining == 0 {
            return;
        }
        let remaining = remaining - 1;
        timer.remaining.set(remaining);
        if remaining == 0 {
            Some((timer.owner(), timer.event()))
        } else {
            None
        }
    };

    if let Some((owner, event)) = fired {
        set_event(kernel, owner, event);
    }
}

/// Tick every timer in the kernel's timer table once.
///
/// A real periodic ISR ticks the whole table every cadence rather than
/// enumerating ids itself, so this convenience is provided alongside
/// [`tick_timer`].
pub fn tick_all<P: Port>(kernel: &Kernel<'_, P>) {
    for i in 0..kernel.timers.len() {
        tick_timer(kernel, TimerId(i as u8));
    }
}
