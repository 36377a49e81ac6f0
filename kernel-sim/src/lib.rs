//! Deterministic `Port` implementation and small driving helpers used only
//! by this workspace's own test suite — never linked into a real target.
//!
//! There is no real preemption here: "enabling interrupts" and "forcing a
//! reschedule" are thread-local flags a test can observe and act on. A test
//! plays the part of the HAL's periodic ISR by calling [`kernel::schedule`]
//! and [`kernel::tick_all`] itself, at whatever cadence the scenario needs.
use std::cell::Cell;
use std::thread_local;

use kernel::Port;

thread_local! {
    static INTERRUPTS_ENABLED: Cell<bool> = Cell::new(false);
    static FORCE_SCHEDULE_REQUESTED: Cell<bool> = Cell::new(false);
}

/// A `Port` with no hardware behind it. See the module docs.
pub struct SimPort;

impl Port for SimPort {
    type CriticalState = bool;

    fn disable_all_interrupts() {
        INTERRUPTS_ENABLED.with(|f| f.set(false));
    }

    fn enable_all_interrupts() {
        INTERRUPTS_ENABLED.with(|f| f.set(true));
    }

    fn enter_critical() -> bool {
        INTERRUPTS_ENABLED.with(|f| {
            let previous = f.get();
            f.set(false);
            previous
        })
    }

    fn exit_critical(previous: bool) {
        INTERRUPTS_ENABLED.with(|f| f.set(previous));
    }

    fn force_schedule() {
        FORCE_SCHEDULE_REQUESTED.with(|f| f.set(true));
        log::trace!("force_schedule requested");
    }

    fn is_interrupts_enabled() -> bool {
        INTERRUPTS_ENABLED.with(|f| f.get())
    }
}

/// Whether something has called `force_schedule` since the last time this
/// was checked. Consuming (clears the flag), the way servicing a real
/// scheduling timer's pending-interrupt bit consumes it.
pub fn force_schedule_requested() -> bool {
    FORCE_SCHEDULE_REQUESTED.with(|f| f.replace(false))
}

/// Install the `env_logger` backend for the calling test, if one isn't
/// already installed. Every scenario/property test calls this first, so
/// `RUST_LOG=trace cargo test -- --nocapture` shows the `log::trace!` this
/// crate's [`SimPort::force_schedule`] emits.
pub fn init_test_logger() {
    let _ = env_logger::try_init();
}
