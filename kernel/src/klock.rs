//! The RAII critical-section guard every kernel service runs its body under.
use core::marker::PhantomData;

use crate::port::Port;

/// A held critical section: all maskable interrupts are disabled for as long
/// as a value of this type is alive.
///
/// Every kernel service function takes one of these (by constructing it as
/// its first statement) and lets it drop at the end of the function body,
/// which is what makes the service's effects atomic with respect to ISRs and
/// other tasks.
pub struct CpuLockGuard<P: Port> {
    state: P::CriticalState,
    _port: PhantomData<P>,
}

impl<P: Port> CpuLockGuard<P> {
    /// Enter a critical section.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: P::enter_critical(),
            _port: PhantomData,
        }
    }
}

impl<P: Port> Default for CpuLockGuard<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Port> Drop for CpuLockGuard<P> {
    fn drop(&mut self) {
        P::exit_critical(self.state);
    }
}
