//! Shared-resource bitmap with priority-ceiling scheduling.
//!
//! There is no per-task ownership tracking: `resources_occupied` is a single
//! kernel-wide bitmap, and the scheduler refuses to dispatch any task whose
//! `required_resources` overlaps it (see [`crate::task::Task::is_eligible`]).
//! This is the load-bearing simplification the priority ceiling depends on —
//! it is not a cut corner to restore later.
use crate::klock::CpuLockGuard;
use crate::os::Kernel;
use crate::port::Port;
use crate::task::ResourceMask;

/// OR `mask` into `resources_occupied`. Never blocks. Callers are trusted to
/// have declared every bit they ever set here in their own
/// `required_resources` — the kernel has no way to check this.
pub fn get_resources<P: Port>(kernel: &Kernel<'_, P>, mask: ResourceMask) {
    let _lock = CpuLockGuard::<P>::new();
    kernel
        .resources_occupied
        .set(kernel.resources_occupied.get() | mask);
}

/// AND-NOT `mask` out of `resources_occupied`, then force a reschedule: a
/// previously-ceiling-blocked, higher-priority task may now be eligible.
///
/// Forces the reschedule unconditionally rather than first checking whether
/// releasing `mask` actually freed up a higher-priority task — correct but
/// not optimal, deliberately left as a flat force rather than a
/// ceiling-recomputation pass.
pub fn release_resources<P: Port>(kernel: &Kernel<'_, P>, mask: ResourceMask) {
    let _lock = CpuLockGuard::<P>::new();
    kernel
        .resources_occupied
        .set(kernel.resources_occupied.get() & !mask);
    P::force_schedule();
}
