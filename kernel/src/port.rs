//! The trait boundary between the kernel and the hardware abstraction layer.
//!
//! The kernel never talks to a timer peripheral, an interrupt controller, or
//! a stack pointer register directly — it only calls the handful of
//! operations declared by [`Port`]. A concrete target links in exactly one
//! implementation of this trait (typically a zero-sized type); the
//! `kernel-sim` crate provides the implementation used by this crate's own
//! test suite.
//!
//! `save_context`/`restore_context` from the context-switch protocol are
//! deliberately absent here: they are primitives the HAL's naked ISR wrapper
//! calls directly around the kernel's [`crate::sched::schedule`], not
//! something the kernel itself ever invokes.

/// Operations the kernel requires from its host environment.
///
/// Implementors are expected to be zero-sized marker types; every method
/// takes no `self` so that the kernel can call `P::method()` without holding
/// an instance of `P` anywhere.
pub trait Port {
    /// Opaque interrupt-enable state saved across a nested critical section.
    type CriticalState: Copy;

    /// Unconditionally disable all maskable interrupts. Used only once, by
    /// [`crate::os::start_os`]'s caller-visible contract and by
    /// [`crate::os::shutdown_os`]; kernel services use [`Port::enter_critical`]
    /// instead so that they nest correctly.
    fn disable_all_interrupts();

    /// Unconditionally enable all maskable interrupts.
    fn enable_all_interrupts();

    /// Enter a critical section, returning whatever state is needed to
    /// restore the previous interrupt-enable status on exit. Nestable: a
    /// critical section entered while already inside one must not leave
    /// interrupts enabled until the outermost guard is dropped.
    fn enter_critical() -> Self::CriticalState;

    /// Leave a critical section previously entered with [`Port::enter_critical`].
    fn exit_critical(state: Self::CriticalState);

    /// Ensure the scheduler runs at the earliest possible subsequent
    /// instruction cycle once interrupts are re-enabled, typically by
    /// arming the scheduling timer to overflow immediately.
    fn force_schedule();

    /// Whether interrupts are currently enabled. Used only by `debug_assert!`s
    /// in kernel services that must never run with interrupts already
    /// disabled by their caller in a way that would nest incorrectly; never
    /// consulted for control flow in release builds.
    fn is_interrupts_enabled() -> bool;
}
