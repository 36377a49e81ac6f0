//! The kernel's one fallible entry point.
//!
//! None of the nine steady-state service calls in the kernel's external
//! interface return a status — misuse of `set_event`, `get_resources`,
//! `set_timer`, and so on is a silent configuration-time contract
//! violation, by design. [`StartError`] covers a narrower thing: the
//! one-time check of the
//! caller-supplied configuration that [`crate::os::start_os`] can and does
//! perform before interrupts are enabled and before any task exists to race
//! with it.
use core::fmt;

/// Why [`crate::os::start_os`] refused to boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// The task table was empty; there is nothing for the scheduler to ever
    /// pick besides the bootstrap task.
    NoTasks,
    /// Two tasks in the table declared the same priority. Priorities must
    /// be unique; the scheduler would still behave deterministically
    /// (lowest index wins ties) but the losing task would starve forever,
    /// which is never what a caller intends.
    DuplicatePriority { priority: crate::task::Priority },
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::NoTasks => write!(f, "task table must contain at least one task"),
            StartError::DuplicatePriority { priority } => {
                write!(f, "priority {priority} is used by more than one task")
            }
        }
    }
}
