//! The scheduler: picks the next task to run and updates `current_task`.
use crate::os::Kernel;
use crate::port::Port;
use crate::task::{Priority, TaskId, TaskState};

/// Scan the task table for the highest-priority task that is `Ready` and not
/// blocked by the priority ceiling, then apply the preemption rule against
/// whichever task is currently running.
///
/// Must be called with global interrupts already disabled — either from
/// inside an interrupt service routine, or from inside a
/// [`crate::klock::CpuLockGuard`] held by one of the other kernel services.
/// `schedule` itself never acquires a lock; nesting it inside one that is
/// already held is exactly how every caller uses it.
pub fn schedule<P: Port>(kernel: &Kernel<'_, P>) {
    let resources_occupied = kernel.resources_occupied();

    // Start below every valid priority rather than seeding 0: a real task
    // could legitimately have priority 0, so "no candidate yet" must be its
    // own state, not a priority that could tie with a real one.
    let mut best: Option<(TaskId, Priority)> = None;
    for (i, task) in kernel.tasks.iter().enumerate() {
        if !task.is_eligible(resources_occupied) {
            continue;
        }
        let priority = task.priority();
        if best.map_or(true, |(_, best_priority)| priority > best_priority) {
            best = Some((TaskId(i as u8), priority));
        }
    }

    let (next_task, next_priority) = match best {
        Some((id, priority)) => (kernel.task(id), priority),
        // No real task is eligible: the virtual bootstrap/idle task, always
        // eligible (priority 0, no required resources), is the only
        // candidate left.
        None => (&kernel.bootstrap, kernel.bootstrap.priority()),
    };

    let current = kernel.current_task();

    match current.state() {
        TaskState::Ready | TaskState::Waiting => {
            next_task.set_state(TaskState::Running);
            set_current(kernel, next_task, next_priority);
        }
        TaskState::Running => {
            if next_priority > current.priority() {
                current.set_state(TaskState::Ready);
                next_task.set_state(TaskState::Running);
                set_current(kernel, next_task, next_priority);
            }
            // Else: the running task keeps running, nothing to update.
        }
    }
}

fn set_current<P: Port>(kernel: &Kernel<'_, P>, next: &crate::task::Task, _next_priority: Priority) {
    if core::ptr::eq(next, &kernel.bootstrap) {
        kernel.current_task_index.set(None);
        return;
    }
    let index = kernel
        .tasks
        .iter()
        .position(|t| core::ptr::eq(t, next))
        .expect("next was picked from kernel.tasks");
    kernel.current_task_index.set(Some(index as u8));
}
