//! Per-task event flags: set from anywhere, cleared/read/waited on only by
//! the owning (current) task.
use crate::klock::CpuLockGuard;
use crate::os::Kernel;
use crate::port::Port;
use crate::task::{EventMask, TaskId, TaskState};

/// OR `mask` into `tasks[task_id].events`. If the target was `Waiting` on one
/// of the newly-set bits, move it to `Ready`. If the target outranks the
/// caller, raise the forced-reschedule signal so the scheduler runs on the
/// next possible tick. Safe to call from an interrupt service routine.
pub fn set_event<P: Port>(kernel: &Kernel<'_, P>, task_id: TaskId, mask: EventMask) {
    let _lock = CpuLockGuard::<P>::new();

    let target = kernel.task(task_id);
    target.set_events(target.events() | mask);

    if target.state() == TaskState::Waiting && (target.events() & target.wait_mask()) != 0 {
        target.set_state(TaskState::Ready);
    }

    if target.priority() > kernel.current_task().priority() {
        P::force_schedule();
    }
}

/// AND-NOT `mask` out of the current task's `events`. Restricted to the
/// owning (current) task by construction — there is no `task_id` parameter.
pub fn clear_events<P: Port>(kernel: &Kernel<'_, P>, mask: EventMask) {
    let _lock = CpuLockGuard::<P>::new();
    let current = kernel.current_task();
    current.set_events(current.events() & !mask);
}

/// Read the current task's own `events`.
pub fn get_events<P: Port>(kernel: &Kernel<'_, P>) -> EventMask {
    let _lock = CpuLockGuard::<P>::new();
    kernel.current_task().events()
}

/// Block until any bit in `mask` becomes set on the current task.
///
/// Returns immediately, without ever entering `Waiting`, if one of the bits
/// is already set. Otherwise records `mask` as the `wait_mask`, transitions
/// to `Waiting`, forces a reschedule, and spin-polls `events & mask` with
/// interrupts enabled — the poll can only resolve once some other task or
/// interrupt calls [`set_event`] and the scheduler has re-selected this task.
///
/// Does not clear the satisfied bits on wake: call [`clear_events`]
/// afterwards, or the next `wait_events(mask)` call returns immediately.
///
/// Calling this while holding resources violates the priority-ceiling
/// discipline and can deadlock the system; the kernel does not detect or
/// prevent it.
pub fn wait_events<P: Port>(kernel: &Kernel<'_, P>, mask: EventMask) {
    {
        let _lock = CpuLockGuard::<P>::new();
        let current = kernel.current_task();
        current.set_wait_mask(current.wait_mask() | mask);
        if (current.events() & mask) == 0 {
            current.set_state(TaskState::Waiting);
            P::force_schedule();
        } else {
            return;
        }
    }

    debug_assert!(
        P::is_interrupts_enabled(),
        "wait_events must spin-poll with interrupts enabled, or the forced reschedule can never land"
    );
    while (kernel.current_task().events() & mask) == 0 {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os::Kernel;
    use crate::task::Task;
    use core::ptr;

    struct FakePort;
    impl Port for FakePort {
        type CriticalState = ();
        fn disable_all_interrupts() {}
        fn enable_all_interrupts() {}
        fn enter_critical() {}
        fn exit_critical(_: Self::CriticalState) {}
        fn force_schedule() {}
        fn is_interrupts_enabled() -> bool {
            true
        }
    }

    #[test]
    fn set_event_wakes_a_waiting_task() {
        let tasks = [Task::new(1, 0, ptr::null_mut())];
        tasks[0].set_state(TaskState::Waiting);
        tasks[0].set_wait_mask(0b01);
        let kernel = Kernel::<FakePort>::new(&tasks, &[]).unwrap();

        set_event(&kernel, TaskId(0), 0b01);

        assert_eq!(tasks[0].state(), TaskState::Ready);
        assert_eq!(tasks[0].events(), 0b01);
    }

    #[test]
    fn set_event_leaves_unrelated_wait_untouched() {
        let tasks = [Task::new(1, 0, ptr::null_mut())];
        tasks[0].set_state(TaskState::Waiting);
        tasks[0].set_wait_mask(0b10);
        let kernel = Kernel::<FakePort>::new(&tasks, &[]).unwrap();

        set_event(&kernel, TaskId(0), 0b01);

        assert_eq!(tasks[0].state(), TaskState::Waiting);
    }

    #[test]
    fn clear_events_round_trip() {
        let tasks = [Task::new(1, 0, ptr::null_mut())];
        let kernel = Kernel::<FakePort>::new(&tasks, &[]).unwrap();
        kernel.current_task_index.set(Some(0));

        set_event(&kernel, TaskId(0), 0b11);
        assert_eq!(get_events(&kernel), 0b11);
        clear_events(&kernel, 0b11);
        assert_eq!(get_events(&kernel), 0);
    }

    #[test]
    fn wait_events_returns_immediately_when_already_set() {
        let tasks = [Task::new(1, 0, ptr::null_mut())];
        tasks[0].set_events(0b01);
        let kernel = Kernel::<FakePort>::new(&tasks, &[]).unwrap();
        kernel.current_task_index.set(Some(0));

        wait_events(&kernel, 0b01);
        assert_eq!(tasks[0].state(), TaskState::Ready);
    }
}
