//! Property tests driving the kernel through random operation sequences,
//! in the style of a bytecode-interpreted fuzz harness: each input byte
//! selects one kernel call to make, then the invariants from the kernel's
//! testable-properties list are checked after every step.
use core::ptr;

use kernel::{
    clear_events, get_events, get_resources, release_resources, schedule, set_event, set_timer,
    tick_all, Kernel, Task, TaskId, TaskState, Timer,
};
use kernel_sim::SimPort;
use quickcheck_macros::quickcheck;

const TASK_COUNT: u8 = 4;
const TIMER_COUNT: u8 = 2;

fn build_tasks() -> [Task; TASK_COUNT as usize] {
    [
        Task::new(3, 0b0001, ptr::null_mut()),
        Task::new(1, 0b0010, ptr::null_mut()),
        Task::new(7, 0b0000, ptr::null_mut()),
        Task::new(0, 0b0000, ptr::null_mut()),
    ]
}

fn build_timers() -> [Timer; TIMER_COUNT as usize] {
    [Timer::new(TaskId(0), 0b01), Timer::new(TaskId(2), 0b10)]
}

fn run_op(kernel: &Kernel<'_, SimPort>, byte: u8) {
    let task = TaskId(byte % TASK_COUNT);
    let mask = 1u8 << (byte % 8);
    match byte % 7 {
        0 => set_event(kernel, task, mask),
        1 => clear_events(kernel, mask),
        2 => {
            let _ = get_events(kernel);
        }
        3 => get_resources(kernel, mask),
        4 => release_resources(kernel, mask),
        5 => set_timer(kernel, kernel::TimerId(byte % TIMER_COUNT), (byte % 5) as u32),
        6 => tick_all(kernel),
        _ => unreachable!(),
    }
    schedule(kernel);
}

fn assert_invariants(kernel: &Kernel<'_, SimPort>, tasks: &[Task]) {
    let running_count = tasks
        .iter()
        .filter(|t| t.state() == TaskState::Running)
        .count();
    assert!(running_count <= 1, "more than one Running task");

    for t in tasks {
        if t.state() == TaskState::Waiting {
            assert_eq!(
                t.events() & t.wait_mask(),
                0,
                "a Waiting task had an already-satisfied wait"
            );
        }
    }

    // Every currently-Ready task must be blocked by the ceiling or by
    // something else being selected: the scheduler never leaves a resource-
    // eligible Ready task sitting idle while a lower-priority task runs.
    let occupied = kernel.resources_occupied();
    let running_priority = tasks
        .iter()
        .find(|t| t.state() == TaskState::Running)
        .map(|t| t.priority())
        .unwrap_or(0);
    for t in tasks {
        if t.state() == TaskState::Ready {
            let eligible = (t.required_resources() & occupied) == 0;
            if eligible {
                assert!(
                    t.priority() <= running_priority,
                    "a Ready, ceiling-eligible task was passed over for a lower-priority one"
                );
            }
        }
    }
}

#[quickcheck]
fn invariants_hold_after_any_operation_sequence(ops: Vec<u8>) {
    kernel_sim::init_test_logger();
    let tasks = build_tasks();
    let timers = build_timers();
    let kernel = Kernel::<SimPort>::new(&tasks, &timers).unwrap();

    for byte in ops {
        run_op(&kernel, byte);
        assert_invariants(&kernel, &tasks);
    }
}

#[quickcheck]
fn get_then_release_resources_is_a_no_op(mask: u8) {
    kernel_sim::init_test_logger();
    let tasks = build_tasks();
    let kernel = Kernel::<SimPort>::new(&tasks, &[]).unwrap();

    let before = kernel.resources_occupied();
    get_resources(&kernel, mask);
    release_resources(&kernel, mask);
    assert_eq!(kernel.resources_occupied(), before);
}

#[quickcheck]
fn set_then_clear_own_event_is_a_no_op(mask: u8) {
    kernel_sim::init_test_logger();
    let tasks = build_tasks();
    let kernel = Kernel::<SimPort>::new(&tasks, &[]).unwrap();
    schedule(&kernel); // task 2 has the highest priority (7), so it becomes current

    let before = get_events(&kernel);
    set_event(&kernel, TaskId(2), mask);
    clear_events(&kernel, mask);
    assert_eq!(get_events(&kernel), before);
}

#[quickcheck]
fn disarming_a_timer_silences_it(value: u32) {
    kernel_sim::init_test_logger();
    let tasks = build_tasks();
    let timers = build_timers();
    let kernel = Kernel::<SimPort>::new(&tasks, &timers).unwrap();

    set_timer(&kernel, kernel::TimerId(0), value.max(1));
    set_timer(&kernel, kernel::TimerId(0), 0);
    for _ in 0..10 {
        tick_all(&kernel);
    }
    assert_eq!(tasks[0].events() & 0b01, 0);
}
