//! Startup, shutdown, and the kernel-wide state singleton.
use core::cell::Cell;
use core::marker::PhantomData;

use crate::error::StartError;
use crate::port::Port;
use crate::task::{ResourceMask, Task, TaskId};
use crate::timer::Timer;

/// The kernel's entire runtime state: the wired-up descriptor tables plus
/// the two kernel globals that are not already inside a [`Task`] —
/// `current_task_index` and `resources_occupied`.
///
/// This is an explicit struct rather than hidden `static mut` globals so
/// that `kernel-sim`'s test suite can instantiate many independent kernels
/// in one test process; [`start_os`] is still the single production entry
/// point and stores exactly one of these for the process lifetime, the way
/// `current_task`/`resources_occupied` are conventionally described as
/// kernel globals.
pub struct Kernel<'a, P: Port> {
    pub(crate) tasks: &'a [Task],
    pub(crate) timers: &'a [Timer],
    pub(crate) bootstrap: Task,
    pub(crate) current_task_index: Cell<Option<u8>>,
    pub(crate) resources_occupied: Cell<ResourceMask>,
    pub(crate) _port: PhantomData<P>,
}

impl<'a, P: Port> Kernel<'a, P> {
    /// Wire up the descriptor tables without touching interrupts or running
    /// the scheduler. Split out of [`start_os`] so `kernel-sim` can build a
    /// `Kernel` and drive it step by step instead of calling the
    /// never-returning production entry point.
    pub fn new(tasks: &'a [Task], timers: &'a [Timer]) -> Result<Self, StartError> {
        if tasks.is_empty() {
            return Err(StartError::NoTasks);
        }
        for (i, a) in tasks.iter().enumerate() {
            for b in &tasks[i + 1..] {
                if a.priority() == b.priority() {
                    return Err(StartError::DuplicatePriority {
                        priority: a.priority(),
                    });
                }
            }
        }

        Ok(Self {
            tasks,
            timers,
            bootstrap: Task::bootstrap(),
            current_task_index: Cell::new(None),
            resources_occupied: Cell::new(0),
            _port: PhantomData,
        })
    }

    /// The task descriptor `current_task` currently points to: the
    /// bootstrap task before the first [`crate::sched::schedule`] call,
    /// otherwise `tasks[current_task_index]`.
    pub(crate) fn current_task(&self) -> &Task {
        match self.current_task_index.get() {
            Some(i) => &self.tasks[i as usize],
            None => &self.bootstrap,
        }
    }

    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.0 as usize]
    }

    pub fn resources_occupied(&self) -> ResourceMask {
        self.resources_occupied.get()
    }

    /// Index of the task the scheduler last selected, or `None` while the
    /// virtual bootstrap/idle task is current (before the first real task
    /// has ever run, or whenever nothing else is eligible).
    pub fn current_task_index(&self) -> Option<u8> {
        self.current_task_index.get()
    }
}

/// Wire the descriptor tables into the kernel globals, enable global
/// interrupts, and enter an idle loop that sleeps until the first scheduler
/// tick preempts it. Never returns.
///
/// The kernel instance this builds lives on this (never-unwound) call frame
/// for the remainder of the process, which is all a boot entry point needs
/// to guarantee. Making that instance reachable from a concrete target's
/// periodic-tick ISR — so the ISR can actually call
/// [`crate::sched::schedule`] and [`crate::timer::tick_all`] on it — is the
/// HAL integration's job: a real `main()` typically calls [`Kernel::new`]
/// itself and stores the result behind whatever `'static` storage its
/// target's linker/ISR-registration story requires, rather than calling
/// this convenience wrapper.
///
/// # Panics
///
/// Panics (via [`StartError`]'s `Display`) if `tasks` is empty or declares a
/// duplicate priority — see [`StartError`].
pub fn start_os<P: Port>(tasks: &'static [Task], timers: &'static [Timer]) -> ! {
    let kernel = match Kernel::<P>::new(tasks, timers) {
        Ok(kernel) => kernel,
        Err(e) => panic!("kernel failed to start: {e}"),
    };
    let _kernel = kernel;

    log::info!(
        "starting kernel with {} task(s), {} timer(s)",
        tasks.len(),
        timers.len()
    );

    P::enable_all_interrupts();

    // Idle: low-power sleep until the periodic tick preempts us into a real
    // task. The HAL's ISR wrapper is what actually invokes `schedule`; this
    // loop only needs to exist so the processor has somewhere to sit.
    loop {
        idle_sleep::<P>();
    }
}

/// Disable global interrupts and halt forever.
pub fn shutdown_os<P: Port>() -> ! {
    log::info!("shutting down kernel");
    P::disable_all_interrupts();
    loop {
        idle_sleep::<P>();
    }
}

#[cfg(not(test))]
fn idle_sleep<P: Port>() {
    // A real HAL would execute a low-power-sleep instruction here (e.g.
    // `wfi`). The kernel has no portable equivalent, so it just spins; the
    // next interrupt arrives regardless.
}

#[cfg(test)]
fn idle_sleep<P: Port>() {
    unreachable!("start_os/shutdown_os are never exercised by kernel unit tests: they do not return");
}
