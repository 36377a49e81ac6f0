//! Task descriptors and the Ready/Running/Waiting state machine.
use core::cell::Cell;

/// A bitmask of up to 8 events, or up to 8 resources — the kernel never
/// needs more than a byte of either on this class of target.
pub type EventMask = u8;

/// A bitmask of up to 8 resources.
pub type ResourceMask = u8;

/// A task's fixed, unique scheduling priority. Higher values run first.
pub type Priority = u8;

/// Index of a [`Task`] into the table passed to [`crate::os::start_os`].
///
/// A thin `u8` newtype rather than a bare index, so call sites read
/// `TaskId(2)` and get `Debug`/`Eq`/`Copy` for free. Out-of-range ids are not
/// validated — they panic via slice indexing, the idiomatic analogue of an
/// out-of-bounds access trapping on the real target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(pub u8);

/// One of the three states a task can occupy. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Ready,
    Running,
    Waiting,
}

/// The slot the context-switch primitive reads and writes the task's saved
/// stack pointer through.
///
/// The kernel never interprets the value stored here — it is opaque to
/// every service in this crate. It exists, and is the first field of
/// [`Task`], purely so that the HAL's assembly glue can locate a task's
/// saved-stack-pointer slot in O(1) from a `&Task`, which is the portable
/// replacement for the original pointer-punning trick described in the
/// kernel's design notes.
#[repr(transparent)]
pub struct StackAnchor(Cell<*mut ()>);

impl StackAnchor {
    /// Build a stack anchor pre-loaded with a task's initial saved stack
    /// pointer. The caller (the HAL, out of scope for this crate) is
    /// responsible for having already populated the pointed-to stack with a
    /// virtual saved context whose program-counter bytes point at the
    /// task's entry function.
    pub const fn new(initial_sp: *mut ()) -> Self {
        Self(Cell::new(initial_sp))
    }

    pub fn get(&self) -> *mut () {
        self.0.get()
    }

    pub fn set(&self, sp: *mut ()) {
        self.0.set(sp);
    }
}

/// A task descriptor: one per task, fixed for the lifetime of the process.
///
/// `stack_anchor` is deliberately the first field (see [`StackAnchor`]).
/// `priority` and `required_resources` are immutable once built; `state`,
/// `events`, and `wait_mask` are the only fields any kernel service mutates,
/// always from inside a [`crate::klock::CpuLockGuard`].
pub struct Task {
    stack_anchor: StackAnchor,
    state: Cell<TaskState>,
    events: Cell<EventMask>,
    wait_mask: Cell<EventMask>,
    required_resources: ResourceMask,
    priority: Priority,
}

// SAFETY: `Task` is only ever touched with global interrupts disabled (see
// `CpuLockGuard`), which on a single-core target is a stronger guarantee
// than the usual `Sync` contract asks for. This unlocks placing task tables
// in `static` storage, which is how the kernel's descriptor tables are meant
// to be declared.
unsafe impl Sync for Task {}

impl Task {
    /// Build a task descriptor. Every task starts in the `Ready` state with
    /// no events set and nothing awaited.
    pub const fn new(priority: Priority, required_resources: ResourceMask, initial_sp: *mut ()) -> Self {
        Self {
            stack_anchor: StackAnchor::new(initial_sp),
            state: Cell::new(TaskState::Ready),
            events: Cell::new(0),
            wait_mask: Cell::new(0),
            required_resources,
            priority,
        }
    }

    /// The virtual bootstrap task the scheduler runs against before the
    /// first real tick: priority 0, no required resources, perpetually
    /// `Ready`. It is never present in the caller-supplied task table.
    pub const fn bootstrap() -> Self {
        Self::new(0, 0, core::ptr::null_mut())
    }

    pub fn stack_anchor(&self) -> &StackAnchor {
        &self.stack_anchor
    }

    pub fn state(&self) -> TaskState {
        self.state.get()
    }

    pub(crate) fn set_state(&self, state: TaskState) {
        self.state.set(state);
    }

    pub fn events(&self) -> EventMask {
        self.events.get()
    }

    pub(crate) fn set_events(&self, events: EventMask) {
        self.events.set(events);
    }

    pub fn wait_mask(&self) -> EventMask {
        self.wait_mask.get()
    }

    pub(crate) fn set_wait_mask(&self, wait_mask: EventMask) {
        self.wait_mask.set(wait_mask);
    }

    pub fn required_resources(&self) -> ResourceMask {
        self.required_resources
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// A task is eligible for dispatch iff it is `Ready` and none of its
    /// declared resources are currently held by anyone — invariant 6, the
    /// priority ceiling.
    pub(crate) fn is_eligible(&self, resources_occupied: ResourceMask) -> bool {
        self.state() == TaskState::Ready && (self.required_resources & resources_occupied) == 0
    }
}
