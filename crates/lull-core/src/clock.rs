use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::{Duration, Instant};

// Runtime clock
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

thread_local! {
    static CLOCK: RefCell<Rc<dyn Clock>> = RefCell::new(Rc::new(SystemClock));
}

/// Install the clock used by timers and debouncers on this thread.
/// Defaults to `SystemClock`; tests install a `TestClock`.
pub fn set_clock(clock: impl Clock) {
    CLOCK.with(|c| *c.borrow_mut() = Rc::new(clock));
}

pub fn now() -> Instant {
    // Clone out so a clock may itself read `now()` without a borrow conflict.
    let clock = CLOCK.with(|c| c.borrow().clone());
    clock.now()
}

/// A test clock you can drive deterministically.
///
/// Clones share the same time, so the handle returned by [`TestClock::install`]
/// controls the installed clock.
#[derive(Clone)]
pub struct TestClock {
    t: Rc<Cell<Instant>>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            t: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Create a clock and install it for the current thread.
    pub fn install() -> Self {
        let clock = Self::new();
        set_clock(clock.clone());
        clock
    }

    pub fn now(&self) -> Instant {
        self.t.get()
    }

    pub fn set(&self, t: Instant) {
        self.t.set(t);
    }

    /// Move time forward by `d`, stopping at every timer deadline on the way
    /// and ticking the runtime there, so timers observe their own deadline as
    /// `now()`.
    pub fn advance(&self, d: Duration) {
        let target = self.t.get() + d;
        while let Some(deadline) = crate::timers::next_deadline() {
            if deadline > target {
                break;
            }
            if deadline > self.t.get() {
                self.t.set(deadline);
            }
            if let Err(e) = crate::tick() {
                log::error!("tick at {:?} failed: {e}", deadline);
            }
        }
        self.t.set(target);
        if let Err(e) = crate::tick() {
            log::error!("tick failed: {e}");
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}
