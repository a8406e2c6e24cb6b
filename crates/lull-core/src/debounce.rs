//! # Debounce and throttle
//!
//! `debounce` collapses a burst of calls into one invocation after `wait` of
//! quiet; `throttle` invokes at most once per `wait`. Both follow the
//! semantics of lodash's `debounce`/`throttle`:
//!
//! - the trailing invocation receives the arguments of the last call,
//! - `leading` invokes on the first call of a burst,
//! - `max_wait` bounds how long a continuous burst can postpone invocation,
//! - `call` returns the result of the most recent invocation.
//!
//! ```rust
//! use lull_core::*;
//! use web_time::Duration;
//!
//! let clock = TestClock::install();
//! let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
//! let save = {
//!     let seen = seen.clone();
//!     debounce(move |v: i32| seen.borrow_mut().push(v), Duration::from_millis(100))
//! };
//!
//! save.call(1);
//! save.call(2);
//! clock.advance_ms(100);
//! assert_eq!(*seen.borrow(), vec![2]);
//! ```
//!
//! Time comes from [`crate::clock::now`] and the delayed work is a timer in
//! the thread-local queue, so nothing fires until the runtime ticks.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use web_time::{Duration, Instant};

use crate::clock::now;
use crate::timers::{TimerId, clear_timer, set_timeout};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebounceOptions {
    /// Invoke on the leading edge of a burst.
    pub leading: bool,
    /// Invoke on the trailing edge of a burst.
    pub trailing: bool,
    /// Longest a burst may delay an invocation. Raised to at least `wait`.
    pub max_wait: Option<Duration>,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            leading: false,
            trailing: true,
            max_wait: None,
        }
    }
}

impl DebounceOptions {
    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Options `throttle` uses.
    pub fn throttle(wait: Duration) -> Self {
        Self {
            leading: true,
            trailing: true,
            max_wait: Some(wait),
        }
    }
}

struct State<A, R> {
    last_args: Option<A>,
    last_call: Option<Instant>,
    last_invoke: Option<Instant>,
    timer: Option<TimerId>,
    result: Option<R>,
}

struct Inner<A, R> {
    func: Box<dyn Fn(A) -> R>,
    wait: Duration,
    options: DebounceOptions,
    state: RefCell<State<A, R>>,
}

/// Debounced (or throttled) wrapper around a callback.
///
/// Cloning shares the same pending call. Dropping the last clone clears its
/// timer.
pub struct Debounced<A: 'static, R: 'static = ()> {
    inner: Rc<Inner<A, R>>,
}

impl<A: 'static, R: 'static> Clone for Debounced<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub fn debounce<A, R>(f: impl Fn(A) -> R + 'static, wait: Duration) -> Debounced<A, R>
where
    A: 'static,
    R: Clone + 'static,
{
    Debounced::new(f, wait, DebounceOptions::default())
}

pub fn debounce_with<A, R>(
    f: impl Fn(A) -> R + 'static,
    wait: Duration,
    options: DebounceOptions,
) -> Debounced<A, R>
where
    A: 'static,
    R: Clone + 'static,
{
    Debounced::new(f, wait, options)
}

/// Invoke at most once per `wait`, on both edges.
pub fn throttle<A, R>(f: impl Fn(A) -> R + 'static, wait: Duration) -> Debounced<A, R>
where
    A: 'static,
    R: Clone + 'static,
{
    Debounced::new(f, wait, DebounceOptions::throttle(wait))
}

impl<A: 'static, R: Clone + 'static> Debounced<A, R> {
    pub fn new(f: impl Fn(A) -> R + 'static, wait: Duration, mut options: DebounceOptions) -> Self {
        options.max_wait = options.max_wait.map(|m| m.max(wait));
        Self {
            inner: Rc::new(Inner {
                func: Box::new(f),
                wait,
                options,
                state: RefCell::new(State {
                    last_args: None,
                    last_call: None,
                    last_invoke: None,
                    timer: None,
                    result: None,
                }),
            }),
        }
    }

    /// Record a call. Returns the result of the latest invocation, which is
    /// this call's own result only when it invoked on the spot.
    pub fn call(&self, args: A) -> Option<R> {
        let inner = &self.inner;
        let time = now();
        let (invoking, has_timer) = {
            let mut s = inner.state.borrow_mut();
            let invoking = inner.should_invoke(&s, time);
            s.last_args = Some(args);
            s.last_call = Some(time);
            (invoking, s.timer.is_some())
        };

        if invoking {
            if !has_timer {
                return inner.leading_edge(time);
            }
            if inner.options.max_wait.is_some() {
                // Continuous burst hit max_wait: invoke now, restart the window.
                inner.clear_timer();
                inner.start_timer(inner.wait);
                return inner.invoke(time);
            }
        }
        if !has_timer {
            inner.start_timer(inner.wait);
        }
        inner.state.borrow().result.clone()
    }

    /// Drop any pending invocation and reset the burst.
    pub fn cancel(&self) {
        self.inner.clear_timer();
        let mut s = self.inner.state.borrow_mut();
        s.last_args = None;
        s.last_call = None;
        s.last_invoke = None;
    }

    /// Run a pending trailing invocation now.
    pub fn flush(&self) -> Option<R> {
        if self.inner.state.borrow().timer.is_none() {
            return self.inner.state.borrow().result.clone();
        }
        self.inner.clear_timer();
        self.inner.trailing_edge(now())
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().timer.is_some()
    }

    pub fn wait(&self) -> Duration {
        self.inner.wait
    }

    pub fn options(&self) -> DebounceOptions {
        self.inner.options
    }
}

impl<A: 'static, R: Clone + 'static> Inner<A, R> {
    fn should_invoke(&self, s: &State<A, R>, time: Instant) -> bool {
        let Some(last_call) = s.last_call else {
            return true;
        };
        let since_call = time.saturating_duration_since(last_call);
        let max_wait_hit = match (self.options.max_wait, s.last_invoke) {
            (Some(max), Some(last_invoke)) => time.saturating_duration_since(last_invoke) >= max,
            (Some(_), None) => true,
            (None, _) => false,
        };
        since_call >= self.wait || max_wait_hit
    }

    fn remaining_wait(&self, s: &State<A, R>, time: Instant) -> Duration {
        let since_call = s
            .last_call
            .map_or(Duration::ZERO, |t| time.saturating_duration_since(t));
        let waiting = self.wait.saturating_sub(since_call);
        match self.options.max_wait {
            Some(max) => {
                let since_invoke = s
                    .last_invoke
                    .map_or(Duration::ZERO, |t| time.saturating_duration_since(t));
                waiting.min(max.saturating_sub(since_invoke))
            }
            None => waiting,
        }
    }

    fn leading_edge(self: &Rc<Self>, time: Instant) -> Option<R> {
        self.state.borrow_mut().last_invoke = Some(time);
        self.start_timer(self.wait);
        if self.options.leading {
            self.invoke(time)
        } else {
            self.state.borrow().result.clone()
        }
    }

    fn trailing_edge(&self, time: Instant) -> Option<R> {
        let has_args = {
            let mut s = self.state.borrow_mut();
            s.timer = None;
            s.last_args.is_some()
        };
        if self.options.trailing && has_args {
            return self.invoke(time);
        }
        let mut s = self.state.borrow_mut();
        s.last_args = None;
        s.result.clone()
    }

    fn invoke(&self, time: Instant) -> Option<R> {
        let args = {
            let mut s = self.state.borrow_mut();
            s.last_invoke = Some(time);
            s.last_args.take()
        };
        let Some(args) = args else {
            return self.state.borrow().result.clone();
        };
        // No borrow held: the callback may call back into this wrapper.
        let result = (self.func)(args);
        self.state.borrow_mut().result = Some(result.clone());
        Some(result)
    }

    fn timer_expired(self: &Rc<Self>) {
        let time = now();
        let remaining = {
            let mut s = self.state.borrow_mut();
            s.timer = None;
            if self.should_invoke(&s, time) {
                None
            } else {
                Some(self.remaining_wait(&s, time))
            }
        };
        match remaining {
            None => {
                self.trailing_edge(time);
            }
            Some(delay) => self.start_timer(delay),
        }
    }

    fn start_timer(self: &Rc<Self>, delay: Duration) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let id = set_timeout(delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.timer_expired();
            }
        });
        self.state.borrow_mut().timer = Some(id);
    }

    fn clear_timer(&self) {
        let id = self.state.borrow_mut().timer.take();
        if let Some(id) = id {
            clear_timer(id);
        }
    }
}

impl<A, R> Drop for Inner<A, R> {
    fn drop(&mut self) {
        if let Some(id) = self.state.get_mut().timer.take() {
            clear_timer(id);
        }
    }
}
