//! Thread-local timer queue.
//!
//! Timers never fire on their own: the host calls [`run_due_timers`] (usually
//! through [`crate::tick`]) and every timer whose deadline has passed runs on
//! the calling thread, in deadline order.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

use crate::clock::now;

new_key_type! {
    pub struct TimerId;
}

const MIN_INTERVAL: Duration = Duration::from_millis(1);

enum Callback {
    Once(Option<Box<dyn FnOnce()>>),
    Repeat(Rc<dyn Fn()>),
}

struct Timer {
    deadline: Instant,
    period: Option<Duration>,
    seq: u64,
    callback: Callback,
}

#[derive(Default)]
struct TimerQueue {
    timers: SlotMap<TimerId, Timer>,
    next_seq: u64,
}

impl TimerQueue {
    fn insert(
        &mut self,
        deadline: Instant,
        period: Option<Duration>,
        callback: Callback,
    ) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            deadline,
            period,
            seq,
            callback,
        })
    }

    /// Earliest timer due at `at` that was scheduled before `seq_limit`.
    fn next_due(&self, at: Instant, seq_limit: u64) -> Option<TimerId> {
        self.timers
            .iter()
            .filter(|(_, t)| t.deadline <= at && t.seq < seq_limit)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(id, _)| id)
    }
}

thread_local! {
    static TIMERS: RefCell<TimerQueue> = RefCell::new(TimerQueue::default());
}

/// Run `f` once after `delay`.
pub fn set_timeout(delay: Duration, f: impl FnOnce() + 'static) -> TimerId {
    let deadline = now() + delay;
    TIMERS.with(|q| {
        q.borrow_mut()
            .insert(deadline, None, Callback::Once(Some(Box::new(f))))
    })
}

/// Run `f` every `period` until cleared. Periods below 1ms are clamped.
pub fn set_interval(period: Duration, f: impl Fn() + 'static) -> TimerId {
    let period = period.max(MIN_INTERVAL);
    let deadline = now() + period;
    TIMERS.with(|q| {
        q.borrow_mut()
            .insert(deadline, Some(period), Callback::Repeat(Rc::new(f)))
    })
}

/// Returns `true` if the timer was still scheduled.
pub fn clear_timer(id: TimerId) -> bool {
    // try_with: handles may be dropped while thread locals are torn down.
    TIMERS
        .try_with(|q| q.borrow_mut().timers.remove(id).is_some())
        .unwrap_or(false)
}

pub fn is_scheduled(id: TimerId) -> bool {
    TIMERS.with(|q| q.borrow().timers.contains_key(id))
}

pub fn pending_timers() -> usize {
    TIMERS.with(|q| q.borrow().timers.len())
}

pub fn next_deadline() -> Option<Instant> {
    TIMERS.with(|q| q.borrow().timers.values().map(|t| t.deadline).min())
}

/// Fire every timer that is due now. Timers scheduled while this runs (and
/// interval re-arms) wait for the next call. Returns how many fired.
pub fn run_due_timers() -> usize {
    run_timers_due_at(now())
}

/// Like [`run_due_timers`], with "now" pinned to `at`. Callbacks that move
/// the clock do not make more timers due in this call.
pub fn run_timers_due_at(at: Instant) -> usize {
    let seq_limit = TIMERS.with(|q| q.borrow().next_seq);
    let mut fired = 0;

    loop {
        let job = TIMERS.with(|q| {
            let mut q = q.borrow_mut();
            let id = q.next_due(at, seq_limit)?;
            let (deadline, period) = {
                let t = &q.timers[id];
                (t.deadline, t.period)
            };
            match period {
                Some(period) => {
                    let seq = q.next_seq;
                    q.next_seq += 1;
                    let t = &mut q.timers[id];
                    t.deadline = deadline + period;
                    t.seq = seq;
                    match &t.callback {
                        Callback::Repeat(f) => {
                            let f = f.clone();
                            Some(Some(Box::new(move || f()) as Box<dyn FnOnce()>))
                        }
                        Callback::Once(_) => Some(None),
                    }
                }
                None => match q.timers.remove(id).map(|t| t.callback) {
                    Some(Callback::Once(f)) => Some(f),
                    _ => Some(None),
                },
            }
        });

        let Some(job) = job else { break };
        if let Some(job) = job {
            log::trace!("timer fired");
            job();
            fired += 1;
        }
    }

    fired
}
