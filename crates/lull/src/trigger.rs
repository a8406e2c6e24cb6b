//! # Debounced triggers
//!
//! A trigger wraps a callback in a debouncer that lives as long as the
//! component: it is created on the first render, reused afterwards and
//! cancelled on unmount, so a callback never runs against a torn-down
//! component.
//!
//! The callback passed on the first render is the one that runs. Later
//! renders' closures are dropped, so anything the callback reads from the
//! render that created it is frozen at that render. Capture `Setter`s or
//! `MutableRef`s to reach current values, or use
//! [`use_debounced_trigger_with_key`] to rebuild the trigger when an input
//! changes.

use std::future::Future;

use lull_core::{
    AsyncDebounced, DebouncedCall, Debounced, Duration, debounce, debounce_async, on_unmount,
    use_effect, use_memo,
};

/// Handle returned by [`use_debounced_trigger`].
pub struct Trigger<A: 'static> {
    debounced: Debounced<A, ()>,
}

impl<A: 'static> Clone for Trigger<A> {
    fn clone(&self) -> Self {
        Self {
            debounced: self.debounced.clone(),
        }
    }
}

impl<A: 'static> Trigger<A> {
    pub fn trigger(&self, args: A) {
        self.debounced.call(args);
    }

    pub fn cancel(&self) {
        self.debounced.cancel();
    }

    pub fn flush(&self) {
        self.debounced.flush();
    }

    pub fn is_pending(&self) -> bool {
        self.debounced.is_pending()
    }
}

/// Handle returned by [`use_async_debounced_trigger`].
pub struct AsyncTrigger<A: 'static, O: 'static> {
    debounced: AsyncDebounced<A, O>,
}

impl<A: 'static, O: 'static> Clone for AsyncTrigger<A, O> {
    fn clone(&self) -> Self {
        Self {
            debounced: self.debounced.clone(),
        }
    }
}

impl<A: 'static, O: 'static> AsyncTrigger<A, O> {
    /// Await the returned call to get the callback's output, including its
    /// error if it fails.
    pub fn trigger(&self, args: A) -> DebouncedCall<O> {
        self.debounced.call(args)
    }

    pub fn cancel(&self) {
        self.debounced.cancel();
    }

    pub fn flush(&self) {
        self.debounced.flush();
    }

    pub fn is_pending(&self) -> bool {
        self.debounced.is_pending()
    }
}

/// Run `cancel` when `key` changes or the component unmounts.
pub(crate) fn use_cancel_on_unmount<K: PartialEq + 'static>(
    key: K,
    cancel: impl FnOnce() + 'static,
) {
    use_effect(key, move || on_unmount(cancel));
}

pub fn use_debounced_trigger<A: 'static>(
    callback: impl Fn(A) + 'static,
    delay: Duration,
) -> Trigger<A> {
    use_debounced_trigger_with_key((), callback, delay)
}

/// [`use_debounced_trigger`] that rebuilds the trigger, with the callback of
/// the current render, whenever `key` changes. The old trigger's pending call
/// is cancelled.
pub fn use_debounced_trigger_with_key<K, A>(
    key: K,
    callback: impl Fn(A) + 'static,
    delay: Duration,
) -> Trigger<A>
where
    K: PartialEq + Clone + 'static,
    A: 'static,
{
    let debounced = use_memo(key.clone(), move || debounce(callback, delay));
    {
        let debounced = debounced.clone();
        use_cancel_on_unmount(key, move || debounced.cancel());
    }
    Trigger { debounced }
}

pub fn use_async_debounced_trigger<A, O, Fut>(
    callback: impl Fn(A) -> Fut + 'static,
    delay: Duration,
) -> AsyncTrigger<A, O>
where
    A: 'static,
    O: 'static,
    Fut: Future<Output = O> + 'static,
{
    let debounced = use_memo((), move || debounce_async(callback, delay));
    {
        let debounced = debounced.clone();
        use_cancel_on_unmount((), move || debounced.cancel());
    }
    AsyncTrigger { debounced }
}

/// The debounced function itself, created once per component.
pub fn use_debounced_fn<A, R>(f: impl Fn(A) -> R + 'static, delay: Duration) -> Debounced<A, R>
where
    A: 'static,
    R: Clone + 'static,
{
    let debounced = use_memo((), move || debounce(f, delay));
    {
        let debounced = debounced.clone();
        use_cancel_on_unmount((), move || debounced.cancel());
    }
    debounced
}

pub fn use_debounced_fn_async<A, O, Fut>(
    f: impl Fn(A) -> Fut + 'static,
    delay: Duration,
) -> AsyncDebounced<A, O>
where
    A: 'static,
    O: 'static,
    Fut: Future<Output = O> + 'static,
{
    let debounced = use_memo((), move || debounce_async(f, delay));
    {
        let debounced = debounced.clone();
        use_cancel_on_unmount((), move || debounced.cancel());
    }
    debounced
}
