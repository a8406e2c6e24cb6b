use std::fmt::Display;
use std::future::Future;

use lull_core::{
    Dispose, Duration, Setter, TriggerError, debounce, debounce_async, spawn_local, use_effect,
    use_memo, use_state,
};

use crate::trigger::use_cancel_on_unmount;

/// The value the change-detecting effect is keyed on.
///
/// With `memo` the key is a memoized snapshot of the value. The snapshot is
/// recomputed from the value itself, so it always equals it and both modes
/// fire on the same renders. The hook is called either way to keep the hook
/// order stable if `memo` flips between renders.
fn use_change_key<T: Clone + PartialEq + 'static>(value: &Option<T>, memo: bool) -> Option<T> {
    let snapshot = {
        let value = value.clone();
        use_memo(value.clone(), move || value)
    };
    if memo { snapshot } else { value.clone() }
}

/// Local state whose changes reach `callback`, debounced by `delay`.
///
/// The value starts at `initial`. The callback also sees the initial value
/// once after mount. Pending calls are dropped on unmount.
pub fn use_debounced_state_effect<T>(
    callback: impl Fn(Option<T>) + 'static,
    delay: Duration,
    initial: Option<T>,
    memo: bool,
) -> (Option<T>, Setter<Option<T>>)
where
    T: Clone + PartialEq + 'static,
{
    let (value, set) = use_state(|| initial);
    let handler = use_memo((), move || debounce(callback, delay));

    let key = use_change_key(&value, memo);
    {
        let handler = handler.clone();
        let value = value.clone();
        use_effect(key, move || {
            handler.call(value);
            Dispose::noop()
        });
    }
    use_cancel_on_unmount((), move || handler.cancel());

    (value, set)
}

/// Async [`use_debounced_state_effect`]. Nobody awaits these calls, so a
/// failing callback is logged.
pub fn use_async_debounced_state_effect<T, Fut, E>(
    callback: impl Fn(Option<T>) -> Fut + 'static,
    delay: Duration,
    initial: Option<T>,
    memo: bool,
) -> (Option<T>, Setter<Option<T>>)
where
    T: Clone + PartialEq + 'static,
    Fut: Future<Output = Result<(), E>> + 'static,
    E: Display + 'static,
{
    let (value, set) = use_state(|| initial);
    let handler = use_memo((), move || debounce_async(callback, delay));

    let key = use_change_key(&value, memo);
    {
        let handler = handler.clone();
        let value = value.clone();
        use_effect(key, move || {
            let call = handler.call(value);
            let watched = spawn_local(async move {
                match call.await {
                    Ok(Ok(())) | Err(TriggerError::Superseded) => {}
                    Ok(Err(e)) => log::warn!("debounced state effect failed: {e}"),
                    Err(TriggerError::Cancelled) => {
                        log::trace!("debounced state effect cancelled")
                    }
                }
            });
            if let Err(e) = watched {
                log::error!("{e}");
            }
            Dispose::noop()
        });
    }
    use_cancel_on_unmount((), move || handler.cancel());

    (value, set)
}
