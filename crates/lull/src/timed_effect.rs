use lull_core::runtime::EffectPhase;
use lull_core::{
    DebounceOptions, Dispose, Duration, debounce_with, use_effect, use_layout_effect, use_memo,
};

use crate::trigger::use_cancel_on_unmount;

/// Run `callback` debounced by `delay` whenever `deps` changes (and after
/// mount).
pub fn use_debounced_effect<D: PartialEq + 'static>(
    callback: impl Fn() + 'static,
    delay: Duration,
    deps: D,
) {
    use_rate_limited_effect(
        EffectPhase::Passive,
        DebounceOptions::default(),
        callback,
        delay,
        deps,
    );
}

/// Run `callback` at most once per `wait` whenever `deps` changes.
pub fn use_throttled_effect<D: PartialEq + 'static>(
    callback: impl Fn() + 'static,
    wait: Duration,
    deps: D,
) {
    use_rate_limited_effect(
        EffectPhase::Passive,
        DebounceOptions::throttle(wait),
        callback,
        wait,
        deps,
    );
}

/// [`use_debounced_effect`] scheduled from the layout phase.
pub fn use_debounced_layout_effect<D: PartialEq + 'static>(
    callback: impl Fn() + 'static,
    delay: Duration,
    deps: D,
) {
    use_rate_limited_effect(
        EffectPhase::Layout,
        DebounceOptions::default(),
        callback,
        delay,
        deps,
    );
}

/// [`use_throttled_effect`] scheduled from the layout phase. A leading call
/// therefore lands before paint.
pub fn use_throttled_layout_effect<D: PartialEq + 'static>(
    callback: impl Fn() + 'static,
    wait: Duration,
    deps: D,
) {
    use_rate_limited_effect(
        EffectPhase::Layout,
        DebounceOptions::throttle(wait),
        callback,
        wait,
        deps,
    );
}

fn use_rate_limited_effect<D: PartialEq + 'static>(
    phase: EffectPhase,
    options: DebounceOptions,
    callback: impl Fn() + 'static,
    wait: Duration,
    deps: D,
) {
    let handler = use_memo((), move || {
        debounce_with(move |()| callback(), wait, options)
    });

    let run = {
        let handler = handler.clone();
        move || {
            handler.call(());
            Dispose::noop()
        }
    };
    match phase {
        EffectPhase::Layout => use_layout_effect(deps, run),
        EffectPhase::Passive => use_effect(deps, run),
    }

    use_cancel_on_unmount((), move || handler.cancel());
}
