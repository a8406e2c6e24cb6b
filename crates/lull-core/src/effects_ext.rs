use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::runtime::{EffectPhase, current_component};
use crate::{Dispose, on_unmount, remember, scoped_effect};

struct EffectSlot<D> {
    last_deps: RefCell<Option<D>>,
    cleanup: Rc<RefCell<Option<Dispose>>>,
    installed: Cell<bool>,
}

/// Run `effect` after paint whenever `deps` changes (and on mount). Its
/// `Dispose` runs before the next run and on unmount. Use `()` as `deps` to
/// run once.
pub fn use_effect<D: PartialEq + 'static>(deps: D, effect: impl FnOnce() -> Dispose + 'static) {
    schedule_effect(EffectPhase::Passive, deps, effect);
}

/// Like [`use_effect`] but runs during commit before paint.
pub fn use_layout_effect<D: PartialEq + 'static>(
    deps: D,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    schedule_effect(EffectPhase::Layout, deps, effect);
}

fn schedule_effect<D: PartialEq + 'static>(
    phase: EffectPhase,
    deps: D,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    let slot = remember(|| EffectSlot::<D> {
        last_deps: RefCell::new(None),
        cleanup: Rc::new(RefCell::new(None)),
        installed: Cell::new(false),
    });

    // Install a single unmount disposer for this callsite.
    if !slot.installed.replace(true) {
        let cleanup = slot.cleanup.clone();
        scoped_effect(move || {
            on_unmount(move || {
                let d = cleanup.borrow_mut().take();
                if let Some(d) = d {
                    d.run();
                }
            })
        });
    }

    let changed = slot.last_deps.borrow().as_ref() != Some(&deps);
    if !changed {
        return;
    }
    *slot.last_deps.borrow_mut() = Some(deps);

    log::trace!("effect scheduled ({:?})", phase);
    let cleanup = slot.cleanup.clone();
    current_component().enqueue(
        phase,
        Box::new(move || {
            let prev = cleanup.borrow_mut().take();
            if let Some(d) = prev {
                d.run();
            }
            let d = effect();
            *cleanup.borrow_mut() = Some(d);
        }),
    );
}

