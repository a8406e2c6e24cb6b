use lull_core::{Dispose, MutableRef, use_effect, use_ref};

use crate::tracked::RefSetter;

/// A ref plus its setter, handed to `effect` whenever `deps` changes. Writes
/// through either never re-render.
pub fn use_ref_effect<T, D>(
    initial: T,
    effect: impl FnOnce(&MutableRef<T>, &RefSetter<T>) + 'static,
    deps: D,
) -> (MutableRef<T>, RefSetter<T>)
where
    T: 'static,
    D: PartialEq + 'static,
{
    let r = use_ref(|| initial);
    let setter = RefSetter::new(r.clone());
    {
        let r = r.clone();
        let setter = setter.clone();
        use_effect(deps, move || {
            effect(&r, &setter);
            Dispose::noop()
        });
    }
    (r, setter)
}

/// [`use_ref_effect`] with a ref that starts empty.
pub fn use_empty_ref_effect<T, D>(
    effect: impl FnOnce(&MutableRef<Option<T>>, &RefSetter<Option<T>>) + 'static,
    deps: D,
) -> (MutableRef<Option<T>>, RefSetter<Option<T>>)
where
    T: 'static,
    D: PartialEq + 'static,
{
    use_ref_effect(None, effect, deps)
}
