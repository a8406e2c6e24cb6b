//! Local cells kept in sync with a value owned by the caller.

use lull_core::{Dispose, MutableRef, Setter, use_effect, use_ref, use_state};

/// Writes a [`MutableRef`] without re-rendering.
pub struct RefSetter<T: 'static>(MutableRef<T>);

impl<T: 'static> Clone for RefSetter<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> RefSetter<T> {
    pub(crate) fn new(r: MutableRef<T>) -> Self {
        Self(r)
    }

    pub fn set(&self, value: T) {
        self.0.set(value);
    }
}

/// State that follows `tracked`: every time `tracked` changes the state is
/// reset to it after the render commits. The setter can change it locally in
/// between.
pub fn use_state_tracked<T>(tracked: T) -> (T, Setter<T>)
where
    T: Clone + PartialEq + 'static,
{
    use_synced_state(tracked)
}

/// Like [`use_state_tracked`], framed as a cache: the setter writes a manual
/// override that wins until `priority` changes again.
pub fn use_cached_state<T>(priority: T) -> (T, Setter<T>)
where
    T: Clone + PartialEq + 'static,
{
    use_synced_state(priority)
}

fn use_synced_state<T>(external: T) -> (T, Setter<T>)
where
    T: Clone + PartialEq + 'static,
{
    let (value, set) = use_state(|| external.clone());
    {
        let set = set.clone();
        let next = external.clone();
        use_effect(external, move || {
            // Skip the write (and the re-render) when already in sync.
            if set.get() != next {
                set.set(next);
            }
            Dispose::noop()
        });
    }
    (value, set)
}

/// A ref that follows `tracked`. The ref is updated after commit, so code
/// running during the render that changed `tracked` still sees the old value.
pub fn use_ref_tracked<T>(tracked: T) -> (MutableRef<T>, RefSetter<T>)
where
    T: Clone + PartialEq + 'static,
{
    let r = use_ref(|| tracked.clone());
    {
        let r = r.clone();
        let next = tracked.clone();
        use_effect(tracked, move || {
            r.set(next);
            Dispose::noop()
        });
    }
    (r.clone(), RefSetter::new(r))
}
