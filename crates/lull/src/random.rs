use lull_core::{
    Duration, Setter, clear_timer, on_unmount, set_interval, use_effect, use_memo, use_state,
};

/// A random number held in state, used as a cache-busting key.
#[derive(Clone)]
pub struct RandomState {
    pub value: f64,
    setter: Setter<f64>,
}

impl RandomState {
    /// Scale the value by a fresh draw from `[0, 1)`.
    ///
    /// The value only ever shrinks and eventually reaches zero, after which
    /// randomizing no longer changes it.
    pub fn randomize(&self) {
        self.randomizer().randomize();
    }

    /// A handle that can outlive this render, e.g. inside a timer.
    pub fn randomizer(&self) -> Randomizer {
        Randomizer(self.setter.clone())
    }
}

#[derive(Clone)]
pub struct Randomizer(Setter<f64>);

impl Randomizer {
    pub fn randomize(&self) {
        let draw: f64 = rand::random();
        self.0.update(|v| *v *= draw);
    }
}

pub fn use_random_state() -> RandomState {
    let (value, setter) = use_state(rand::random::<f64>);
    RandomState { value, setter }
}

/// `compute`'s value, recomputed every `interval`.
///
/// Built on [`use_random_state`]: an interval randomizes the state and the
/// memo is keyed on it. The interval is registered once per component (and
/// again if `interval` changes) and cleared on unmount.
///
/// Because [`RandomState::randomize`] only shrinks the value, it underflows
/// to `0.0` after several hundred intervals. From then on the memo keeps its
/// last value for good, even though the interval still re-renders the
/// component.
pub fn use_interval_memo<T: Clone + 'static>(compute: impl FnOnce() -> T, interval: Duration) -> T {
    let random = use_random_state();
    let randomizer = random.randomizer();
    use_effect(interval, move || {
        let id = set_interval(interval, move || randomizer.randomize());
        on_unmount(move || {
            clear_timer(id);
        })
    });

    use_memo(random.value.to_bits(), compute)
}
