use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::error::RuntimeError;
use crate::scope::Scope;

/// Re-render passes `flush` allows before it gives up on a component tree
/// that keeps invalidating itself.
pub const MAX_RENDER_PASSES: usize = 64;

thread_local! {
    static CURRENT: RefCell<Vec<Rc<ComponentInner>>> = const { RefCell::new(Vec::new()) };
    static DIRTY: RefCell<Vec<Weak<ComponentInner>>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
}

pub(crate) type Job = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectPhase {
    /// Runs during commit, before paint.
    Layout,
    /// Runs during commit, after paint.
    Passive,
}

/// Slot table of one component instance.
#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

pub(crate) struct ComponentInner {
    id: u64,
    composer: RefCell<Composer>,
    scope: RefCell<Scope>,
    render: RefCell<Option<Box<dyn FnMut()>>>,
    paint: RefCell<Option<Box<dyn FnMut()>>>,
    layout_queue: RefCell<SmallVec<[Job; 4]>>,
    effect_queue: RefCell<SmallVec<[Job; 4]>>,
    dirty: Cell<bool>,
    rendering: Cell<bool>,
    mounted: Cell<bool>,
    renders: Cell<u64>,
}

impl ComponentInner {
    fn new() -> Self {
        let id = NEXT_ID.with(|n| {
            let id = n.get();
            n.set(id + 1);
            id
        });
        Self {
            id,
            composer: RefCell::new(Composer::default()),
            scope: RefCell::new(Scope::new()),
            render: RefCell::new(None),
            paint: RefCell::new(None),
            layout_queue: RefCell::new(SmallVec::new()),
            effect_queue: RefCell::new(SmallVec::new()),
            dirty: Cell::new(false),
            rendering: Cell::new(false),
            mounted: Cell::new(true),
            renders: Cell::new(0),
        }
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Schedule a re-render on the next `flush`.
    pub(crate) fn invalidate(self: &Rc<Self>) {
        if !self.mounted.get() {
            log::trace!("component {} is unmounted; ignoring state update", self.id);
            return;
        }
        if !self.dirty.replace(true) {
            DIRTY.with(|d| d.borrow_mut().push(Rc::downgrade(self)));
        }
    }

    pub(crate) fn enqueue(&self, phase: EffectPhase, job: Job) {
        match phase {
            EffectPhase::Layout => self.layout_queue.borrow_mut().push(job),
            EffectPhase::Passive => self.effect_queue.borrow_mut().push(job),
        }
    }

    pub(crate) fn with_composer<R>(&self, f: impl FnOnce(&mut Composer) -> R) -> R {
        f(&mut self.composer.borrow_mut())
    }

    fn render_pass<R>(self: &Rc<Self>, f: impl FnOnce() -> R) -> R {
        let guard = ComposeGuard::begin(self.clone());
        let scope = guard.scope().clone();
        let out = scope.run(f);
        drop(guard);
        self.renders.set(self.renders.get() + 1);
        out
    }

    fn render_and_commit(self: &Rc<Self>) {
        if !self.mounted.get() {
            return;
        }
        if self.rendering.get() {
            // Re-render requested from inside our own render; pick it up next flush.
            self.invalidate();
            return;
        }
        self.dirty.set(false);
        let render = self.render.borrow_mut().take();
        if let Some(mut render) = render {
            self.rendering.set(true);
            self.render_pass(|| render());
            self.rendering.set(false);
            *self.render.borrow_mut() = Some(render);
        }
        self.commit();
    }

    fn commit(&self) {
        let layout = std::mem::take(&mut *self.layout_queue.borrow_mut());
        for job in layout {
            job();
        }

        let paint = self.paint.borrow_mut().take();
        if let Some(mut paint) = paint {
            paint();
            let mut slot = self.paint.borrow_mut();
            if slot.is_none() {
                *slot = Some(paint);
            }
        }

        let passive = std::mem::take(&mut *self.effect_queue.borrow_mut());
        for job in passive {
            job();
        }
    }

    fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        log::debug!("unmounting component {}", self.id);
        self.layout_queue.borrow_mut().clear();
        self.effect_queue.borrow_mut().clear();
        let scope = std::mem::take(&mut *self.scope.borrow_mut());
        scope.dispose();

        // Drop slots outside the borrow: their destructors may touch the runtime.
        let composer = std::mem::take(&mut *self.composer.borrow_mut());
        drop(composer);
        self.render.borrow_mut().take();
        self.paint.borrow_mut().take();
    }
}

/// Makes a component current for the duration of a render.
pub struct ComposeGuard {
    scope: Scope,
}

impl ComposeGuard {
    pub(crate) fn begin(component: Rc<ComponentInner>) -> Self {
        component.composer.borrow_mut().cursor = 0;
        let scope = component.scope.borrow().clone();
        CURRENT.with(|c| c.borrow_mut().push(component));
        ComposeGuard { scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        CURRENT.with(|c| {
            c.borrow_mut().pop();
        });
    }
}

/// The component currently rendering.
///
/// # Panics
/// When called outside a component render.
pub(crate) fn current_component() -> Rc<ComponentInner> {
    match CURRENT.with(|c| c.borrow().last().cloned()) {
        Some(c) => c,
        None => panic!("hooks may only be called while a component is rendering"),
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let component = current_component();
    let existing = component.with_composer(|c| {
        let cursor = c.cursor;
        c.cursor += 1;
        match c.slots.get(cursor) {
            Some(slot) => match slot.downcast_ref::<Rc<T>>() {
                Some(rc) => Ok(rc.clone()),
                None => {
                    log::warn!(
                        "remember: slot {} type changed; replacing. \
                         If this is due to conditional hooks, prefer remember_with_key.",
                        cursor
                    );
                    Err(Some(cursor))
                }
            },
            None => Err(None),
        }
    });

    match existing {
        Ok(rc) => rc,
        Err(replace_at) => {
            // `init` runs with the composer unborrowed so it may touch the runtime.
            let rc: Rc<T> = Rc::new(init());
            component.with_composer(|c| match replace_at {
                Some(at) => c.slots[at] = Box::new(rc.clone()),
                None => c.slots.push(Box::new(rc.clone())),
            });
            rc
        }
    }
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let component = current_component();
    let key = key.into();
    let existing = component.with_composer(|c| {
        c.keyed_slots.get(&key).and_then(|slot| {
            let rc = slot.downcast_ref::<Rc<T>>().cloned();
            if rc.is_none() {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
            rc
        })
    });
    if let Some(rc) = existing {
        return rc;
    }

    let rc: Rc<T> = Rc::new(init());
    component.with_composer(|c| c.keyed_slots.insert(key, Box::new(rc.clone())));
    rc
}

/// A mounted component instance. Dropping the host unmounts it.
pub struct Host<R: 'static> {
    inner: Rc<ComponentInner>,
    output: Rc<RefCell<R>>,
}

impl<R: 'static> Host<R> {
    /// Render `render` once, commit, and settle any state its effects set.
    pub fn mount(render: impl FnMut() -> R + 'static) -> Self {
        let inner = Rc::new(ComponentInner::new());
        log::debug!("mounting component {}", inner.id);

        let render = Rc::new(RefCell::new(render));
        let first = inner.render_pass(|| (&mut *render.borrow_mut())());
        let output = Rc::new(RefCell::new(first));
        {
            let output = output.clone();
            *inner.render.borrow_mut() = Some(Box::new(move || {
                let next = (&mut *render.borrow_mut())();
                *output.borrow_mut() = next;
            }));
        }
        inner.commit();
        settle();

        Host { inner, output }
    }

    /// Render again, as a parent does when the inputs captured by the render
    /// closure change.
    pub fn rerender(&self) {
        self.inner.render_and_commit();
        settle();
    }

    pub fn output(&self) -> R
    where
        R: Clone,
    {
        self.output.borrow().clone()
    }

    pub fn with_output<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.output.borrow())
    }

    /// Called on every commit after layout effects and before passive effects.
    pub fn on_paint(&self, f: impl FnMut() + 'static) {
        *self.inner.paint.borrow_mut() = Some(Box::new(f));
    }

    pub fn unmount(&self) {
        self.inner.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    pub fn render_count(&self) -> u64 {
        self.inner.renders.get()
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }
}

impl<R: 'static> Drop for Host<R> {
    fn drop(&mut self) {
        self.inner.unmount();
    }
}

fn settle() {
    if let Err(e) = flush() {
        log::error!("{e}");
    }
}

/// Re-render dirty components until none are left. Returns the number of
/// renders performed.
pub fn flush() -> Result<usize, RuntimeError> {
    let mut rendered = 0;
    for _ in 0..MAX_RENDER_PASSES {
        let dirty = DIRTY.with(|d| std::mem::take(&mut *d.borrow_mut()));
        if dirty.is_empty() {
            return Ok(rendered);
        }
        for component in dirty.iter().filter_map(Weak::upgrade) {
            if component.is_mounted() && component.dirty.get() {
                component.render_and_commit();
                rendered += 1;
            }
        }
    }

    // Drop the backlog so the next flush starts clean.
    DIRTY.with(|d| {
        for component in d.borrow_mut().drain(..).filter_map(|w| w.upgrade()) {
            component.dirty.set(false);
        }
    });
    Err(RuntimeError::RenderLoop {
        passes: MAX_RENDER_PASSES,
    })
}

/// What one `tick` did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tick {
    pub timers_fired: usize,
    pub tasks_completed: usize,
    pub renders: usize,
}

/// Fire due timers, drive local tasks, then re-render dirty components.
/// Repeats while any of those made progress. Only timers due when the tick
/// starts fire, however long its callbacks and renders take.
pub fn tick() -> Result<Tick, RuntimeError> {
    let at = crate::clock::now();
    let mut total = Tick::default();
    loop {
        let timers_fired = crate::timers::run_timers_due_at(at);
        let tasks_completed = crate::executor::run_until_stalled();
        let renders = flush()?;
        total.timers_fired += timers_fired;
        total.tasks_completed += tasks_completed;
        total.renders += renders;
        if timers_fired == 0 && tasks_completed == 0 && renders == 0 {
            return Ok(total);
        }
    }
}
