use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::remember;
use crate::runtime::{ComponentInner, current_component};

/// Writes a `use_state` cell and schedules a re-render of its component.
pub struct Setter<T: 'static> {
    cell: Rc<RefCell<T>>,
    owner: Weak<ComponentInner>,
}

impl<T: 'static> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            owner: self.owner.clone(),
        }
    }
}

impl<T: 'static> Setter<T> {
    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
        self.invalidate();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.cell.borrow_mut());
        self.invalidate();
    }

    /// Latest value, including writes not yet rendered.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.borrow().clone()
    }

    fn invalidate(&self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.invalidate();
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Setter").field(&*self.cell.borrow()).finish()
    }
}

/// Component state. Returns the value for this render and a setter; setting
/// re-renders the component on the next flush.
pub fn use_state<T: Clone + 'static>(init: impl FnOnce() -> T) -> (T, Setter<T>) {
    let owner = Rc::downgrade(&current_component());
    let cell = remember(|| RefCell::new(init()));
    let value = cell.borrow().clone();
    (value, Setter { cell, owner })
}

/// Mutable cell that survives re-renders. Writing it never re-renders.
pub struct MutableRef<T: 'static>(Rc<RefCell<T>>);

impl<T: 'static> Clone for MutableRef<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> MutableRef<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn current(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for MutableRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableRef").field(&*self.0.borrow()).finish()
    }
}

pub fn use_ref<T: 'static>(init: impl FnOnce() -> T) -> MutableRef<T> {
    let r = remember(|| MutableRef::new(init()));
    (*r).clone()
}

struct MemoSlot<D, T> {
    deps: Option<D>,
    value: Option<T>,
}

/// Recompute `compute` only when `deps` differs from the previous render.
pub fn use_memo<D, T>(deps: D, compute: impl FnOnce() -> T) -> T
where
    D: PartialEq + 'static,
    T: Clone + 'static,
{
    let slot = remember(|| {
        RefCell::new(MemoSlot::<D, T> {
            deps: None,
            value: None,
        })
    });

    let cached = {
        let s = slot.borrow();
        match (&s.deps, &s.value) {
            (Some(prev), Some(value)) if *prev == deps => Some(value.clone()),
            _ => None,
        }
    };
    if let Some(value) = cached {
        return value;
    }

    let value = compute();
    let mut s = slot.borrow_mut();
    s.deps = Some(deps);
    s.value = Some(value.clone());
    value
}
