use super::observer::Observer;
use std::rc::Rc;

/// One of a group of handles jointly owning a value through a strong count.
/// The value drops exactly when the last `Shared` is dropped or reset.
///
/// Wraps [`std::rc::Rc`]; `!Send + !Sync` by construction, which is the
/// single-thread contract this crate demonstrates.
#[derive(Debug)]
pub struct Shared<T> {
    inner: Option<Rc<T>>,
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Some(Rc::new(value)),
        }
    }

    /// A handle that owns nothing. Not the same thing as a sole owner:
    /// `is_sole_owner` on an empty handle is `false`.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub(super) fn from_rc(rc: Rc<T>) -> Self {
        Self { inner: Some(rc) }
    }

    pub(super) fn as_rc(&self) -> Option<&Rc<T>> {
        self.inner.as_ref()
    }

    /// Number of strong owners of the target, 0 for an empty handle.
    pub fn use_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Rc::strong_count)
    }

    /// True when this handle is the only owner. An empty handle is never
    /// sole owner.
    pub fn is_sole_owner(&self) -> bool {
        self.inner
            .as_ref()
            .map_or(false, |rc| Rc::strong_count(rc) == 1)
    }

    /// Give up this handle's share. Destroys the value if this was the last
    /// owner. Resetting an empty handle is a no-op.
    pub fn reset(&mut self) {
        self.inner = None;
    }

    pub fn get(&self) -> Option<&T> {
        self.inner.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Non-owning observer of this handle's target; detached if the handle
    /// is empty.
    pub fn downgrade(&self) -> Observer<T> {
        match &self.inner {
            Some(rc) => Observer::from_weak(Rc::downgrade(rc)),
            None => Observer::detached(),
        }
    }

    /// Do two handles own the very same allocation?
    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Clone for Shared<T> {
    /// Adds one owner: count after = count before + 1.
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Self::empty()
    }
}
