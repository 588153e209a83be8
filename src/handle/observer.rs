use super::shared::Shared;
use crate::error::HandleError;
use std::rc::Weak;

/// Non-owning observer. Never extends the target's lifetime; answers
/// "is it still alive" and can be upgraded to a temporary [`Shared`] owner
/// while it is.
#[derive(Debug)]
pub struct Observer<T> {
    target: Weak<T>,
}

impl<T> Observer<T> {
    /// An observer with no target. Expired, count 0.
    pub fn detached() -> Self {
        Self { target: Weak::new() }
    }

    /// Observe an existing shared handle's target.
    pub fn of(shared: &Shared<T>) -> Self {
        let mut obs = Self::detached();
        obs.bind(shared);
        obs
    }

    pub(super) fn from_weak(target: Weak<T>) -> Self {
        Self { target }
    }

    /// Re-point this observer at the shared handle's target. Binding to an
    /// empty handle detaches the observer.
    pub fn bind(&mut self, shared: &Shared<T>) {
        self.target = match shared.as_rc() {
            Some(rc) => std::rc::Rc::downgrade(rc),
            None => Weak::new(),
        };
    }

    /// True once the target has been destroyed (or was never set).
    pub fn expired(&self) -> bool {
        self.target.strong_count() == 0
    }

    /// Live strong count of the target, 0 when expired.
    pub fn use_count(&self) -> usize {
        self.target.strong_count()
    }

    /// Checked upgrade to a temporary shared owner. Fails with
    /// [`HandleError::Expired`] once the target is gone; never yields a
    /// dangling handle.
    pub fn upgrade(&self) -> Result<Shared<T>, HandleError> {
        self.target
            .upgrade()
            .map(Shared::from_rc)
            .ok_or(HandleError::Expired)
    }

    /// Non-failing upgrade: an empty shared handle when expired, otherwise
    /// identical to [`Observer::upgrade`].
    pub fn lock(&self) -> Shared<T> {
        match self.target.upgrade() {
            Some(rc) => Shared::from_rc(rc),
            None => Shared::empty(),
        }
    }
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<T> Default for Observer<T> {
    fn default() -> Self {
        Self::detached()
    }
}
