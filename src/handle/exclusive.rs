/// Move-only owning handle. At any instant a value has at most one
/// `Exclusive` referencing it: the type has no `Clone` impl, and every
/// transfer empties the source.
#[derive(Debug)]
pub struct Exclusive<T> {
    slot: Option<Box<T>>,
}

impl<T> Exclusive<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Some(Box::new(value)),
        }
    }

    /// A handle that owns nothing.
    pub fn empty() -> Self {
        Self { slot: None }
    }

    /// Move ownership out of this handle into a new one. The source is left
    /// empty; transferring from an empty handle yields an empty handle.
    pub fn transfer(&mut self) -> Exclusive<T> {
        Exclusive {
            slot: self.slot.take(),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.slot.as_deref_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Consume the handle and give the value back, if any.
    pub fn take(self) -> Option<T> {
        self.slot.map(|boxed| *boxed)
    }
}

impl<T> Default for Exclusive<T> {
    fn default() -> Self {
        Self::empty()
    }
}
