//! The three ownership disciplines: move-only exclusive handles,
//! reference-counted shared handles, and non-owning observers.

mod exclusive;
mod observer;
mod shared;

pub use exclusive::Exclusive;
pub use observer::Observer;
pub use shared::Shared;

/// Identity forwarding helper: consumes a handle and returns it by value,
/// so a transfer can be threaded through a call without gaining or losing
/// an owner.
pub fn pass_through<H>(handle: H) -> H {
    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_preserves_the_handle() {
        let mut src = Exclusive::new(7u32);
        let dst = pass_through(src.transfer());
        assert!(src.is_empty());
        assert_eq!(dst.get(), Some(&7));
    }

    #[test]
    fn pass_through_of_a_fresh_handle() {
        let h = pass_through(Exclusive::new("fresh"));
        assert!(!h.is_empty());
    }
}
