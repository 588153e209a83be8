// Edge cases around empty and expired handles: none of these are errors
// with a code, the types just answer "nothing there".

use own_lab::error::HandleError;
use own_lab::handle::{pass_through, Exclusive, Observer, Shared};

#[test]
fn test_empty_exclusive_handle() {
    let mut e = Exclusive::<u8>::empty();
    assert!(e.is_empty());
    assert_eq!(e.get(), None);
    assert_eq!(e.get_mut(), None);

    // transferring nothing yields nothing
    let moved = e.transfer();
    assert!(moved.is_empty());
    assert_eq!(moved.take(), None);
}

#[test]
fn test_forwarding_an_empty_handle() {
    let e = pass_through(Exclusive::<u8>::empty());
    assert!(e.is_empty());
}

#[test]
fn test_empty_shared_handle_is_never_sole_owner() {
    let s = Shared::<u8>::empty();
    assert!(!s.is_sole_owner());
    assert_eq!(s.use_count(), 0);
    assert_eq!(s.get(), None);
}

#[test]
fn test_reset_on_empty_shared_is_a_noop() {
    let mut s = Shared::<u8>::empty();
    s.reset();
    s.reset();
    assert!(s.is_empty());
    assert_eq!(s.use_count(), 0);
}

#[test]
fn test_clone_of_empty_shared_stays_empty() {
    let s = Shared::<u8>::empty();
    let c = s.clone();
    assert!(c.is_empty());
    assert_eq!(c.use_count(), 0);
}

#[test]
fn test_downgrade_of_empty_shared_is_detached() {
    let s = Shared::<u8>::empty();
    let obs = s.downgrade();
    assert!(obs.expired());
    assert_eq!(obs.use_count(), 0);
}

#[test]
fn test_expired_observer_upgrade_yields_error_not_dangling() {
    let mut s = Shared::new(3u8);
    let obs = Observer::of(&s);
    s.reset();

    match obs.upgrade() {
        Err(HandleError::Expired) => {}
        Ok(_) => panic!("upgrade of an expired observer must fail"),
    }
    assert!(obs.lock().is_empty());
    assert!(!obs.lock().is_sole_owner());
}

#[test]
fn test_cloned_observer_shares_expiry() {
    let mut s = Shared::new(1u8);
    let obs = Observer::of(&s);
    let twin = obs.clone();
    s.reset();
    assert!(obs.expired());
    assert!(twin.expired());
}
