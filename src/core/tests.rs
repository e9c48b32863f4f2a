//! Core domain: tests for the movement limiter.

use super::MovementLimiter;

#[test]
fn test_limiter_starts_enabled() {
    assert!(MovementLimiter::default().can_move());
}

#[test]
fn test_set_enabled_toggles_gate() {
    let mut limiter = MovementLimiter::default();
    limiter.set_enabled(false);
    assert!(!limiter.can_move());
    limiter.tick(10.0);
    assert!(!limiter.can_move(), "untimed disable must not lapse");
    limiter.set_enabled(true);
    assert!(limiter.can_move());
}

#[test]
fn test_timed_disable_lapses() {
    let mut limiter = MovementLimiter::default();
    limiter.disable_for(0.5);
    limiter.tick(0.3);
    assert!(!limiter.can_move());
    limiter.tick(0.3);
    assert!(limiter.can_move());
}

#[test]
fn test_timed_disable_replaces_pending() {
    let mut limiter = MovementLimiter::default();
    limiter.disable_for(2.0);
    limiter.tick(0.1);
    limiter.disable_for(0.2);
    limiter.tick(0.25);
    assert!(limiter.can_move());
}

#[test]
fn test_set_enabled_cancels_timed_disable() {
    let mut limiter = MovementLimiter::default();
    limiter.disable_for(1.0);
    limiter.set_enabled(false);
    limiter.tick(5.0);
    assert!(!limiter.can_move());
}
