//! Unit tests for the single-position tracker

use chrono::{Duration, TimeZone, Utc};
use scalpwatch::position::{PositionError, PositionTracker};

fn entry_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

#[test]
fn test_new_tracker_is_flat() {
    let tracker = PositionTracker::new();
    assert!(!tracker.is_open());
    assert!(tracker.position().is_none());
    assert!(tracker.unrealized_profit_percent(100.0).is_none());
    assert!(tracker.holding_minutes(entry_time()).is_none());
}

#[test]
fn test_open_then_profit() {
    let mut tracker = PositionTracker::new();
    let position = tracker.open(100.0, entry_time()).unwrap();

    assert_eq!(position.entry_price, 100.0);
    assert!(tracker.is_open());
    let pnl = tracker.unrealized_profit_percent(103.0).unwrap();
    assert!((pnl - 3.0).abs() < 1e-9);
}

#[test]
fn test_open_twice_fails_without_mutation() {
    let mut tracker = PositionTracker::new();
    tracker.open(100.0, entry_time()).unwrap();

    let err = tracker
        .open(120.0, entry_time() + Duration::minutes(5))
        .unwrap_err();
    assert_eq!(err, PositionError::AlreadyOpen { entry_price: 100.0 });
    let position = tracker.position().unwrap();
    assert_eq!(position.entry_price, 100.0);
    assert_eq!(position.entry_time, entry_time());
}

#[test]
fn test_close_while_flat_fails() {
    let mut tracker = PositionTracker::new();
    assert_eq!(tracker.close(100.0, entry_time()), Err(PositionError::NotOpen));
    assert!(!tracker.is_open());
}

#[test]
fn test_close_reports_profit_and_holding() {
    let mut tracker = PositionTracker::new();
    tracker.open(100.0, entry_time()).unwrap();

    let closed = tracker
        .close(103.0, entry_time() + Duration::minutes(10))
        .unwrap();
    assert!((closed.profit_percent - 3.0).abs() < 1e-9);
    assert!((closed.holding_minutes - 10.0).abs() < 1e-9);
    assert_eq!(closed.entry_price, 100.0);
    assert_eq!(closed.exit_price, 103.0);
    assert!(!tracker.is_open());

    // reopening after a close is allowed
    assert!(tracker.open(101.0, entry_time()).is_ok());
}

#[test]
fn test_invalid_prices_rejected() {
    let mut tracker = PositionTracker::new();
    assert_eq!(
        tracker.open(0.0, entry_time()),
        Err(PositionError::InvalidPrice(0.0))
    );
    assert!(tracker.open(f64::NAN, entry_time()).is_err());
    assert!(!tracker.is_open());

    tracker.open(100.0, entry_time()).unwrap();
    assert!(tracker.close(-1.0, entry_time()).is_err());
    assert!(tracker.is_open());
}

#[test]
fn test_holding_minutes_fractional() {
    let mut tracker = PositionTracker::new();
    tracker.open(50.0, entry_time()).unwrap();
    let held = tracker
        .holding_minutes(entry_time() + Duration::seconds(90))
        .unwrap();
    assert!((held - 1.5).abs() < 1e-9);
}
