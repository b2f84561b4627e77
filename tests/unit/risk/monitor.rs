//! Unit tests for risk classification

use chrono::{Duration, TimeZone, Utc};
use scalpwatch::position::Position;
use scalpwatch::risk::{AlertKind, RiskMonitor, RiskThresholds};

fn monitor() -> RiskMonitor {
    RiskMonitor::default()
}

#[test]
fn test_critical_beats_heartbeat() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    let position = Position {
        entry_price: 100.0,
        entry_time: start,
    };

    let alert = monitor()
        .evaluate(&position, 94.0, start + Duration::minutes(60) + Duration::seconds(12))
        .unwrap();
    assert_eq!(alert.kind, AlertKind::Critical);
    assert!((alert.profit_percent + 6.0).abs() < 1e-9);
    assert_eq!(alert.price, 94.0);
}

#[test]
fn test_priority_order() {
    let m = monitor();
    assert_eq!(m.classify(-6.0, 45.0), Some(AlertKind::Critical));
    assert_eq!(m.classify(-4.0, 60.5), Some(AlertKind::StopLossWarning));
    assert_eq!(m.classify(6.0, 60.5), Some(AlertKind::TakeProfitWarning));
    assert_eq!(m.classify(1.0, 60.5), Some(AlertKind::Heartbeat));
    assert_eq!(m.classify(1.0, 45.0), None);
}

#[test]
fn test_thresholds_are_strict() {
    let m = monitor();
    assert_eq!(m.classify(-5.0, 1.0), Some(AlertKind::StopLossWarning));
    assert_eq!(m.classify(-3.0, 1.0), None);
    assert_eq!(m.classify(5.0, 1.0), None);
    assert_eq!(m.classify(5.01, 1.0), Some(AlertKind::TakeProfitWarning));
}

#[test]
fn test_heartbeat_cadence() {
    let m = monitor();
    for minutes in [30.5, 60.2, 90.9, 120.0] {
        assert_eq!(m.classify(0.0, minutes), Some(AlertKind::Heartbeat), "{}", minutes);
    }
    for minutes in [0.0, 10.0, 29.9, 30.0, 31.0, 45.0, 59.0, 61.0] {
        assert_eq!(m.classify(0.0, minutes), None, "{}", minutes);
    }
}

#[test]
fn test_keyboard_kinds() {
    assert!(AlertKind::Critical.wants_keyboard());
    assert!(AlertKind::TakeProfitWarning.wants_keyboard());
    assert!(!AlertKind::StopLossWarning.wants_keyboard());
    assert!(!AlertKind::Heartbeat.wants_keyboard());
}

#[test]
fn test_protective_levels() {
    let levels = RiskThresholds::default().protective_levels(100.0);
    assert!((levels.stop_loss - 97.0).abs() < 1e-9);
    assert!((levels.take_profit - 103.0).abs() < 1e-9);
    assert_eq!(levels.pct, 3.0);
}
