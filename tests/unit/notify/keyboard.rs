//! Unit tests for inline keyboards

use scalpwatch::notify::{ButtonAction, Keyboard};

#[test]
fn test_button_ids_round_trip() {
    for action in ButtonAction::ALL {
        assert_eq!(action.id().parse::<ButtonAction>(), Ok(action));
    }
    assert!("sell_everything".parse::<ButtonAction>().is_err());
    assert_eq!(ButtonAction::EmergencySell.to_string(), "emergency_sell");
}

#[test]
fn test_signal_keyboard() {
    assert_eq!(
        Keyboard::signal(false).actions(),
        vec![
            ButtonAction::ConfirmBuy,
            ButtonAction::CancelSignal,
            ButtonAction::ShowChart
        ]
    );
    assert_eq!(
        Keyboard::signal(true).actions(),
        vec![
            ButtonAction::ConfirmSell,
            ButtonAction::CancelSignal,
            ButtonAction::ShowChart,
            ButtonAction::EmergencySell
        ]
    );
}

#[test]
fn test_position_keyboard() {
    assert_eq!(
        Keyboard::position(false).actions(),
        vec![ButtonAction::ForceBuy, ButtonAction::RefreshStatus]
    );
    assert_eq!(
        Keyboard::position(true).actions(),
        vec![
            ButtonAction::ForceSell,
            ButtonAction::EmergencySell,
            ButtonAction::RefreshStatus
        ]
    );
}

#[test]
fn test_manual_confirm_keyboard() {
    assert_eq!(
        Keyboard::manual_confirm(true).actions(),
        vec![ButtonAction::ConfirmBuy, ButtonAction::CancelSignal]
    );
    assert_eq!(
        Keyboard::manual_confirm(false).actions(),
        vec![ButtonAction::ConfirmSell, ButtonAction::CancelSignal]
    );
}
