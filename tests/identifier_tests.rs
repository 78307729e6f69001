mod common;

use checkout_session::domain::identifiers::TokenFormat;
use checkout_session::domain::session::ViewState;

#[test]
fn test_initial_identifiers_match_format() {
    let (_, controller) = common::seeded_controller(11);
    let ids = &controller.session().identifiers;

    assert!(TokenFormat::ORDER.matches(&ids.order_number));
    assert!(TokenFormat::OPERATION.matches(&ids.operation_number));
    assert!(TokenFormat::PAYMENT.matches(&ids.payment_number));
    assert_eq!(ids.order_number.len(), "ORD-".len() + 9);
}

#[test]
fn test_identifiers_fixed_within_attempt() {
    let (clock, mut controller) = common::seeded_controller(12);
    let ids = controller.session().identifiers.clone();

    common::reach_payment(&clock, &mut controller);
    assert_eq!(controller.session().identifiers, ids);
    controller.confirm_payment();
    clock.advance_millis(10_000);
    controller.poll();
    assert_eq!(controller.state(), ViewState::Success);
    assert_eq!(controller.session().identifiers, ids);
}

#[test]
fn test_identifiers_regenerated_on_every_retry() {
    let (clock, mut controller) = common::seeded_controller(13);

    for _ in 0..5 {
        common::reach_payment(&clock, &mut controller);
        controller.cancel_payment();
        clock.advance_millis(10_000);
        controller.poll();
        assert_eq!(controller.state(), ViewState::Info);

        let previous = controller.session().identifiers.clone();
        controller.retry();
        let current = &controller.session().identifiers;

        assert_ne!(current.order_number, previous.order_number);
        assert_ne!(current.operation_number, previous.operation_number);
        assert_ne!(current.payment_number, previous.payment_number);
        assert!(TokenFormat::ORDER.matches(&current.order_number));
        assert!(TokenFormat::OPERATION.matches(&current.operation_number));
        assert!(TokenFormat::PAYMENT.matches(&current.payment_number));
    }
}
