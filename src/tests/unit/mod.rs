//! Flow controller unit tests
//!
//! The tokio clock is paused in every test, so interval-driven polling is
//! deterministic: awaiting a watch-state change auto-advances time until the
//! poll task produces it.

use crate::application::PaymentFlowController;
use crate::domain::charge::{ChargeResult, PaymentStatus};
use crate::domain::customer::{CustomerField, CustomerInfo};
use crate::domain::flow::ViewState;
use crate::shared::error::FlowError;
use crate::tests::common::{fixtures, MockGateway};
use std::time::Duration;
use tokio::sync::watch;

async fn await_state<F>(rx: &mut watch::Receiver<ViewState>, pred: F) -> ViewState
where
    F: FnMut(&ViewState) -> bool,
{
    rx.wait_for(pred).await.expect("controller dropped").clone()
}

#[tokio::test(start_paused = true)]
async fn missing_required_fields_suspend_into_collection_without_network() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(3), gateway.clone());

    controller
        .start_payment(fixtures::customer_without_cpf())
        .await
        .unwrap();

    assert_eq!(
        controller.current_state(),
        ViewState::Collecting { missing: vec![CustomerField::Cpf] }
    );
    assert_eq!(gateway.create_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn blank_customer_reports_both_missing_fields() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(3), gateway.clone());

    controller
        .start_payment(CustomerInfo::default())
        .await
        .unwrap();

    assert_eq!(
        controller.current_state(),
        ViewState::Collecting {
            missing: vec![CustomerField::Name, CustomerField::Cpf]
        }
    );
    assert_eq!(gateway.create_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn resume_merges_collected_data_and_issues_the_charge() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(3), gateway.clone());

    controller
        .start_payment(fixtures::customer_without_cpf())
        .await
        .unwrap();
    assert_eq!(gateway.create_calls(), 0);

    // The form only collected the missing field
    let collected = CustomerInfo {
        cpf: "123.456.789-00".to_string(),
        ..Default::default()
    };
    controller.resume_with(collected).await.unwrap();

    assert_eq!(gateway.create_calls(), 1);
    let sent = gateway.last_request().unwrap();
    assert_eq!(sent.customer.name, "Maria Silva");
    assert_eq!(sent.customer.cpf, "123.456.789-00");
    assert!(matches!(
        controller.current_state(),
        ViewState::AwaitingPayment { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn start_is_a_noop_while_a_flow_is_in_progress() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(100), gateway.clone());

    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();
    assert_eq!(gateway.create_calls(), 1);

    // Second invocation while the poll is active: no duplicate charge
    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();
    assert_eq!(gateway.create_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn attempts_increment_monotonically_from_zero() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(100), gateway.clone());
    let mut rx = controller.subscribe();

    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();

    let state = await_state(&mut rx, |s| {
        matches!(s, ViewState::AwaitingPayment { attempt: 0, .. })
    })
    .await;
    if let ViewState::AwaitingPayment { attempt_limit, pulse, copied, .. } = state {
        assert_eq!(attempt_limit, 100);
        assert!(!pulse);
        assert!(!copied);
    }

    await_state(&mut rx, |s| {
        matches!(s, ViewState::AwaitingPayment { attempt: 1, .. })
    })
    .await;
    await_state(&mut rx, |s| {
        matches!(s, ViewState::AwaitingPayment { attempt: 2, pulse: true, .. })
    })
    .await;
    assert!(gateway.status_calls() >= 2);
}

#[tokio::test(start_paused = true)]
async fn poll_stops_exactly_at_the_attempt_limit() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(3), gateway.clone());
    let mut rx = controller.subscribe();

    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();

    await_state(&mut rx, |s| matches!(s, ViewState::Expired)).await;
    assert_eq!(gateway.status_calls(), 3);

    // No further network activity after expiration
    tokio::time::advance(Duration::from_secs(60)).await;
    tokio::task::yield_now().await;
    assert_eq!(gateway.status_calls(), 3);

    // The flow is restartable after expiring
    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();
    assert_eq!(gateway.create_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn settled_status_stops_polling_and_redirects_after_the_delay() {
    let gateway = MockGateway::new();
    gateway.script_status(Ok(PaymentStatus::Pending));
    gateway.script_status(Ok(PaymentStatus::Approved));
    let config = fixtures::test_config(100);
    let controller = PaymentFlowController::new(config.clone(), gateway.clone());
    let mut rx = controller.subscribe();

    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();

    await_state(&mut rx, |s| matches!(s, ViewState::Paid)).await;
    assert_eq!(gateway.status_calls(), 2);

    let state = await_state(&mut rx, |s| matches!(s, ViewState::Redirect { .. })).await;
    assert_eq!(
        state,
        ViewState::Redirect { url: config.checkout.next_page_url.clone() }
    );

    tokio::time::advance(Duration::from_secs(60)).await;
    tokio::task::yield_now().await;
    assert_eq!(gateway.status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn paid_status_string_settles_like_approved() {
    let gateway = MockGateway::new();
    gateway.script_status(Ok(PaymentStatus::Paid));
    let controller = PaymentFlowController::new(fixtures::test_config(100), gateway.clone());
    let mut rx = controller.subscribe();

    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();

    await_state(&mut rx, |s| matches!(s, ViewState::Redirect { .. })).await;
    assert_eq!(gateway.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn gateway_rejection_surfaces_the_message_and_allows_retry() {
    let gateway = MockGateway::new();
    gateway.script_create(Ok(ChargeResult::Rejected {
        message: "limite excedido".to_string(),
    }));
    let controller = PaymentFlowController::new(fixtures::test_config(3), gateway.clone());

    let err = controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Gateway(ref m) if m == "limite excedido"));

    match controller.current_state() {
        ViewState::Failed { reason } => assert!(reason.contains("limite excedido")),
        other => panic!("expected Failed, got {:?}", other),
    }

    // The in-progress flag was cleared; a manual retry issues a new charge
    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();
    assert_eq!(gateway.create_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_surfaces_a_generic_message() {
    let gateway = MockGateway::new();
    gateway.script_create(Err(FlowError::Transport("connection refused".to_string())));
    let controller = PaymentFlowController::new(fixtures::test_config(3), gateway.clone());

    let err = controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Transport(_)));

    match controller.current_state() {
        ViewState::Failed { reason } => {
            assert_eq!(reason, "Erro ao conectar com o servidor de pagamento.");
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(gateway.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn failing_status_check_is_swallowed_and_polling_continues() {
    let gateway = MockGateway::new();
    gateway.script_status(Err(FlowError::Transport("timeout".to_string())));
    gateway.script_status(Ok(PaymentStatus::Approved));
    let controller = PaymentFlowController::new(fixtures::test_config(100), gateway.clone());
    let mut rx = controller.subscribe();

    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();

    await_state(&mut rx, |s| matches!(s, ViewState::Redirect { .. })).await;
    assert_eq!(gateway.status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn reset_aborts_the_poll_and_a_new_flow_starts_fresh() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(100), gateway.clone());
    let mut rx = controller.subscribe();

    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();
    await_state(&mut rx, |s| {
        matches!(s, ViewState::AwaitingPayment { attempt, .. } if *attempt >= 2)
    })
    .await;

    controller.reset().await;
    assert_eq!(controller.current_state(), ViewState::Idle);

    let calls_after_reset = gateway.status_calls();
    tokio::time::advance(Duration::from_secs(60)).await;
    tokio::task::yield_now().await;
    assert_eq!(gateway.status_calls(), calls_after_reset);

    // A new flow owns a new poll counting from zero
    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();
    let state = await_state(&mut rx, |s| {
        matches!(s, ViewState::AwaitingPayment { attempt: 1, .. })
    })
    .await;
    assert!(matches!(state, ViewState::AwaitingPayment { .. }));
}

#[tokio::test(start_paused = true)]
async fn copy_acknowledgment_reverts_after_two_seconds() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(100), gateway.clone());
    let mut rx = controller.subscribe();

    controller
        .start_payment(fixtures::complete_customer())
        .await
        .unwrap();
    await_state(&mut rx, |s| matches!(s, ViewState::AwaitingPayment { .. })).await;

    controller.acknowledge_copy();
    await_state(&mut rx, |s| {
        matches!(s, ViewState::AwaitingPayment { copied: true, .. })
    })
    .await;
    await_state(&mut rx, |s| {
        matches!(s, ViewState::AwaitingPayment { copied: false, .. })
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn copy_acknowledgment_is_a_noop_outside_awaiting_payment() {
    let gateway = MockGateway::new();
    let controller = PaymentFlowController::new(fixtures::test_config(3), gateway.clone());

    controller.acknowledge_copy();
    assert_eq!(controller.current_state(), ViewState::Idle);
}
