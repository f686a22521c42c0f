//! Payment flow controller
//!
//! Orchestrates one PIX checkout: customer-data collection, charge creation at
//! the gateway, payable-code presentation, and settlement polling. The
//! controller never renders anything; it publishes [`ViewState`] transitions
//! over a watch channel and the host's rendering layer subscribes.
//!
//! Concurrency model: one controller instance owns at most one poll task.
//! Starting a new charge aborts any prior poll before spawning the next, and
//! the charge-creation path is guarded by an in-progress flag so rapid
//! repeated invocations cannot issue duplicate charges.

use crate::config::FlowConfig;
use crate::domain::charge::{ChargeRequest, ChargeResult};
use crate::domain::customer::CustomerInfo;
use crate::domain::flow::{PollState, ViewState};
use crate::domain::ports::PaymentGateway;
use crate::shared::error::FlowError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// How long the copy acknowledgment stays visible before reverting
const COPY_ACK_RESET: Duration = Duration::from_secs(2);

/// User-facing message for transport-level charge failures
const CONNECTIVITY_MESSAGE: &str = "Erro ao conectar com o servidor de pagamento.";

/// Drives a single PIX checkout flow against a payment gateway
pub struct PaymentFlowController {
    config: Arc<FlowConfig>,
    gateway: Arc<dyn PaymentGateway>,
    state: watch::Sender<ViewState>,
    in_progress: AtomicBool,
    /// The one active poll task; replaced (and the old one aborted) per charge
    poll_task: Mutex<Option<JoinHandle<()>>>,
    /// Partial customer data held while the collection form is up
    pending_customer: Mutex<Option<CustomerInfo>>,
}

impl PaymentFlowController {
    /// Create a controller for the given gateway
    pub fn new(config: Arc<FlowConfig>, gateway: Arc<dyn PaymentGateway>) -> Arc<Self> {
        let (state, _) = watch::channel(ViewState::Idle);
        Arc::new(Self {
            config,
            gateway,
            state,
            in_progress: AtomicBool::new(false),
            poll_task: Mutex::new(None),
            pending_customer: Mutex::new(None),
        })
    }

    /// Subscribe to view-state transitions
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Current view state
    pub fn current_state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Begin a payment for the given customer
    ///
    /// A call while a flow is already processing is a no-op. If required
    /// fields are missing the flow suspends into `Collecting` and releases
    /// the in-progress flag; the host collects data and calls
    /// [`resume_with`](Self::resume_with).
    pub async fn start_payment(self: &Arc<Self>, customer: CustomerInfo) -> crate::Result<()> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Payment flow already in progress, ignoring start request");
            return Ok(());
        }

        let missing = customer.missing_fields();
        if !missing.is_empty() {
            info!(missing = ?missing, "Customer data incomplete, requesting collection");
            *self.pending_customer.lock().await = Some(customer);
            self.state.send_replace(ViewState::Collecting { missing });
            // Release so the form callback can re-enter
            self.in_progress.store(false, Ordering::SeqCst);
            return Ok(());
        }

        self.pending_customer.lock().await.take();
        self.state.send_replace(ViewState::Loading);

        let request = ChargeRequest::new(customer, &self.config.checkout);
        match self.gateway.create_charge(&request).await {
            Ok(ChargeResult::Accepted { payment_id, pix_code }) => {
                info!(payment_id = %payment_id, "Charge accepted, presenting payable code");
                self.present_charge(payment_id, pix_code).await;
                Ok(())
            }
            Ok(ChargeResult::Rejected { message }) => {
                warn!(message = %message, "Gateway rejected charge");
                self.state.send_replace(ViewState::Failed {
                    reason: format!("Erro ao gerar PIX: {}", message),
                });
                self.in_progress.store(false, Ordering::SeqCst);
                Err(FlowError::Gateway(message))
            }
            Err(err) => {
                error!(error = %err, "Charge request failed");
                self.state.send_replace(ViewState::Failed {
                    reason: CONNECTIVITY_MESSAGE.to_string(),
                });
                self.in_progress.store(false, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    /// Re-enter the flow with data collected from the user
    ///
    /// Collected values are merged over whatever was provided before the flow
    /// suspended; non-empty incoming fields win.
    pub async fn resume_with(self: &Arc<Self>, collected: CustomerInfo) -> crate::Result<()> {
        let base = self.pending_customer.lock().await.take().unwrap_or_default();
        self.start_payment(base.merge(collected)).await
    }

    /// Signal that the user copied the payable code
    ///
    /// Sets the transient `copied` acknowledgment and reverts it after two
    /// seconds. No-op unless a payment is currently awaited.
    pub fn acknowledge_copy(self: &Arc<Self>) {
        let mut applied = false;
        self.state.send_modify(|s| {
            if let ViewState::AwaitingPayment { copied, .. } = s {
                *copied = true;
                applied = true;
            }
        });
        if !applied {
            return;
        }

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(COPY_ACK_RESET).await;
            controller.state.send_modify(|s| {
                if let ViewState::AwaitingPayment { copied, .. } = s {
                    *copied = false;
                }
            });
        });
    }

    /// Tear the flow down: abort any poll, clear the guard, return to idle
    pub async fn reset(&self) {
        if let Some(task) = self.poll_task.lock().await.take() {
            task.abort();
        }
        self.pending_customer.lock().await.take();
        self.in_progress.store(false, Ordering::SeqCst);
        self.state.send_replace(ViewState::Idle);
    }

    /// Present the payable code and start the settlement poll
    ///
    /// Any prior poll task is aborted first; at most one timer exists per
    /// controller instance.
    async fn present_charge(self: &Arc<Self>, payment_id: String, pix_code: String) {
        self.state.send_replace(ViewState::AwaitingPayment {
            payment_id: payment_id.clone(),
            pix_code,
            attempt: 0,
            attempt_limit: self.config.poll.attempt_limit,
            pulse: false,
            copied: false,
        });

        let mut guard = self.poll_task.lock().await;
        if let Some(previous) = guard.take() {
            previous.abort();
        }
        let controller = Arc::clone(self);
        *guard = Some(tokio::spawn(controller.run_poll_loop(payment_id)));
    }

    /// Settlement poll loop; runs until settlement or attempt exhaustion
    async fn run_poll_loop(self: Arc<Self>, payment_id: String) {
        let mut poll = PollState::new(payment_id, self.config.poll.attempt_limit);
        let mut ticker =
            tokio::time::interval(Duration::from_millis(self.config.poll.interval_ms));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick of a tokio interval completes immediately; the first
        // status check should come one full interval after presentation.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if poll.exhausted() {
                info!(
                    payment_id = %poll.payment_id,
                    attempts = poll.attempts_made,
                    "Attempt budget exhausted, payment window expired"
                );
                self.state.send_replace(ViewState::Expired);
                self.in_progress.store(false, Ordering::SeqCst);
                return;
            }

            poll.attempts_made += 1;
            let attempt = poll.attempts_made;
            self.state.send_modify(|s| {
                if let ViewState::AwaitingPayment { attempt: a, pulse, .. } = s {
                    *a = attempt;
                    *pulse = attempt % 2 == 0;
                }
            });

            match self.gateway.check_status(&poll.payment_id).await {
                Ok(status) if status.is_settled() => {
                    poll.status = status;
                    info!(
                        payment_id = %poll.payment_id,
                        attempts = poll.attempts_made,
                        "Payment settled"
                    );
                    self.state.send_replace(ViewState::Paid);
                    tokio::time::sleep(Duration::from_millis(
                        self.config.checkout.redirect_delay_ms,
                    ))
                    .await;
                    self.state.send_replace(ViewState::Redirect {
                        url: self.config.checkout.next_page_url.clone(),
                    });
                    return;
                }
                Ok(status) => {
                    debug!(
                        payment_id = %poll.payment_id,
                        attempt = poll.attempts_made,
                        status = %status,
                        "Payment not settled yet"
                    );
                    poll.status = status;
                }
                Err(err) => {
                    // A failed check never kills the poll; the next tick retries
                    warn!(
                        payment_id = %poll.payment_id,
                        attempt = poll.attempts_made,
                        error = %err,
                        "Status check failed, continuing to poll"
                    );
                }
            }
        }
    }
}
