//! Flow state machine models
//!
//! The controller owns one [`PollState`] at a time and publishes [`ViewState`]
//! transitions; the rendering layer subscribes and draws whatever the current
//! state says.

use crate::domain::charge::PaymentStatus;
use crate::domain::customer::CustomerField;
use serde::{Deserialize, Serialize};

/// Presentation contract emitted by the flow controller
///
/// `AwaitingPayment` self-loops once per poll tick until the payment settles
/// or the attempt budget runs out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ViewState {
    /// No flow active
    Idle,
    /// Required customer fields are missing; host should collect them
    Collecting { missing: Vec<CustomerField> },
    /// Charge creation request is outstanding
    Loading,
    /// Charge accepted; payable code on display, settlement poll running
    AwaitingPayment {
        payment_id: String,
        pix_code: String,
        attempt: u32,
        attempt_limit: u32,
        /// Toggles every poll tick (the blinking status indicator)
        pulse: bool,
        /// Transient copy-to-clipboard acknowledgment
        copied: bool,
    },
    /// Payment settled
    Paid,
    /// Host should navigate to the configured destination
    Redirect { url: String },
    /// Attempt budget exhausted without settlement
    Expired,
    /// Charge creation failed; user may restart manually
    Failed { reason: String },
}

impl ViewState {
    /// True once the flow can no longer advance on its own
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ViewState::Redirect { .. } | ViewState::Expired | ViewState::Failed { .. }
        )
    }
}

/// Bookkeeping for one settlement poll
///
/// Created when a charge is accepted, advanced once per tick, finished on
/// settlement or when the attempt budget is spent.
#[derive(Debug, Clone)]
pub struct PollState {
    pub payment_id: String,
    pub attempts_made: u32,
    pub attempt_limit: u32,
    pub status: PaymentStatus,
}

impl PollState {
    pub fn new(payment_id: String, attempt_limit: u32) -> Self {
        Self {
            payment_id,
            attempts_made: 0,
            attempt_limit,
            status: PaymentStatus::Pending,
        }
    }

    /// True when no further status checks may be issued
    pub fn exhausted(&self) -> bool {
        self.attempts_made >= self.attempt_limit
    }
}
