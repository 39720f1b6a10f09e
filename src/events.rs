use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CustomerId, InstallmentId, LoanId};

/// all events emitted by the loan engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LoanOriginated {
        loan_id: Option<LoanId>,
        customer_id: Option<CustomerId>,
        loan_amount: Money,
        installments: u32,
        timestamp: DateTime<Utc>,
    },
    CreditReserved {
        customer_id: Option<CustomerId>,
        amount: Money,
        used_credit_limit: Money,
    },
    InstallmentPaid {
        loan_id: Option<LoanId>,
        installment_id: Option<InstallmentId>,
        due_date: DateTime<Utc>,
        amount_paid: Money,
        /// negative for a discount, positive for a penalty
        adjustment: Money,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: Option<LoanId>,
        loan_amount: Money,
        timestamp: DateTime<Utc>,
    },
    CreditReleased {
        customer_id: Option<CustomerId>,
        amount: Money,
        used_credit_limit: Money,
    },
}

/// event buffer filled during operations and drained by the caller
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
