use hourglass_rs::{SafeTimeProvider, TimeSource};

use crate::allocation::{PaymentAllocator, PaymentResult};
use crate::config::LoanPolicy;
use crate::customer::Customer;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::origination::{LoanOriginator, LoanRequest};

/// loan lifecycle engine
///
/// a pure computation over caller-owned entities: the caller loads and
/// authorizes Customer/Loan, persists the mutated snapshots
/// atomically, and serializes operations per loan/customer pair. The
/// engine performs no I/O and holds no locks.
pub struct LoanEngine {
    pub policy: LoanPolicy,
    originator: LoanOriginator,
    allocator: PaymentAllocator,
    pub events: EventStore,
}

impl LoanEngine {
    pub fn new(policy: LoanPolicy) -> Self {
        Self {
            policy,
            originator: LoanOriginator::new(policy),
            allocator: PaymentAllocator::new(policy),
            events: EventStore::new(),
        }
    }

    /// originate with system time
    pub fn originate_now(
        &mut self,
        customer: &mut Customer,
        request: &LoanRequest,
    ) -> Result<Loan> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.originate(customer, request, &time)
    }

    /// originate a loan at the provider's current time
    pub fn originate(
        &mut self,
        customer: &mut Customer,
        request: &LoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        self.originator
            .originate(customer, request, time_provider.now(), &mut self.events)
    }

    /// pay with system time
    pub fn pay_now(
        &mut self,
        loan: &mut Loan,
        customer: &mut Customer,
        amount: Money,
    ) -> Result<PaymentResult> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.pay(loan, customer, amount, &time)
    }

    /// allocate a payment at the provider's current time
    pub fn pay(
        &mut self,
        loan: &mut Loan,
        customer: &mut Customer,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentResult> {
        self.allocator
            .pay(loan, customer, amount, time_provider.now(), &mut self.events)
    }

    /// drain events collected by prior operations
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

impl Default for LoanEngine {
    fn default() -> Self {
        Self::new(LoanPolicy::standard())
    }
}
