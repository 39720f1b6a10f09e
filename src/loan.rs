use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{CustomerId, InstallmentCount, InstallmentId, LoanId};

/// one scheduled repayment of a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: Option<InstallmentId>,
    /// original scheduled amount, fixed at creation
    pub amount: Money,
    /// adjusted amount actually collected; zero until paid
    pub paid_amount: Money,
    /// first day of a calendar month, at midnight
    pub due_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub is_paid: bool,
}

impl Installment {
    pub fn new(amount: Money, due_date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            amount,
            paid_amount: Money::ZERO,
            due_date,
            payment_date: None,
            is_paid: false,
        }
    }

    /// attach a persistence identity
    pub fn with_id(mut self, id: InstallmentId) -> Self {
        self.id = Some(id);
        self
    }

    /// unpaid -> paid is the only transition and it never reverts;
    /// `paid_amount` and `payment_date` are always set together with it
    pub fn mark_paid(&mut self, paid_amount: Money, payment_date: DateTime<Utc>) {
        self.is_paid = true;
        self.paid_amount = paid_amount;
        self.payment_date = Some(payment_date);
    }

    /// unpaid and past due as of `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_paid && self.due_date < now
    }
}

/// identity equality: persisted installments are equal iff ids match;
/// transient installments are never equal
impl PartialEq for Installment {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// an installment loan
///
/// `loan_amount` is the total payable with the markup already applied.
/// The schedule is created atomically with the loan and installments
/// are never added or removed afterward; once `is_paid` turns true the
/// loan is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: Option<LoanId>,
    pub customer_id: Option<CustomerId>,
    pub loan_amount: Money,
    pub interest_rate: Rate,
    pub number_of_installment: InstallmentCount,
    pub create_date: DateTime<Utc>,
    pub is_paid: bool,
    pub installments: Vec<Installment>,
}

impl Loan {
    /// installments in due-date order; equal due dates keep insertion order
    pub fn installments_by_due_date(&self) -> Vec<&Installment> {
        let mut ordered: Vec<&Installment> = self.installments.iter().collect();
        ordered.sort_by_key(|installment| installment.due_date);
        ordered
    }

    pub fn all_installments_paid(&self) -> bool {
        self.installments.iter().all(|installment| installment.is_paid)
    }

    /// at least one unpaid installment past its due date as of `now`
    pub fn has_overdue_installments(&self, now: DateTime<Utc>) -> bool {
        self.installments.iter().any(|installment| installment.is_overdue(now))
    }
}

/// identity equality: persisted loans are equal iff ids match;
/// transient loans are never equal
impl PartialEq for Loan {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
