use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::loan::Loan;
use crate::types::InstallmentCount;

/// filter criteria for loan listings
///
/// all criteria are optional and compose with AND; the caller supplies
/// the loans, the filter is a pure predicate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanFilter {
    pub is_paid: Option<bool>,
    pub number_of_installment: Option<InstallmentCount>,
    /// true: loans with an unpaid installment past due; false: loans without one
    pub is_overdue: Option<bool>,
}

impl LoanFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paid(mut self, is_paid: bool) -> Self {
        self.is_paid = Some(is_paid);
        self
    }

    pub fn installments(mut self, count: InstallmentCount) -> Self {
        self.number_of_installment = Some(count);
        self
    }

    pub fn overdue(mut self, is_overdue: bool) -> Self {
        self.is_overdue = Some(is_overdue);
        self
    }

    pub fn matches(&self, loan: &Loan, now: DateTime<Utc>) -> bool {
        if let Some(is_paid) = self.is_paid {
            if loan.is_paid != is_paid {
                return false;
            }
        }
        if let Some(count) = self.number_of_installment {
            if loan.number_of_installment != count {
                return false;
            }
        }
        if let Some(is_overdue) = self.is_overdue {
            if loan.has_overdue_installments(now) != is_overdue {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, loans: &'a [Loan], now: DateTime<Utc>) -> Vec<&'a Loan> {
        loans.iter().filter(|loan| self.matches(loan, now)).collect()
    }
}
