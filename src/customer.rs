use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::CustomerId;

/// customer credit profile
///
/// the engine touches `used_credit_limit` at exactly two points: loan
/// origination (increment by the loan total) and full payoff
/// (decrement by the same scheduled total). Everything else is owned
/// by the caller's persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub name: String,
    pub surname: String,
    /// fixed credit ceiling
    pub credit_limit: Money,
    /// portion of the ceiling committed to unpaid loans; 0 <= used <= limit
    pub used_credit_limit: Money,
}

impl Customer {
    /// create a transient customer with an unused limit
    pub fn new(name: impl Into<String>, surname: impl Into<String>, credit_limit: Money) -> Self {
        Self {
            id: None,
            name: name.into(),
            surname: surname.into(),
            credit_limit,
            used_credit_limit: Money::ZERO,
        }
    }

    /// attach a persistence identity
    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = Some(id);
        self
    }

    /// credit still available for new loans
    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.used_credit_limit
    }

    /// commit part of the limit to a newly originated loan
    pub fn reserve_credit(&mut self, amount: Money) {
        self.used_credit_limit += amount;
    }

    /// hand a settled loan's scheduled total back to the limit
    pub fn release_credit(&mut self, amount: Money) {
        self.used_credit_limit -= amount;
    }
}

/// identity equality: persisted customers are equal iff ids match;
/// transient customers are never equal, not even to themselves
impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
