use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{LoanError, Result};

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a customer
pub type CustomerId = Uuid;

/// unique identifier for an installment
pub type InstallmentId = Uuid;

/// allowed installment counts
///
/// a closed product enumeration, not an arbitrary integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentCount {
    Six,
    Nine,
    Twelve,
    TwentyFour,
}

impl InstallmentCount {
    pub const ALL: [InstallmentCount; 4] = [
        InstallmentCount::Six,
        InstallmentCount::Nine,
        InstallmentCount::Twelve,
        InstallmentCount::TwentyFour,
    ];

    /// number of monthly installments
    pub fn value(&self) -> u32 {
        match self {
            InstallmentCount::Six => 6,
            InstallmentCount::Nine => 9,
            InstallmentCount::Twelve => 12,
            InstallmentCount::TwentyFour => 24,
        }
    }

    /// parse a raw count, rejecting anything outside the product set
    pub fn from_value(value: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|count| count.value() == value)
            .ok_or(LoanError::UnsupportedInstallmentCount { value })
    }
}

impl fmt::Display for InstallmentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
