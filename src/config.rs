use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{LoanError, Result};

/// economic policy for the loan engine
///
/// held as data so tests can vary policy without touching logic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanPolicy {
    /// adjustment applied per whole calendar day between due date and payment date
    pub daily_adjustment_rate: Rate,
    /// installments due this many calendar months ahead or later are not yet payable
    pub payment_horizon_months: u32,
    /// inclusive lower bound for the flat markup rate
    pub min_interest_rate: Rate,
    /// inclusive upper bound for the flat markup rate
    pub max_interest_rate: Rate,
}

impl LoanPolicy {
    /// standard product policy
    pub fn standard() -> Self {
        Self {
            daily_adjustment_rate: Rate::from_decimal(dec!(0.001)),
            payment_horizon_months: 3,
            min_interest_rate: Rate::from_decimal(dec!(0.1)),
            max_interest_rate: Rate::from_decimal(dec!(0.5)),
        }
    }

    /// reject rates outside the inclusive [min, max] band
    pub fn validate_interest_rate(&self, rate: Rate) -> Result<()> {
        if rate < self.min_interest_rate || rate > self.max_interest_rate {
            return Err(LoanError::InterestRateOutOfRange {
                rate,
                min: self.min_interest_rate,
                max: self.max_interest_rate,
            });
        }
        Ok(())
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
