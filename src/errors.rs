use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::LoanId;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("insufficient credit: available {available}, requested {requested}")]
    InsufficientCredit {
        available: Money,
        requested: Money,
    },

    #[error("invalid principal amount: {amount}")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("interest rate {rate} outside allowed range [{min}, {max}]")]
    InterestRateOutOfRange {
        rate: Rate,
        min: Rate,
        max: Rate,
    },

    #[error("unsupported installment count: {value}")]
    UnsupportedInstallmentCount {
        value: u32,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("loan {loan_id:?} is already fully paid")]
    LoanAlreadyPaid {
        loan_id: Option<LoanId>,
    },

    #[error("no payable installments within the horizon for loan {loan_id:?}")]
    NoPayableInstallments {
        loan_id: Option<LoanId>,
    },

    #[error("payment {provided} does not cover the earliest payable installment ({required})")]
    InsufficientForAnyInstallment {
        provided: Money,
        required: Money,
    },
}

pub type Result<T> = std::result::Result<T, LoanError>;
