use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LoanPolicy;
use crate::customer::Customer;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::loan::{Installment, Loan};
use crate::types::InstallmentCount;

/// a request to open a new loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// borrowed amount before markup
    pub principal: Money,
    pub number_of_installment: InstallmentCount,
    pub interest_rate: Rate,
}

/// validates admission against available credit and builds the
/// installment schedule
#[derive(Debug, Clone)]
pub struct LoanOriginator {
    policy: LoanPolicy,
}

impl LoanOriginator {
    pub fn new(policy: LoanPolicy) -> Self {
        Self { policy }
    }

    /// open a loan against the customer's available credit
    ///
    /// the total payable is `principal * (1 + rate)` rounded half-up
    /// to cents; that total, not the principal, is checked against the
    /// limit and reserved. On error the customer is left untouched.
    pub fn originate(
        &self,
        customer: &mut Customer,
        request: &LoanRequest,
        now: DateTime<Utc>,
        events: &mut EventStore,
    ) -> Result<Loan> {
        if !request.principal.is_positive() {
            return Err(LoanError::InvalidPrincipal {
                amount: request.principal,
            });
        }
        self.policy.validate_interest_rate(request.interest_rate)?;

        let total = (request.principal * (Decimal::ONE + request.interest_rate.as_decimal()))
            .round_cents();

        let available = customer.available_credit();
        if available < total {
            return Err(LoanError::InsufficientCredit {
                available,
                requested: total,
            });
        }

        let count = request.number_of_installment.value();
        // each installment is rounded independently; residual cents are
        // not reconciled against the total
        let per_installment = (total / Decimal::from(count)).round_cents();

        let first_due = first_day_of_following_month(now);
        let installments = (0..count)
            .map(|offset| {
                Installment::new(per_installment, first_due + Months::new(offset))
                    .with_id(Uuid::new_v4())
            })
            .collect();

        let loan = Loan {
            id: Some(Uuid::new_v4()),
            customer_id: customer.id,
            loan_amount: total,
            interest_rate: request.interest_rate,
            number_of_installment: request.number_of_installment,
            create_date: now,
            is_paid: false,
            installments,
        };

        customer.reserve_credit(total);

        events.emit(Event::LoanOriginated {
            loan_id: loan.id,
            customer_id: customer.id,
            loan_amount: total,
            installments: count,
            timestamp: now,
        });
        events.emit(Event::CreditReserved {
            customer_id: customer.id,
            amount: total,
            used_credit_limit: customer.used_credit_limit,
        });

        Ok(loan)
    }
}

/// first day of the month after `date`, at midnight
pub fn first_day_of_following_month(date: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first of a calendar month is always a valid date");
    first.and_time(NaiveTime::MIN).and_utc()
}
