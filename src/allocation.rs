use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanPolicy;
use crate::customer::Customer;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::loan::{Installment, Loan};

/// summary of one payment operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub installments_paid: u32,
    /// sum of the adjusted amounts actually collected
    pub total_paid: Money,
    pub loan_fully_paid: bool,
    pub total_discount: Money,
    pub total_penalty: Money,
}

/// allocates a payment across eligible installments, earliest due first
#[derive(Debug, Clone)]
pub struct PaymentAllocator {
    policy: LoanPolicy,
}

impl PaymentAllocator {
    pub fn new(policy: LoanPolicy) -> Self {
        Self { policy }
    }

    /// pay whole installments while funds last
    ///
    /// only unpaid installments due strictly before `now` plus the
    /// policy horizon are eligible. Each is collected at its adjusted
    /// amount or not at all; leftover funds are not refunded or
    /// tracked. On error, loan and customer are left exactly as found.
    pub fn pay(
        &self,
        loan: &mut Loan,
        customer: &mut Customer,
        payment_amount: Money,
        now: DateTime<Utc>,
        events: &mut EventStore,
    ) -> Result<PaymentResult> {
        if loan.is_paid {
            return Err(LoanError::LoanAlreadyPaid { loan_id: loan.id });
        }
        if !payment_amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount {
                amount: payment_amount,
            });
        }

        let horizon = now + Months::new(self.policy.payment_horizon_months);

        let mut candidates: Vec<usize> = loan
            .installments
            .iter()
            .enumerate()
            .filter(|(_, installment)| !installment.is_paid && installment.due_date < horizon)
            .map(|(index, _)| index)
            .collect();
        // stable sort: equal due dates keep insertion order
        candidates.sort_by_key(|&index| loan.installments[index].due_date);

        if candidates.is_empty() {
            return Err(LoanError::NoPayableInstallments { loan_id: loan.id });
        }

        let required = self.adjusted_amount(&loan.installments[candidates[0]], now);
        if payment_amount < required {
            return Err(LoanError::InsufficientForAnyInstallment {
                provided: payment_amount,
                required,
            });
        }

        let mut remaining = payment_amount;
        let mut installments_paid = 0u32;
        let mut total_paid = Money::ZERO;
        let mut total_discount = Money::ZERO;
        let mut total_penalty = Money::ZERO;

        for index in candidates {
            let adjusted = self.adjusted_amount(&loan.installments[index], now);
            if remaining < adjusted {
                break;
            }

            let installment = &mut loan.installments[index];
            let adjustment = adjusted - installment.amount;
            installment.mark_paid(adjusted, now);

            remaining -= adjusted;
            installments_paid += 1;
            total_paid += adjusted;
            // classify off the realized difference so the two stay consistent
            if adjustment.is_negative() {
                total_discount += adjustment.abs();
            } else {
                total_penalty += adjustment;
            }

            events.emit(Event::InstallmentPaid {
                loan_id: loan.id,
                installment_id: loan.installments[index].id,
                due_date: loan.installments[index].due_date,
                amount_paid: adjusted,
                adjustment,
                timestamp: now,
            });
        }

        let loan_fully_paid = loan.all_installments_paid();
        if loan_fully_paid {
            loan.is_paid = true;
            // release the scheduled total, not the sum actually collected
            customer.release_credit(loan.loan_amount);

            events.emit(Event::LoanSettled {
                loan_id: loan.id,
                loan_amount: loan.loan_amount,
                timestamp: now,
            });
            events.emit(Event::CreditReleased {
                customer_id: customer.id,
                amount: loan.loan_amount,
                used_credit_limit: customer.used_credit_limit,
            });
        }

        Ok(PaymentResult {
            installments_paid,
            total_paid,
            loan_fully_paid,
            total_discount,
            total_penalty,
        })
    }

    /// installment amount adjusted by the daily rate for early or late
    /// payment
    ///
    /// days are whole calendar days between due date and `now`; time of
    /// day is ignored. Zero days means the scheduled amount unchanged.
    pub fn adjusted_amount(&self, installment: &Installment, now: DateTime<Utc>) -> Money {
        let days = now
            .date_naive()
            .signed_duration_since(installment.due_date.date_naive())
            .num_days();
        if days == 0 {
            return installment.amount;
        }

        let rate =
            self.policy.daily_adjustment_rate.as_decimal() * Decimal::from(days.unsigned_abs());
        let delta = installment.amount * rate;
        if days < 0 {
            installment.amount - delta
        } else {
            installment.amount + delta
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::InstallmentCount;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn allocator() -> PaymentAllocator {
        PaymentAllocator::new(LoanPolicy::standard())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn customer_with_used(used: Money) -> Customer {
        let mut c =
            Customer::new("Ada", "Lovelace", Money::from_major(100_000)).with_id(Uuid::new_v4());
        c.used_credit_limit = used;
        c
    }

    /// loan with one installment of `amount` per entry in `due_dates`
    fn loan_with_installments(due_dates: &[DateTime<Utc>], amount: Money) -> Loan {
        let installments = due_dates
            .iter()
            .map(|&due| Installment::new(amount, due).with_id(Uuid::new_v4()))
            .collect::<Vec<_>>();
        let total = amount * Decimal::from(due_dates.len() as i64);

        Loan {
            id: Some(Uuid::new_v4()),
            customer_id: Some(Uuid::new_v4()),
            loan_amount: total,
            interest_rate: Rate::from_percentage(20),
            number_of_installment: InstallmentCount::Six,
            create_date: now() - Duration::days(30),
            is_paid: false,
            installments,
        }
    }

    #[test]
    fn test_pays_two_installments_due_today_at_face_value() {
        // two unpaid installments due exactly now, a third next month
        let dues = [now(), now(), now() + Months::new(1)];
        let mut loan = loan_with_installments(&dues, Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let result = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(2_000), now(), &mut events)
            .unwrap();

        assert_eq!(result.installments_paid, 2);
        assert_eq!(result.total_paid, Money::from_major(2_000));
        assert_eq!(result.total_discount, Money::ZERO);
        assert_eq!(result.total_penalty, Money::ZERO);
        assert!(!result.loan_fully_paid);

        assert!(loan.installments[0].is_paid);
        assert!(loan.installments[1].is_paid);
        assert!(!loan.installments[2].is_paid);
        assert!(!loan.is_paid);
        // no payoff, no credit release
        assert_eq!(customer.used_credit_limit, loan.loan_amount);
    }

    #[test]
    fn test_pays_earliest_installments_first() {
        // staggered dues: the second installment lands a month early and
        // earns a 30-day discount, the third is out of reach
        let dues = [now(), now() + Months::new(1), now() + Months::new(2)];
        let mut loan = loan_with_installments(&dues, Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let result = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(2_000), now(), &mut events)
            .unwrap();

        // 1000.00 on the due date + 970.00 thirty days early
        assert_eq!(result.installments_paid, 2);
        assert_eq!(result.total_paid, Money::from_major(1_970));
        assert_eq!(result.total_discount, Money::from_major(30));
        assert_eq!(result.total_penalty, Money::ZERO);
        assert!(!result.loan_fully_paid);

        assert!(loan.installments[0].is_paid);
        assert!(loan.installments[1].is_paid);
        assert!(!loan.installments[2].is_paid);
    }

    #[test]
    fn test_early_payment_collects_discounted_amount() {
        // single 1000.00 installment due 10 days ahead
        let due = now() + Duration::days(10);
        let mut loan = loan_with_installments(&[due], Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let result = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(1_000), now(), &mut events)
            .unwrap();

        // 1000 - 1000 * 0.001 * 10 = 990.00; the 10.00 left over is not refunded
        assert_eq!(result.installments_paid, 1);
        assert_eq!(result.total_paid, Money::from_major(990));
        assert_eq!(result.total_discount, Money::from_major(10));
        assert_eq!(result.total_penalty, Money::ZERO);
        assert!(result.loan_fully_paid);

        assert_eq!(loan.installments[0].paid_amount, Money::from_major(990));
        assert_eq!(loan.installments[0].payment_date, Some(now()));
    }

    #[test]
    fn test_late_payment_collects_penalty_amount() {
        let due = now() - Duration::days(10);
        let mut loan = loan_with_installments(&[due], Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let result = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(1_010), now(), &mut events)
            .unwrap();

        // 1000 + 1000 * 0.001 * 10 = 1010.00
        assert_eq!(result.total_paid, Money::from_major(1_010));
        assert_eq!(result.total_penalty, Money::from_major(10));
        assert_eq!(result.total_discount, Money::ZERO);
    }

    #[test]
    fn test_payment_on_due_date_is_unadjusted() {
        let mut loan = loan_with_installments(&[now()], Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        // same calendar day, different time of day
        let later_that_day = now() + Duration::hours(17);
        let result = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(1_000), later_that_day, &mut events)
            .unwrap();

        assert_eq!(result.total_paid, Money::from_major(1_000));
        assert_eq!(result.total_discount, Money::ZERO);
        assert_eq!(result.total_penalty, Money::ZERO);
    }

    #[test]
    fn test_insufficient_for_any_installment_mutates_nothing() {
        let dues = [now(), now() + Months::new(1)];
        let mut loan = loan_with_installments(&dues, Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let used_before = customer.used_credit_limit;
        let mut events = EventStore::new();

        let err = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(500), now(), &mut events)
            .unwrap_err();

        assert!(matches!(
            err,
            LoanError::InsufficientForAnyInstallment { provided, required }
                if provided == Money::from_major(500) && required == Money::from_major(1_000)
        ));
        assert!(loan.installments.iter().all(|i| !i.is_paid));
        assert!(loan.installments.iter().all(|i| i.paid_amount.is_zero()));
        assert_eq!(customer.used_credit_limit, used_before);
        assert!(events.events().is_empty());
    }

    #[test]
    fn test_no_partial_installment_payment() {
        // funds cover the first installment plus most of the second;
        // the second must stay untouched
        let dues = [now(), now()];
        let mut loan = loan_with_installments(&dues, Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let result = allocator()
            .pay(&mut loan, &mut customer, Money::from_str_exact("1999.99").unwrap(), now(), &mut events)
            .unwrap();

        assert_eq!(result.installments_paid, 1);
        assert!(!loan.installments[1].is_paid);
        assert_eq!(loan.installments[1].amount, Money::from_major(1_000));
        assert_eq!(loan.installments[1].paid_amount, Money::ZERO);
    }

    #[test]
    fn test_installment_beyond_horizon_is_not_payable() {
        let mut loan =
            loan_with_installments(&[now() + Months::new(4)], Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let err = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(1_000), now(), &mut events)
            .unwrap_err();
        assert!(matches!(err, LoanError::NoPayableInstallments { .. }));
    }

    #[test]
    fn test_horizon_boundary_is_exclusive() {
        // due exactly at now + 3 months: not payable (strictly before)
        let mut at_horizon =
            loan_with_installments(&[now() + Months::new(3)], Money::from_major(1_000));
        let mut customer = customer_with_used(at_horizon.loan_amount);
        let mut events = EventStore::new();

        let err = allocator()
            .pay(&mut at_horizon, &mut customer, Money::from_major(1_000), now(), &mut events)
            .unwrap_err();
        assert!(matches!(err, LoanError::NoPayableInstallments { .. }));

        // a day inside the window is payable
        let mut inside = loan_with_installments(
            &[now() + Months::new(3) - Duration::days(1)],
            Money::from_major(1_000),
        );
        let mut customer = customer_with_used(inside.loan_amount);
        assert!(allocator()
            .pay(&mut inside, &mut customer, Money::from_major(2_000), now(), &mut events)
            .is_ok());
    }

    #[test]
    fn test_already_paid_loan_is_rejected() {
        let mut loan = loan_with_installments(&[now()], Money::from_major(1_000));
        loan.is_paid = true;
        let mut customer = customer_with_used(Money::ZERO);
        let mut events = EventStore::new();

        let err = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(1_000), now(), &mut events)
            .unwrap_err();
        assert!(matches!(err, LoanError::LoanAlreadyPaid { .. }));
    }

    #[test]
    fn test_non_positive_payment_is_rejected() {
        let mut loan = loan_with_installments(&[now()], Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let err = allocator()
            .pay(&mut loan, &mut customer, Money::ZERO, now(), &mut events)
            .unwrap_err();
        assert!(matches!(err, LoanError::InvalidPaymentAmount { .. }));
    }

    #[test]
    fn test_full_payoff_releases_scheduled_total_not_collected_total() {
        // both installments collected at a discount (990 each), yet the
        // release is the scheduled 2000
        let dues = [now() + Duration::days(10), now() + Duration::days(10)];
        let mut loan = loan_with_installments(&dues, Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let result = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(1_980), now(), &mut events)
            .unwrap();

        assert!(result.loan_fully_paid);
        assert_eq!(result.total_paid, Money::from_major(1_980));
        assert_eq!(result.total_discount, Money::from_major(20));
        assert!(loan.is_paid);
        assert_eq!(customer.used_credit_limit, Money::ZERO);
    }

    #[test]
    fn test_equal_due_dates_pay_in_insertion_order() {
        let dues = [now(), now()];
        let mut loan = loan_with_installments(&dues, Money::from_major(1_000));
        let first_id = loan.installments[0].id;
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        let result = allocator()
            .pay(&mut loan, &mut customer, Money::from_major(1_000), now(), &mut events)
            .unwrap();

        assert_eq!(result.installments_paid, 1);
        assert!(loan.installments[0].is_paid);
        assert!(!loan.installments[1].is_paid);
        assert_eq!(loan.installments[0].id, first_id);
    }

    #[test]
    fn test_payment_emits_installment_and_settlement_events() {
        let mut loan = loan_with_installments(&[now()], Money::from_major(1_000));
        let mut customer = customer_with_used(loan.loan_amount);
        let mut events = EventStore::new();

        allocator()
            .pay(&mut loan, &mut customer, Money::from_major(1_000), now(), &mut events)
            .unwrap();

        let emitted = events.take_events();
        assert_eq!(emitted.len(), 3);
        assert!(matches!(&emitted[0], Event::InstallmentPaid { adjustment, .. } if adjustment.is_zero()));
        assert!(matches!(&emitted[1], Event::LoanSettled { .. }));
        assert!(matches!(&emitted[2], Event::CreditReleased { .. }));
    }

    #[test]
    fn test_policy_is_data_not_code() {
        // doubling the daily rate doubles the discount
        let mut policy = LoanPolicy::standard();
        policy.daily_adjustment_rate = Rate::from_decimal(dec!(0.002));
        let allocator = PaymentAllocator::new(policy);

        let due = now() + Duration::days(10);
        let loan = loan_with_installments(&[due], Money::from_major(1_000));

        let adjusted = allocator.adjusted_amount(&loan.installments[0], now());
        assert_eq!(adjusted, Money::from_major(980));
    }

    #[test]
    fn test_uneven_amount_adjustment_is_not_rerounded() {
        // 833.33 due in 5 days: 833.33 - 833.33 * 0.005 = 829.16335
        let due = now() + Duration::days(5);
        let amount = Money::from_str_exact("833.33").unwrap();
        let loan = loan_with_installments(&[due], amount);

        let adjusted = allocator().adjusted_amount(&loan.installments[0], now());
        assert_eq!(adjusted.as_decimal(), dec!(829.16335));
    }
}
