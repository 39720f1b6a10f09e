/// payment allocation - discounts, penalties, and full payoff
use installment_loan_rs::chrono::{Duration, TimeZone, Utc};
use installment_loan_rs::{
    Customer, InstallmentCount, LoanEngine, LoanRequest, Money, Rate, SafeTimeProvider,
    TimeSource, Uuid,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = LoanEngine::default();
    let mut customer =
        Customer::new("Ada", "Lovelace", Money::from_major(10_000)).with_id(Uuid::new_v4());

    // originate mid-january on a controlled clock
    let origination_day = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(origination_day));
    let request = LoanRequest {
        principal: Money::from_major(5_000),
        number_of_installment: InstallmentCount::Six,
        interest_rate: Rate::from_decimal(dec!(0.2)),
    };
    let mut loan = engine.originate(&mut customer, &request, &time)?;
    println!("schedule: 6 x {} starting 2024-02-01", loan.installments[0].amount);

    // ten days before the first due date: 0.001/day discount
    let early = Utc.with_ymd_and_hms(2024, 1, 22, 9, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(early));
    let result = engine.pay(&mut loan, &mut customer, Money::from_major(1_000), &time)?;
    println!(
        "early payment: collected {}, discount {}",
        result.total_paid, result.total_discount
    );

    // ten days after the second due date: 0.001/day penalty
    let late = Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(late));
    let result = engine.pay(&mut loan, &mut customer, Money::from_major(1_010), &time)?;
    println!(
        "late payment: collected {}, penalty {}",
        result.total_paid, result.total_penalty
    );

    // clear the rest; a little headroom covers the odd late day
    let mut day = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
    while !loan.is_paid {
        let time = SafeTimeProvider::new(TimeSource::Test(day));
        let result = engine.pay(&mut loan, &mut customer, Money::from_major(1_010), &time)?;
        println!(
            "paid {} installment(s) on {}, fully paid: {}",
            result.installments_paid,
            day.date_naive(),
            result.loan_fully_paid
        );
        day += Duration::days(31);
    }

    println!("used credit limit after payoff: {}", customer.used_credit_limit);
    Ok(())
}
