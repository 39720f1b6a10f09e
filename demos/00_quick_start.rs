/// quick start - minimal example to get started
use installment_loan_rs::{
    Customer, InstallmentCount, LoanEngine, LoanRequest, Money, Rate, SafeTimeProvider,
    TimeSource, Uuid,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = LoanEngine::default();

    // customer with a 20,000 credit ceiling
    let mut customer =
        Customer::new("Ada", "Lovelace", Money::from_major(20_000)).with_id(Uuid::new_v4());

    // borrow 10,000 at a 20% markup over 12 monthly installments
    let time = SafeTimeProvider::new(TimeSource::System);
    let request = LoanRequest {
        principal: Money::from_major(10_000),
        number_of_installment: InstallmentCount::Twelve,
        interest_rate: Rate::from_decimal(dec!(0.2)),
    };
    let mut loan = engine.originate(&mut customer, &request, &time)?;

    println!("loan total: {}", loan.loan_amount);
    println!("used credit limit: {}", customer.used_credit_limit);
    for installment in loan.installments_by_due_date() {
        println!("  {} due {}", installment.amount, installment.due_date.date_naive());
    }

    // pay the first two installments
    let result = engine.pay(&mut loan, &mut customer, Money::from_major(2_000), &time)?;
    println!(
        "paid {} installment(s), total {}, fully paid: {}",
        result.installments_paid, result.total_paid, result.loan_fully_paid
    );

    Ok(())
}
