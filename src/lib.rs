pub mod allocation;
pub mod config;
pub mod customer;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod filter;
pub mod loan;
pub mod origination;
pub mod types;

// re-export key types
pub use allocation::{PaymentAllocator, PaymentResult};
pub use config::LoanPolicy;
pub use customer::Customer;
pub use decimal::{Money, Rate};
pub use engine::LoanEngine;
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use filter::LoanFilter;
pub use loan::{Installment, Loan};
pub use origination::{LoanOriginator, LoanRequest};
pub use types::{CustomerId, InstallmentCount, InstallmentId, LoanId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
