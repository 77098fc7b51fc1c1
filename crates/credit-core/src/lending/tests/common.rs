use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::lending::domain::{
    Customer, CustomerId, CustomerRegistration, Loan, LoanId, LoanRequest, NewCustomer, NewLoan,
};
use crate::lending::repository::{CustomerRepository, LoanRepository, RepositoryError};
use crate::lending::{lending_router_with_clock, LendingService, PolicyConfig};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn customer(monthly_income: u64, approved_limit: u64) -> Customer {
    Customer {
        customer_id: CustomerId(7),
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        phone_number: "9876543210".to_string(),
        age: 34,
        monthly_income,
        approved_limit,
        current_debt: 0,
    }
}

pub(super) fn registration(monthly_income: u64) -> CustomerRegistration {
    CustomerRegistration {
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        age: 34,
        monthly_income,
        phone_number: "9876543210".to_string(),
    }
}

pub(super) fn loan_request(customer_id: CustomerId, amount: f64, rate: f64, tenure: u32) -> LoanRequest {
    LoanRequest {
        customer_id,
        loan_amount: amount,
        interest_rate: rate,
        tenure,
    }
}

/// Historical loan with explicit dates and repayment record.
pub(super) struct LoanFixture {
    pub amount: f64,
    pub tenure: u32,
    pub paid_on_time: u32,
    pub installment: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LoanFixture {
    /// Loan started at `start`, running `tenure` months of 30 days.
    pub(super) fn started(start: NaiveDate, amount: f64, tenure: u32) -> Self {
        Self {
            amount,
            tenure,
            paid_on_time: 0,
            installment: 0.0,
            start,
            end: start + Duration::days(i64::from(tenure) * 30),
        }
    }

    pub(super) fn paid(mut self, paid_on_time: u32) -> Self {
        self.paid_on_time = paid_on_time;
        self
    }

    pub(super) fn installment(mut self, installment: f64) -> Self {
        self.installment = installment;
        self
    }

    pub(super) fn ending(mut self, end: NaiveDate) -> Self {
        self.end = end;
        self
    }

    pub(super) fn for_customer(&self, customer_id: CustomerId) -> NewLoan {
        NewLoan {
            customer_id,
            loan_amount: self.amount,
            tenure: self.tenure,
            interest_rate: 12.0,
            monthly_installment: self.installment,
            emis_paid_on_time: self.paid_on_time,
            start_date: self.start,
            end_date: self.end,
        }
    }

    pub(super) fn build(&self, id: u64) -> Loan {
        let new_loan = self.for_customer(CustomerId(7));
        Loan {
            loan_id: LoanId(id),
            customer_id: new_loan.customer_id,
            loan_amount: new_loan.loan_amount,
            tenure: new_loan.tenure,
            interest_rate: new_loan.interest_rate,
            monthly_installment: new_loan.monthly_installment,
            emis_paid_on_time: new_loan.emis_paid_on_time,
            start_date: new_loan.start_date,
            end_date: new_loan.end_date,
        }
    }
}

pub(super) fn history(fixtures: &[LoanFixture]) -> Vec<Loan> {
    fixtures
        .iter()
        .enumerate()
        .map(|(index, fixture)| fixture.build(index as u64 + 1))
        .collect()
}

#[derive(Default)]
pub(super) struct MemoryCustomers {
    records: Mutex<BTreeMap<CustomerId, Customer>>,
    sequence: AtomicU64,
}

impl CustomerRepository for MemoryCustomers {
    fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let id = CustomerId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let record = Customer {
            customer_id: id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone_number: customer.phone_number,
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            current_debt: 0,
        };
        self.records
            .lock()
            .expect("customer mutex poisoned")
            .insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("customer mutex poisoned")
            .get(&id)
            .cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryLoans {
    records: Mutex<BTreeMap<LoanId, Loan>>,
    sequence: AtomicU64,
}

impl MemoryLoans {
    pub(super) fn count(&self) -> usize {
        self.records.lock().expect("loan mutex poisoned").len()
    }
}

impl LoanRepository for MemoryLoans {
    fn insert(&self, loan: NewLoan) -> Result<Loan, RepositoryError> {
        let id = LoanId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let record = Loan {
            loan_id: id,
            customer_id: loan.customer_id,
            loan_amount: loan.loan_amount,
            tenure: loan.tenure,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_installment,
            emis_paid_on_time: loan.emis_paid_on_time,
            start_date: loan.start_date,
            end_date: loan.end_date,
        };
        self.records
            .lock()
            .expect("loan mutex poisoned")
            .insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("loan mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn for_customer(&self, customer: CustomerId) -> Result<Vec<Loan>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("loan mutex poisoned")
            .values()
            .filter(|loan| loan.customer_id == customer)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableLoans;

impl LoanRepository for UnavailableLoans {
    fn insert(&self, _loan: NewLoan) -> Result<Loan, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_customer(&self, _customer: CustomerId) -> Result<Vec<Loan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    LendingService<MemoryCustomers, MemoryLoans>,
    Arc<MemoryCustomers>,
    Arc<MemoryLoans>,
) {
    let customers = Arc::new(MemoryCustomers::default());
    let loans = Arc::new(MemoryLoans::default());
    let service = LendingService::new(customers.clone(), loans.clone(), PolicyConfig::default());
    (service, customers, loans)
}

pub(super) fn router_with_service(
    service: LendingService<MemoryCustomers, MemoryLoans>,
) -> axum::Router {
    lending_router_with_clock(Arc::new(service), today)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
