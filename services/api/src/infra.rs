use chrono::NaiveDate;
use credit_core::lending::{
    Customer, CustomerId, CustomerRepository, Loan, LoanId, LoanRepository, NewCustomer,
    NewLoan, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCustomerRepository {
    records: Arc<Mutex<BTreeMap<CustomerId, Customer>>>,
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let next_id = guard
            .keys()
            .next_back()
            .map_or(1, |CustomerId(last)| last + 1);
        let record = Customer {
            customer_id: CustomerId(next_id),
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone_number: customer.phone_number,
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            current_debt: 0,
        };
        guard.insert(record.customer_id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(lock(&self.records)?.get(&id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLoanRepository {
    records: Arc<Mutex<BTreeMap<LoanId, Loan>>>,
}

impl LoanRepository for InMemoryLoanRepository {
    fn insert(&self, loan: NewLoan) -> Result<Loan, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let next_id = guard.keys().next_back().map_or(1, |LoanId(last)| last + 1);
        let record = Loan {
            loan_id: LoanId(next_id),
            customer_id: loan.customer_id,
            loan_amount: loan.loan_amount,
            tenure: loan.tenure,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_installment,
            emis_paid_on_time: loan.emis_paid_on_time,
            start_date: loan.start_date,
            end_date: loan.end_date,
        };
        guard.insert(record.loan_id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        Ok(lock(&self.records)?.get(&id).cloned())
    }

    fn for_customer(&self, customer: CustomerId) -> Result<Vec<Loan>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|loan| loan.customer_id == customer)
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
