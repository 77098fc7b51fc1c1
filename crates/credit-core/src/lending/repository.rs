use super::domain::{Customer, CustomerId, Loan, LoanId, NewCustomer, NewLoan};

/// Customer storage used by the lending service. Implementations assign identifiers.
pub trait CustomerRepository: Send + Sync {
    fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError>;
    fn fetch(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
}

/// Loan storage used by the lending service. Implementations assign identifiers.
pub trait LoanRepository: Send + Sync {
    fn insert(&self, loan: NewLoan) -> Result<Loan, RepositoryError>;
    fn fetch(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError>;
    /// Every loan ever issued to `customer`, active or not.
    fn for_customer(&self, customer: CustomerId) -> Result<Vec<Loan>, RepositoryError>;
}

/// Storage failure surfaced to the lending service.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
