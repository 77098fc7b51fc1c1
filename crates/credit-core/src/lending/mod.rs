//! Customer registration, credit scoring, loan eligibility, and loan issuance.
//!
//! The decision engine ([`scoring`], [`policy`], [`emi`], [`issuance`]) works on immutable
//! snapshots and an explicit evaluation date. [`service`] fetches those snapshots through the
//! repository traits and [`router`] exposes the service over HTTP.

pub mod domain;
pub mod emi;
pub mod issuance;
pub mod policy;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    approved_limit_for, Customer, CustomerId, CustomerRegistration, InvalidRequestTerms, Loan,
    LoanId, LoanRequest, LoanTerms, NewCustomer, NewLoan, RegistrationError,
};
pub use emi::compute_emi;
pub use issuance::{IssuanceError, LoanIssuer};
pub use policy::{minimum_rate_for, ApprovalDecision, ApprovalPolicy, DecisionReason, PolicyConfig};
pub use repository::{CustomerRepository, LoanRepository, RepositoryError};
pub use router::{lending_router, lending_router_with_clock, local_today, Today};
pub use scoring::{CreditAssessment, CreditScoreEngine, ScoreComponent, ScoreFactor};
pub use service::{LendingService, LendingServiceError};
pub use views::{
    CurrentLoanView, CustomerMiniProfile, EligibilityView, LoanCreationView, LoanDetailView,
    RegisteredCustomerView,
};
