use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::domain::{
    Customer, CustomerId, CustomerRegistration, InvalidRequestTerms, Loan, LoanId, LoanRequest,
    LoanTerms, RegistrationError,
};
use super::issuance::{IssuanceError, LoanIssuer};
use super::policy::{ApprovalDecision, ApprovalPolicy, PolicyConfig};
use super::repository::{CustomerRepository, LoanRepository, RepositoryError};
use super::scoring::{CreditAssessment, CreditScoreEngine};
use super::views::{CurrentLoanView, EligibilityView, LoanCreationView, LoanDetailView};

/// Service composing the repositories, score engine, approval policy, and loan issuer.
pub struct LendingService<C, L> {
    customers: Arc<C>,
    loans: Arc<L>,
    engine: CreditScoreEngine,
    policy: Arc<ApprovalPolicy>,
    issuer: LoanIssuer,
    customer_locks: Mutex<HashMap<CustomerId, Arc<Mutex<()>>>>,
}

/// Snapshot-based evaluation of a single request.
struct Evaluation {
    customer: Customer,
    terms: LoanTerms,
    decision: ApprovalDecision,
}

impl<C, L> LendingService<C, L>
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    pub fn new(customers: Arc<C>, loans: Arc<L>, config: PolicyConfig) -> Self {
        let issuer = LoanIssuer::new(config.days_per_tenure_month);
        Self {
            customers,
            loans,
            engine: CreditScoreEngine::new(),
            policy: Arc::new(ApprovalPolicy::new(config)),
            issuer,
            customer_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &ApprovalPolicy {
        &self.policy
    }

    /// Register a customer with a limit derived from their monthly income.
    pub fn register(
        &self,
        registration: CustomerRegistration,
    ) -> Result<Customer, LendingServiceError> {
        let new_customer = registration.validate()?;
        let customer = self.customers.insert(new_customer)?;
        info!(
            customer_id = customer.customer_id.0,
            approved_limit = customer.approved_limit,
            "customer registered"
        );
        Ok(customer)
    }

    /// Score a customer's full loan history as of `today`.
    pub fn credit_assessment(
        &self,
        customer_id: CustomerId,
        today: NaiveDate,
    ) -> Result<CreditAssessment, LendingServiceError> {
        let customer = self.customer(customer_id)?;
        let history = self.loans.for_customer(customer_id)?;
        Ok(self.engine.score(&customer, &history, today))
    }

    /// Evaluate a request without persisting anything.
    pub fn check_eligibility(
        &self,
        request: &LoanRequest,
        today: NaiveDate,
    ) -> Result<EligibilityView, LendingServiceError> {
        let evaluation = self.evaluate(request, today)?;
        Ok(EligibilityView::new(
            evaluation.customer.customer_id,
            evaluation.terms.rate(),
            evaluation.terms.tenure(),
            &evaluation.decision,
        ))
    }

    /// Evaluate a request and persist the loan when approved.
    ///
    /// Creation is serialized per customer so two concurrent approvals cannot jointly exceed
    /// the approved limit. The wait uses a blocking `std::sync::Mutex`, which is fine while the
    /// repositories are in memory; a repository doing network I/O under this lock should be
    /// driven through `tokio::task::spawn_blocking` by async callers.
    pub fn create_loan(
        &self,
        request: &LoanRequest,
        today: NaiveDate,
    ) -> Result<LoanCreationView, LendingServiceError> {
        let lock = self.customer_lock(request.customer_id);
        let outcome = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.issue_loan(request, today)
        };
        self.release_customer_lock(request.customer_id, lock);
        outcome
    }

    fn issue_loan(
        &self,
        request: &LoanRequest,
        today: NaiveDate,
    ) -> Result<LoanCreationView, LendingServiceError> {
        let evaluation = self.evaluate(request, today)?;
        let customer_id = evaluation.customer.customer_id;

        match self
            .issuer
            .issue(customer_id, &evaluation.terms, &evaluation.decision, today)
        {
            Ok(new_loan) => {
                let loan = self.loans.insert(new_loan)?;
                info!(
                    customer_id = customer_id.0,
                    loan_id = loan.loan_id.0,
                    interest_rate = loan.interest_rate,
                    end_date = %loan.end_date,
                    "loan issued"
                );
                Ok(LoanCreationView::approved(&loan))
            }
            Err(IssuanceError::Rejected(reason)) => {
                Ok(LoanCreationView::rejected(customer_id, reason))
            }
            Err(IssuanceError::InvalidTerms(err)) => Err(err.into()),
        }
    }

    pub fn loan_detail(&self, loan_id: LoanId) -> Result<LoanDetailView, LendingServiceError> {
        let loan = self
            .loans
            .fetch(loan_id)?
            .ok_or(LendingServiceError::LoanNotFound(loan_id))?;
        let customer = self.customer(loan.customer_id)?;
        Ok(LoanDetailView::new(&loan, &customer))
    }

    /// Loans of `customer_id` still active on `today`.
    pub fn current_loans(
        &self,
        customer_id: CustomerId,
        today: NaiveDate,
    ) -> Result<Vec<CurrentLoanView>, LendingServiceError> {
        self.customer(customer_id)?;
        let loans = self.loans.for_customer(customer_id)?;
        Ok(loans
            .iter()
            .filter(|loan| loan.is_active(today))
            .map(CurrentLoanView::from)
            .collect())
    }

    fn evaluate(
        &self,
        request: &LoanRequest,
        today: NaiveDate,
    ) -> Result<Evaluation, LendingServiceError> {
        let terms = request.terms()?;
        self.issuer.end_date(today, terms.tenure())?;
        let customer = self.customer(request.customer_id)?;
        let history = self.loans.for_customer(customer.customer_id)?;

        let assessment = self.engine.score(&customer, &history, today);
        let active: Vec<Loan> = history
            .into_iter()
            .filter(|loan| loan.is_active(today))
            .collect();
        let decision = self
            .policy
            .decide(assessment.score, &customer, &active, &terms);

        debug!(
            customer_id = customer.customer_id.0,
            credit_score = assessment.score,
            utilization_override = assessment.utilization_override,
            active_loans = active.len(),
            "credit assessed"
        );
        info!(
            customer_id = customer.customer_id.0,
            approved = decision.approved,
            reason = ?decision.reason,
            requested_rate = terms.rate(),
            corrected_rate = decision.corrected_rate,
            "loan request evaluated"
        );

        Ok(Evaluation {
            customer,
            terms,
            decision,
        })
    }

    fn customer(&self, customer_id: CustomerId) -> Result<Customer, LendingServiceError> {
        self.customers
            .fetch(customer_id)?
            .ok_or(LendingServiceError::CustomerNotFound(customer_id))
    }

    fn customer_lock(&self, customer_id: CustomerId) -> Arc<Mutex<()>> {
        let mut locks = self
            .customer_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(customer_id).or_default().clone()
    }

    /// Drop the customer's lock entry once no other request holds or awaits it.
    fn release_customer_lock(&self, customer_id: CustomerId, lock: Arc<Mutex<()>>) {
        let mut locks = self
            .customer_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks
            .get(&customer_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&customer_id);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_customer_locks(&self) -> usize {
        self.customer_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Error raised by the lending service. Business rejections are not errors.
#[derive(Debug, thiserror::Error)]
pub enum LendingServiceError {
    #[error("Customer not found")]
    CustomerNotFound(CustomerId),
    #[error("Loan not found")]
    LoanNotFound(LoanId),
    #[error(transparent)]
    InvalidTerms(#[from] InvalidRequestTerms),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
