use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Customer, CustomerId, Loan, LoanId};
use super::policy::{ApprovalDecision, DecisionReason};

/// Response body for a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredCustomerView {
    pub customer_id: CustomerId,
    pub name: String,
    pub age: u8,
    pub monthly_income: u64,
    pub approved_limit: u64,
    pub phone_number: String,
}

impl From<&Customer> for RegisteredCustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            name: customer.full_name(),
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            phone_number: customer.phone_number.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityView {
    pub customer_id: CustomerId,
    pub approval: bool,
    pub interest_rate: f64,
    pub corrected_interest_rate: f64,
    pub tenure: u32,
    pub monthly_installment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl EligibilityView {
    pub fn new(
        customer_id: CustomerId,
        requested_rate: f64,
        tenure: u32,
        decision: &ApprovalDecision,
    ) -> Self {
        Self {
            customer_id,
            approval: decision.approved,
            interest_rate: requested_rate,
            corrected_interest_rate: decision.corrected_rate,
            tenure,
            monthly_installment: decision.monthly_installment,
            message: (!decision.approved).then(|| decision.reason.message()),
        }
    }
}

pub const LOAN_APPROVED_MESSAGE: &str = "Loan approved successfully";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanCreationView {
    pub loan_id: Option<LoanId>,
    pub customer_id: CustomerId,
    pub loan_approved: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_installment: Option<f64>,
}

impl LoanCreationView {
    pub fn approved(loan: &Loan) -> Self {
        Self {
            loan_id: Some(loan.loan_id),
            customer_id: loan.customer_id,
            loan_approved: true,
            message: LOAN_APPROVED_MESSAGE,
            monthly_installment: Some(loan.monthly_installment),
        }
    }

    pub fn rejected(customer_id: CustomerId, reason: DecisionReason) -> Self {
        Self {
            loan_id: None,
            customer_id,
            loan_approved: false,
            message: reason.message(),
            monthly_installment: None,
        }
    }
}

/// Customer fields embedded in a loan detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerMiniProfile {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: u8,
}

impl From<&Customer> for CustomerMiniProfile {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            phone_number: customer.phone_number.clone(),
            age: customer.age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanDetailView {
    pub loan_id: LoanId,
    pub customer: CustomerMiniProfile,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub tenure: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl LoanDetailView {
    pub fn new(loan: &Loan, customer: &Customer) -> Self {
        Self {
            loan_id: loan.loan_id,
            customer: CustomerMiniProfile::from(customer),
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_installment,
            tenure: loan.tenure,
            start_date: loan.start_date,
            end_date: loan.end_date,
        }
    }
}

/// Entry in a customer's list of current loans.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentLoanView {
    pub loan_id: LoanId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub repayments_left: u32,
}

impl From<&Loan> for CurrentLoanView {
    fn from(loan: &Loan) -> Self {
        Self {
            loan_id: loan.loan_id,
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_installment,
            repayments_left: loan.repayments_left(),
        }
    }
}
