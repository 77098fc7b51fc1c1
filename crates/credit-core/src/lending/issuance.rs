use chrono::{Duration, NaiveDate};

use super::domain::{CustomerId, InvalidRequestTerms, LoanTerms, NewLoan};
use super::policy::{ApprovalDecision, DecisionReason};

/// Turns approved decisions into loan records for the repository.
#[derive(Debug, Clone, Copy)]
pub struct LoanIssuer {
    days_per_tenure_month: u32,
}

/// Why no loan record was produced.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum IssuanceError {
    #[error("{}", .0.message())]
    Rejected(DecisionReason),
    #[error(transparent)]
    InvalidTerms(#[from] InvalidRequestTerms),
}

impl LoanIssuer {
    pub fn new(days_per_tenure_month: u32) -> Self {
        Self {
            days_per_tenure_month,
        }
    }

    /// Maturity of a loan starting on `start_date`.
    ///
    /// Adds a flat `days_per_tenure_month` per month of tenure rather than calendar months, so
    /// long tenures end earlier than their calendar anniversary.
    pub fn end_date(
        &self,
        start_date: NaiveDate,
        tenure: u32,
    ) -> Result<NaiveDate, InvalidRequestTerms> {
        let days = i64::from(tenure) * i64::from(self.days_per_tenure_month);
        Duration::try_days(days)
            .and_then(|span| start_date.checked_add_signed(span))
            .ok_or(InvalidRequestTerms::TenureOutOfRange(tenure))
    }

    /// Build the loan for an approved decision, or hand back the rejection reason.
    pub fn issue(
        &self,
        customer_id: CustomerId,
        terms: &LoanTerms,
        decision: &ApprovalDecision,
        start_date: NaiveDate,
    ) -> Result<NewLoan, IssuanceError> {
        if !decision.approved {
            return Err(IssuanceError::Rejected(decision.reason));
        }

        Ok(NewLoan {
            customer_id,
            loan_amount: terms.amount(),
            tenure: terms.tenure(),
            interest_rate: decision.corrected_rate,
            monthly_installment: decision.monthly_installment,
            emis_paid_on_time: 0,
            start_date,
            end_date: self.end_date(start_date, terms.tenure())?,
        })
    }
}

impl Default for LoanIssuer {
    fn default() -> Self {
        Self::new(30)
    }
}
