use serde::{Deserialize, Serialize};

use super::domain::{Customer, Loan, LoanTerms};
use super::emi::compute_emi;

/// Tunable knobs of the approval policy. Rate tiers are fixed; see [`minimum_rate_for`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Share of gross monthly income all installments together may consume.
    pub affordability_ratio: f64,
    /// Days added per tenure month when computing a new loan's end date.
    pub days_per_tenure_month: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            affordability_ratio: 0.5,
            days_per_tenure_month: 30,
        }
    }
}

/// Outcome category of an approval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionReason {
    Approved,
    LimitExceeded,
    ScoreTooLow,
    EmiTooHigh,
}

impl DecisionReason {
    pub const fn message(self) -> &'static str {
        match self {
            DecisionReason::Approved => "Approved",
            DecisionReason::LimitExceeded => "Loan amount exceeds approved limit",
            DecisionReason::ScoreTooLow => "Credit score too low",
            DecisionReason::EmiTooHigh => "EMI exceeds 50% of monthly salary",
        }
    }
}

/// Result of running the policy against a loan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub approved: bool,
    pub credit_score: u8,
    pub corrected_rate: f64,
    pub monthly_installment: f64,
    pub reason: DecisionReason,
}

/// Lowest annual rate (percent) offered at `score`, or `None` when the score is too low to lend.
pub fn minimum_rate_for(score: u8) -> Option<f64> {
    if score > 50 {
        Some(10.0)
    } else if score > 30 {
        Some(12.0)
    } else if score > 10 {
        Some(16.0)
    } else {
        None
    }
}

/// Linear approval pipeline: limit, score tier, rate correction, affordability.
#[derive(Debug, Clone, Default)]
pub struct ApprovalPolicy {
    config: PolicyConfig,
}

impl ApprovalPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Decide on `terms` for `customer`. `active_loans` must already be filtered to loans that
    /// are active on the evaluation date.
    pub fn decide(
        &self,
        credit_score: u8,
        customer: &Customer,
        active_loans: &[Loan],
        terms: &LoanTerms,
    ) -> ApprovalDecision {
        let reject = |rate: f64, reason: DecisionReason| ApprovalDecision {
            approved: false,
            credit_score,
            corrected_rate: rate,
            monthly_installment: compute_emi(terms.amount(), rate, terms.tenure()),
            reason,
        };

        let active_principal: f64 = active_loans.iter().map(|loan| loan.loan_amount).sum();
        if active_principal + terms.amount() > customer.approved_limit as f64 {
            return reject(terms.rate(), DecisionReason::LimitExceeded);
        }

        let Some(floor) = minimum_rate_for(credit_score) else {
            return reject(terms.rate(), DecisionReason::ScoreTooLow);
        };

        let corrected_rate = terms.rate().max(floor);
        let monthly_installment = compute_emi(terms.amount(), corrected_rate, terms.tenure());

        let existing_installments: f64 = active_loans
            .iter()
            .map(|loan| loan.monthly_installment)
            .sum();
        let affordable = customer.monthly_income as f64 * self.config.affordability_ratio;
        let total_installments = monthly_installment + existing_installments;
        if !total_installments.is_finite() || total_installments > affordable {
            return ApprovalDecision {
                approved: false,
                credit_score,
                corrected_rate,
                monthly_installment,
                reason: DecisionReason::EmiTooHigh,
            };
        }

        ApprovalDecision {
            approved: true,
            credit_score,
            corrected_rate,
            monthly_installment,
            reason: DecisionReason::Approved,
        }
    }
}
