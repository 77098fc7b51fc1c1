mod factors;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Customer, Loan};

/// Score given to customers without any loan history.
pub const NEW_CUSTOMER_SCORE: u8 = 50;
pub const MAX_SCORE: u8 = 100;

/// Stateless engine deriving a 0-100 credit score from a customer's loan history.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditScoreEngine;

impl CreditScoreEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score `history` as of `today`.
    ///
    /// Every factor is evaluated and reported even when the utilization override discards
    /// them, so the breakdown always explains the final number.
    pub fn score(&self, customer: &Customer, history: &[Loan], today: NaiveDate) -> CreditAssessment {
        if history.is_empty() {
            return CreditAssessment {
                score: NEW_CUSTOMER_SCORE,
                components: Vec::new(),
                utilization_override: false,
            };
        }

        let mut components = vec![
            factors::on_time_payments(history),
            factors::loan_count(history),
            factors::current_year_activity(history, today),
        ];

        let mut utilization_override = false;
        if let Some(signal) = factors::utilization(customer, history, today) {
            utilization_override = signal.over_limit;
            components.push(signal.component);
        }

        let total = if utilization_override {
            0.0
        } else {
            components.iter().map(|component| component.points).sum()
        };

        CreditAssessment {
            score: total.clamp(0.0, f64::from(MAX_SCORE)).trunc() as u8,
            components,
            utilization_override,
        }
    }
}

/// Factors contributing to the credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    OnTimePayments,
    LoanCount,
    CurrentYearActivity,
    Utilization,
}

/// Points awarded by a single factor, kept for audits of the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub notes: String,
}

/// Credit score with the factor trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub score: u8,
    pub components: Vec<ScoreComponent>,
    pub utilization_override: bool,
}

impl CreditAssessment {
    pub fn component(&self, factor: ScoreFactor) -> Option<&ScoreComponent> {
        self.components
            .iter()
            .find(|component| component.factor == factor)
    }
}
