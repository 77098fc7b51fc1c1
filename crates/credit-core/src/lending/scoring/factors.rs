use chrono::{Datelike, NaiveDate};

use super::super::domain::{Customer, Loan};
use super::{ScoreComponent, ScoreFactor};

const ON_TIME_MAX_POINTS: f64 = 40.0;
const POINTS_PER_LOAN: f64 = 4.0;
const COUNTED_LOANS_CAP: usize = 5;
const POINTS_PER_RECENT_LOAN: f64 = 5.0;
const RECENT_ACTIVITY_MAX_POINTS: f64 = 20.0;

/// Utilization tier reached by the customer's active principal.
pub(crate) struct UtilizationSignal {
    pub component: ScoreComponent,
    pub over_limit: bool,
}

pub(crate) fn on_time_payments(history: &[Loan]) -> ScoreComponent {
    let total_emis: u64 = history.iter().map(|loan| u64::from(loan.tenure)).sum();
    let paid_on_time: u64 = history
        .iter()
        .map(|loan| u64::from(loan.emis_paid_on_time))
        .sum();

    if total_emis == 0 {
        return ScoreComponent {
            factor: ScoreFactor::OnTimePayments,
            points: 0.0,
            notes: "no scheduled EMIs on record".to_string(),
        };
    }

    let ratio = paid_on_time as f64 / total_emis as f64;
    ScoreComponent {
        factor: ScoreFactor::OnTimePayments,
        points: (ratio * ON_TIME_MAX_POINTS).min(ON_TIME_MAX_POINTS),
        notes: format!("{paid_on_time} of {total_emis} EMIs paid on time"),
    }
}

pub(crate) fn loan_count(history: &[Loan]) -> ScoreComponent {
    let counted = history.len().min(COUNTED_LOANS_CAP);
    ScoreComponent {
        factor: ScoreFactor::LoanCount,
        points: counted as f64 * POINTS_PER_LOAN,
        notes: format!("{} past loan(s)", history.len()),
    }
}

pub(crate) fn current_year_activity(history: &[Loan], today: NaiveDate) -> ScoreComponent {
    let year = today.year();
    let recent = history
        .iter()
        .filter(|loan| loan.start_date.year() == year)
        .count();

    ScoreComponent {
        factor: ScoreFactor::CurrentYearActivity,
        points: (recent as f64 * POINTS_PER_RECENT_LOAN).min(RECENT_ACTIVITY_MAX_POINTS),
        notes: format!("{recent} loan(s) started in {year}"),
    }
}

/// `None` when the customer has no approved limit to measure against.
pub(crate) fn utilization(
    customer: &Customer,
    history: &[Loan],
    today: NaiveDate,
) -> Option<UtilizationSignal> {
    if customer.approved_limit == 0 {
        return None;
    }

    let current_amount: f64 = history
        .iter()
        .filter(|loan| loan.is_active(today))
        .map(|loan| loan.loan_amount)
        .sum();
    let ratio = current_amount / customer.approved_limit as f64;

    let (points, over_limit) = if ratio <= 0.5 {
        (20.0, false)
    } else if ratio <= 0.75 {
        (10.0, false)
    } else if ratio < 1.0 {
        (5.0, false)
    } else {
        (0.0, true)
    };

    let notes = if over_limit {
        format!(
            "active principal at {:.0}% of approved limit; score forced to zero",
            ratio * 100.0
        )
    } else {
        format!("active principal at {:.0}% of approved limit", ratio * 100.0)
    };

    Some(UtilizationSignal {
        component: ScoreComponent {
            factor: ScoreFactor::Utilization,
            points,
            notes,
        },
        over_limit,
    })
}
