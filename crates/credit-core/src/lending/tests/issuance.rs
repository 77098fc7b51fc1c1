use super::common::*;
use crate::lending::domain::CustomerId;
use crate::lending::{
    ApprovalPolicy, DecisionReason, InvalidRequestTerms, IssuanceError, LoanIssuer, LoanTerms,
};

#[test]
fn approved_decision_produces_loan_with_thirty_day_months() {
    let terms = LoanTerms::new(100_000.0, 8.0, 12).expect("valid terms");
    let decision = ApprovalPolicy::default().decide(60, &customer(50_000, 1_800_000), &[], &terms);
    let start = date(2025, 1, 1);

    let loan = LoanIssuer::default()
        .issue(CustomerId(7), &terms, &decision, start)
        .expect("approved decision issues a loan");

    assert_eq!(loan.customer_id, CustomerId(7));
    assert_eq!(loan.start_date, start);
    assert_eq!(loan.end_date, date(2025, 12, 27));
    assert_eq!(loan.emis_paid_on_time, 0);
    assert_close(loan.interest_rate, 10.0);
    assert_close(loan.monthly_installment, decision.monthly_installment);
    assert_close(loan.loan_amount, 100_000.0);
}

#[test]
fn day_count_per_month_is_configurable() {
    let terms = LoanTerms::new(100_000.0, 12.0, 2).expect("valid terms");
    let decision = ApprovalPolicy::default().decide(60, &customer(50_000, 1_800_000), &[], &terms);

    let loan = LoanIssuer::new(31)
        .issue(CustomerId(7), &terms, &decision, date(2025, 1, 1))
        .expect("loan issued");

    assert_eq!(loan.end_date, date(2025, 3, 4));
}

#[test]
fn rejected_decision_forwards_reason() {
    let terms = LoanTerms::new(100_000.0, 12.0, 12).expect("valid terms");
    let decision = ApprovalPolicy::default().decide(5, &customer(50_000, 1_800_000), &[], &terms);

    let outcome = LoanIssuer::default().issue(CustomerId(7), &terms, &decision, today());

    assert_eq!(outcome, Err(IssuanceError::Rejected(DecisionReason::ScoreTooLow)));
}

#[test]
fn tenure_beyond_duration_range_is_reported_instead_of_panicking() {
    let terms = LoanTerms::new(1.0, 12.0, 4_000_000_000).expect("valid terms");
    let decision = ApprovalPolicy::default().decide(60, &customer(50_000, 1_800_000), &[], &terms);
    assert!(decision.approved);

    let outcome = LoanIssuer::default().issue(CustomerId(7), &terms, &decision, today());

    assert_eq!(
        outcome,
        Err(IssuanceError::InvalidTerms(
            InvalidRequestTerms::TenureOutOfRange(4_000_000_000)
        ))
    );
}

#[test]
fn end_date_past_calendar_range_is_rejected() {
    let issuer = LoanIssuer::default();

    assert_eq!(
        issuer.end_date(today(), 10_000_000),
        Err(InvalidRequestTerms::TenureOutOfRange(10_000_000))
    );
    assert_eq!(issuer.end_date(date(2025, 1, 1), 12), Ok(date(2025, 12, 27)));
}
