//! Equated monthly installment arithmetic.

/// Monthly payment for `principal` at `annual_rate_percent` over `tenure_months`.
///
/// Uses the amortization formula `P * r / (1 - (1 + r)^-n)` with
/// `r = annual_rate_percent / 12 / 100`, rounded to two decimal places. The discount form stays
/// finite for very long tenures, where the installment approaches `P * r`. A zero rate falls
/// back to straight-line division and is left unrounded.
///
/// `tenure_months` must be positive; callers obtain it from validated
/// [`LoanTerms`](super::domain::LoanTerms).
pub fn compute_emi(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> f64 {
    debug_assert!(tenure_months > 0, "tenure must be positive");

    if annual_rate_percent == 0.0 {
        return principal / f64::from(tenure_months);
    }

    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let discount = (1.0 + monthly_rate).powf(-f64::from(tenure_months));
    let emi = principal * monthly_rate / (1.0 - discount);

    round_to_cents(emi)
}

pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
