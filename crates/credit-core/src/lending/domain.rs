use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned to a customer by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

/// Identifier assigned to a loan by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub u64);

/// Read model of a registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: u8,
    pub monthly_income: u64,
    pub approved_limit: u64,
    pub current_debt: u64,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Customer fields validated at registration, before the repository assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: u8,
    pub monthly_income: u64,
    pub approved_limit: u64,
}

/// Read model of a persisted loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub emis_paid_on_time: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Loan {
    /// A loan is active until the day after its end date.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.end_date >= today
    }

    pub fn repayments_left(&self) -> u32 {
        self.tenure.saturating_sub(self.emis_paid_on_time)
    }
}

/// Loan record produced by issuance, awaiting an id from the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub emis_paid_on_time: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Registration payload accepted at `/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRegistration {
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub monthly_income: u64,
    pub phone_number: String,
}

impl CustomerRegistration {
    pub fn validate(self) -> Result<NewCustomer, RegistrationError> {
        if self.first_name.trim().is_empty() {
            return Err(RegistrationError::MissingField("first_name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(RegistrationError::MissingField("last_name"));
        }
        if self.phone_number.trim().is_empty() {
            return Err(RegistrationError::MissingField("phone_number"));
        }
        if self.age == 0 {
            return Err(RegistrationError::InvalidAge);
        }

        Ok(NewCustomer {
            approved_limit: approved_limit_for(self.monthly_income),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            age: self.age,
            monthly_income: self.monthly_income,
        })
    }
}

const LIMIT_INCOME_MULTIPLE: u64 = 36;
const LIMIT_ROUNDING_UNIT: u64 = 100_000;

/// Pre-approved limit: 36 months of income rounded to the nearest 100,000.
///
/// Exact halves round to the even multiple, so 150,000 becomes 200,000 and 250,000 becomes
/// 200,000.
pub fn approved_limit_for(monthly_income: u64) -> u64 {
    let raw = monthly_income.saturating_mul(LIMIT_INCOME_MULTIPLE);
    let units = raw / LIMIT_ROUNDING_UNIT;
    let remainder = raw % LIMIT_ROUNDING_UNIT;
    let half = LIMIT_ROUNDING_UNIT / 2;

    let rounded_units = if remainder > half || (remainder == half && units % 2 == 1) {
        units + 1
    } else {
        units
    };

    rounded_units.saturating_mul(LIMIT_ROUNDING_UNIT)
}

/// Rejection raised for a malformed registration payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("{0} must not be blank")]
    MissingField(&'static str),
    #[error("age must be greater than zero")]
    InvalidAge,
}

/// Loan terms as submitted to `/check-eligibility` and `/create-loan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
}

impl LoanRequest {
    /// Reject terms the policy cannot evaluate meaningfully.
    pub fn terms(&self) -> Result<LoanTerms, InvalidRequestTerms> {
        if !self.loan_amount.is_finite() || self.loan_amount <= 0.0 {
            return Err(InvalidRequestTerms::NonPositiveAmount(self.loan_amount));
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err(InvalidRequestTerms::InvalidRate(self.interest_rate));
        }
        if self.tenure == 0 {
            return Err(InvalidRequestTerms::ZeroTenure);
        }

        Ok(LoanTerms {
            amount: self.loan_amount,
            rate: self.interest_rate,
            tenure: self.tenure,
        })
    }
}

/// Validated loan terms: positive amount and tenure, finite non-negative rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    amount: f64,
    rate: f64,
    tenure: u32,
}

impl LoanTerms {
    pub fn new(amount: f64, rate: f64, tenure: u32) -> Result<Self, InvalidRequestTerms> {
        LoanRequest {
            customer_id: CustomerId(0),
            loan_amount: amount,
            interest_rate: rate,
            tenure,
        }
        .terms()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn tenure(&self) -> u32 {
        self.tenure
    }
}

/// Precondition violation for requested loan terms.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidRequestTerms {
    #[error("loan_amount must be positive, got {0}")]
    NonPositiveAmount(f64),
    #[error("interest_rate must be a non-negative percentage, got {0}")]
    InvalidRate(f64),
    #[error("tenure must be at least one month")]
    ZeroTenure,
    #[error("tenure of {0} months ends beyond the supported calendar range")]
    TenureOutOfRange(u32),
}
