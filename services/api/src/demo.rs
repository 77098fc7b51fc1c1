use crate::infra::{InMemoryCustomerRepository, InMemoryLoanRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use credit_core::config::AppConfig;
use credit_core::error::AppError;
use credit_core::lending::{
    CreditAssessment, CustomerId, CustomerRegistration, EligibilityView, LendingService,
    LoanRequest,
};
use std::sync::Arc;

type MemoryLendingService = LendingService<InMemoryCustomerRepository, InMemoryLoanRepository>;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Applicant's monthly income
    #[arg(long)]
    pub(crate) monthly_income: u64,
    /// Requested principal
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Requested annual interest rate in percent
    #[arg(long)]
    pub(crate) interest_rate: f64,
    /// Tenure in months
    #[arg(long)]
    pub(crate) tenure: u32,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn in_memory_service() -> Result<MemoryLendingService, AppError> {
    let config = AppConfig::load()?;
    Ok(LendingService::new(
        Arc::new(InMemoryCustomerRepository::default()),
        Arc::new(InMemoryLoanRepository::default()),
        config.lending,
    ))
}

fn applicant(first_name: &str, last_name: &str, monthly_income: u64) -> CustomerRegistration {
    CustomerRegistration {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age: 35,
        monthly_income,
        phone_number: "9000000000".to_string(),
    }
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        monthly_income,
        loan_amount,
        interest_rate,
        tenure,
        today,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let service = in_memory_service()?;
    let customer = service.register(applicant("Quote", "Applicant", monthly_income))?;
    let assessment = service.credit_assessment(customer.customer_id, today)?;
    let view = service.check_eligibility(
        &LoanRequest {
            customer_id: customer.customer_id,
            loan_amount,
            interest_rate,
            tenure,
        },
        today,
    )?;

    println!("Loan quote as of {today}");
    println!(
        "- Monthly income {} | approved limit {}",
        customer.monthly_income, customer.approved_limit
    );
    render_assessment(&assessment);
    render_eligibility(&view);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let service = in_memory_service()?;

    println!("Credit approval demo ({today})");
    let customer = service.register(applicant("Asha", "Verma", 50_000))?;
    println!(
        "\nRegistered customer {} ({}) with approved limit {}",
        customer.customer_id.0,
        customer.full_name(),
        customer.approved_limit
    );

    let requests = [
        (200_000.0, 8.0, 24),
        (1_500_000.0, 12.0, 120),
        (1_700_000.0, 14.0, 60),
    ];
    for (loan_amount, interest_rate, tenure) in requests {
        let request = LoanRequest {
            customer_id: customer.customer_id,
            loan_amount,
            interest_rate,
            tenure,
        };
        println!("\nRequest {loan_amount:.0} at {interest_rate}% over {tenure} months");
        render_eligibility(&service.check_eligibility(&request, today)?);

        let created = service.create_loan(&request, today)?;
        match created.loan_id {
            Some(loan_id) => println!("  Created loan {}: {}", loan_id.0, created.message),
            None => println!("  Not created: {}", created.message),
        }
    }

    println!("\nCredit profile after issuance");
    render_assessment(&service.credit_assessment(customer.customer_id, today)?);
    render_current_loans(&service, customer.customer_id, today)?;
    Ok(())
}

fn render_assessment(assessment: &CreditAssessment) {
    println!("- Credit score {}", assessment.score);
    if assessment.utilization_override {
        println!("  Active principal has reached the approved limit; score forced to 0");
    }
    for component in &assessment.components {
        println!(
            "  - {:?}: {:.1} ({})",
            component.factor, component.points, component.notes
        );
    }
}

fn render_eligibility(view: &EligibilityView) {
    let verdict = if view.approval { "approved" } else { "rejected" };
    println!(
        "  Eligibility {verdict} | requested {}% | corrected {}% | EMI {:.2}",
        view.interest_rate, view.corrected_interest_rate, view.monthly_installment
    );
    if let Some(message) = view.message {
        println!("  Reason: {message}");
    }
}

fn render_current_loans(
    service: &MemoryLendingService,
    customer_id: CustomerId,
    today: NaiveDate,
) -> Result<(), AppError> {
    let loans = service.current_loans(customer_id, today)?;
    if loans.is_empty() {
        println!("- No current loans");
        return Ok(());
    }

    println!("- Current loans");
    for loan in &loans {
        let detail = service.loan_detail(loan.loan_id)?;
        println!(
            "  - #{} {:.0} at {}% | EMI {:.2} | {} repayments left | ends {}",
            loan.loan_id.0,
            loan.loan_amount,
            loan.interest_rate,
            loan.monthly_installment,
            loan.repayments_left,
            detail.end_date
        );
    }
    Ok(())
}
