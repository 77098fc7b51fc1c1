use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::error::AppError;

use super::domain::{CustomerId, CustomerRegistration, LoanId, LoanRequest};
use super::repository::{CustomerRepository, LoanRepository};
use super::service::{LendingService, LendingServiceError};
use super::views::RegisteredCustomerView;

/// Source of the evaluation date used to decide which loans are active.
pub type Today = fn() -> NaiveDate;

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct LendingState<C, L> {
    pub(crate) service: Arc<LendingService<C, L>>,
    pub(crate) today: Today,
}

impl<C, L> Clone for LendingState<C, L> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            today: self.today,
        }
    }
}

/// Router exposing registration, eligibility, loan creation, and loan views.
pub fn lending_router<C, L>(service: Arc<LendingService<C, L>>) -> Router
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    lending_router_with_clock(service, local_today)
}

pub fn lending_router_with_clock<C, L>(service: Arc<LendingService<C, L>>, today: Today) -> Router
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    Router::new()
        .route("/register", post(register_handler::<C, L>))
        .route("/check-eligibility", post(eligibility_handler::<C, L>))
        .route("/create-loan", post(create_loan_handler::<C, L>))
        .route("/view-loan/:loan_id", get(loan_detail_handler::<C, L>))
        .route("/view-loans/:customer_id", get(customer_loans_handler::<C, L>))
        .with_state(LendingState { service, today })
}

pub(crate) async fn register_handler<C, L>(
    State(state): State<LendingState<C, L>>,
    axum::Json(registration): axum::Json<CustomerRegistration>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match state.service.register(registration) {
        Ok(customer) => {
            let view = RegisteredCustomerView::from(&customer);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn eligibility_handler<C, L>(
    State(state): State<LendingState<C, L>>,
    axum::Json(request): axum::Json<LoanRequest>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match state.service.check_eligibility(&request, (state.today)()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_loan_handler<C, L>(
    State(state): State<LendingState<C, L>>,
    axum::Json(request): axum::Json<LoanRequest>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match state.service.create_loan(&request, (state.today)()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn loan_detail_handler<C, L>(
    State(state): State<LendingState<C, L>>,
    Path(loan_id): Path<u64>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match state.service.loan_detail(LoanId(loan_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn customer_loans_handler<C, L>(
    State(state): State<LendingState<C, L>>,
    Path(customer_id): Path<u64>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match state
        .service
        .current_loans(CustomerId(customer_id), (state.today)())
    {
        Ok(loans) => (StatusCode::OK, axum::Json(loans)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: LendingServiceError) -> Response {
    if let LendingServiceError::Repository(source) = &err {
        warn!(error = %source, "lending repository failure");
    }
    AppError::from(err).into_response()
}
