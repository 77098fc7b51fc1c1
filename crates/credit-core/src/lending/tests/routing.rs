use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::lending::repository::LoanRepository;
use crate::lending::router::{
    create_loan_handler, customer_loans_handler, eligibility_handler, LendingState,
};
use crate::lending::{LendingService, PolicyConfig};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn state(
    service: LendingService<MemoryCustomers, MemoryLoans>,
) -> LendingState<MemoryCustomers, MemoryLoans> {
    LendingState {
        service: Arc::new(service),
        today,
    }
}

#[tokio::test]
async fn register_route_returns_created_customer() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/register",
            json!({
                "first_name": "Ravi",
                "last_name": "Kumar",
                "age": 29,
                "monthly_income": 50000,
                "phone_number": "9123456780"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["name"], json!("Ravi Kumar"));
    assert_eq!(payload["approved_limit"], json!(1_800_000));
    assert_eq!(payload["monthly_income"], json!(50_000));
    assert!(payload["customer_id"].is_u64());
}

#[tokio::test]
async fn register_route_rejects_invalid_registration() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/register",
            json!({
                "first_name": "",
                "last_name": "Kumar",
                "age": 29,
                "monthly_income": 50000,
                "phone_number": "9123456780"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn eligibility_handler_omits_message_on_approval() {
    let (service, _, _) = build_service();
    let customer = service.register(registration(50_000)).expect("registers");

    let response = eligibility_handler(
        State(state(service)),
        axum::Json(loan_request(customer.customer_id, 200_000.0, 8.0, 24)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["approval"], json!(true));
    assert_eq!(payload["corrected_interest_rate"], json!(12.0));
    assert_eq!(payload["monthly_installment"], json!(9414.69));
    assert!(payload.get("message").is_none());
}

#[tokio::test]
async fn eligibility_handler_returns_not_found_for_unknown_customer() {
    let (service, _, _) = build_service();

    let response = eligibility_handler(
        State(state(service)),
        axum::Json(loan_request(crate::lending::CustomerId(12), 10_000.0, 10.0, 6)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Customer not found"));
}

#[tokio::test]
async fn create_loan_handler_reports_rejection_as_success() {
    let (service, _, _) = build_service();
    let customer = service.register(registration(10_000)).expect("registers");

    let response = create_loan_handler(
        State(state(service)),
        axum::Json(loan_request(customer.customer_id, 200_000.0, 8.0, 24)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["loan_approved"], json!(false));
    assert_eq!(payload["loan_id"], Value::Null);
    assert_eq!(payload["message"], json!("EMI exceeds 50% of monthly salary"));
    assert!(payload.get("monthly_installment").is_none());
}

#[tokio::test]
async fn create_loan_handler_rejects_zero_tenure() {
    let (service, _, _) = build_service();
    let customer = service.register(registration(50_000)).expect("registers");

    let response = create_loan_handler(
        State(state(service)),
        axum::Json(loan_request(customer.customer_id, 200_000.0, 8.0, 0)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn loan_views_round_trip_through_router() {
    let (service, _, _) = build_service();
    let customer = service.register(registration(50_000)).expect("registers");
    let created = service
        .create_loan(
            &loan_request(customer.customer_id, 200_000.0, 8.0, 24),
            today(),
        )
        .expect("creation evaluated");
    let loan_id = created.loan_id.expect("approved").0;
    let router = router_with_service(service);

    let detail = router
        .clone()
        .oneshot(
            Request::get(format!("/view-loan/{loan_id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(detail.status(), StatusCode::OK);
    let payload = read_json_body(detail).await;
    assert_eq!(payload["loan_id"], json!(loan_id));
    assert_eq!(payload["customer"]["first_name"], json!("Asha"));
    assert_eq!(payload["start_date"], json!("2025-06-15"));
    assert_eq!(payload["end_date"], json!("2027-06-05"));

    let missing = router
        .oneshot(
            Request::get("/view-loan/9999")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customer_loans_handler_lists_active_loans() {
    let (service, _, loans) = build_service();
    let customer = service.register(registration(50_000)).expect("registers");
    loans
        .insert(
            LoanFixture::started(date(2024, 1, 1), 120_000.0, 24)
                .paid(10)
                .for_customer(customer.customer_id),
        )
        .expect("seed active loan");
    loans
        .insert(
            LoanFixture::started(date(2020, 1, 1), 50_000.0, 12)
                .paid(12)
                .for_customer(customer.customer_id),
        )
        .expect("seed closed loan");

    let response = customer_loans_handler(
        State(state(service)),
        Path(customer.customer_id.0),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("array payload");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["repayments_left"], json!(14));
}

#[tokio::test]
async fn customer_loans_handler_returns_not_found_for_unknown_customer() {
    let service = LendingService::new(
        Arc::new(MemoryCustomers::default()),
        Arc::new(MemoryLoans::default()),
        PolicyConfig::default(),
    );

    let response = customer_loans_handler(State(state(service)), Path(77)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_loan_route_rejects_tenure_past_calendar_range() {
    let (service, _, loans) = build_service();
    let customer = service.register(registration(50_000)).expect("registers");
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/create-loan",
            json!({
                "customer_id": customer.customer_id.0,
                "loan_amount": 1.0,
                "interest_rate": 12.0,
                "tenure": 4_000_000_000_u32
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("4000000000")));
    assert_eq!(loans.count(), 0);
}
