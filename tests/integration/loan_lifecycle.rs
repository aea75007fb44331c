//! Loan ledger tests against a real PostgreSQL database

use axum::http::{Method, StatusCode};
use serde_json::json;

use escuela_server::{
    api,
    error::AppError,
    models::{
        inventory::{AdjustQuantity, InventoryItem, InventoryItemInput, QuantityOperation},
        loan::{CreateLoan, LoanStatus},
        student::{Student, StudentInput},
    },
    AppState,
};

use crate::common::{database_state, send, token, unique};

async fn new_student(state: &AppState) -> Student {
    state
        .services
        .students
        .create(&StudentInput {
            first_name: "Lucia".into(),
            last_name: "Mendez".into(),
            email: None,
            semester: "3".into(),
            control_number: Some(unique("ctl")),
            major: "Chemistry".into(),
        })
        .await
        .expect("create student")
}

async fn new_item(state: &AppState, quantity: i32) -> InventoryItem {
    state
        .services
        .inventory
        .create(&InventoryItemInput {
            name: unique("Microscope"),
            description: Some("Optical microscope".into()),
            available_quantity: quantity,
        })
        .await
        .expect("create item")
}

async fn available(state: &AppState, item_id: i32) -> i32 {
    state
        .services
        .inventory
        .get_by_id(item_id)
        .await
        .expect("get item")
        .available_quantity
}

fn loan(student: &Student, item: &InventoryItem) -> CreateLoan {
    CreateLoan {
        student_id: student.id,
        item_id: item.id,
    }
}

#[tokio::test]
#[ignore]
async fn test_loan_and_return_round_trip() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 2).await;

    let created = state.services.loans.create_loan(loan(&student, &item)).await.unwrap();
    assert_eq!(created.status, LoanStatus::Active);
    assert!(created.return_date.is_none());
    assert_eq!(available(&state, item.id).await, 1);

    let returned = state.services.loans.return_loan(created.id).await.unwrap();
    assert_eq!(returned.status, LoanStatus::Returned);
    assert!(returned.return_date.is_some());
    assert_eq!(returned.student_control_number, student.control_number);
    assert_eq!(returned.item_name.as_deref(), Some(item.name.as_str()));
    assert_eq!(available(&state, item.id).await, 2);
}

#[tokio::test]
#[ignore]
async fn test_second_return_is_rejected_without_restocking() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 1).await;

    let created = state.services.loans.create_loan(loan(&student, &item)).await.unwrap();
    state.services.loans.return_loan(created.id).await.unwrap();

    let err = state.services.loans.return_loan(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(available(&state, item.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_returns_restock_once() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 1).await;

    let loan_id = state.services.loans.create_loan(loan(&student, &item)).await.unwrap().id;
    assert_eq!(available(&state, item.id).await, 0);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let loans = state.services.loans.clone();
            tokio::spawn(async move { loans.return_loan(loan_id).await })
        })
        .collect();

    let mut returned = 0;
    let mut not_found = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => returned += 1,
            Err(AppError::NotFound(_)) => not_found += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!((returned, not_found), (1, 1));
    assert_eq!(available(&state, item.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_return_yields_joined_details_from_the_ledger() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 1).await;

    let created = state.services.loans.create_loan(loan(&student, &item)).await.unwrap();
    let details = state.services.repository.loans.return_loan(created.id).await.unwrap();

    assert_eq!(details.id, created.id);
    assert_eq!(details.status, LoanStatus::Returned);
    assert!(details.return_date.is_some());
    assert_eq!(details.student_first_name.as_deref(), Some("Lucia"));
    assert_eq!(details.item_name.as_deref(), Some(item.name.as_str()));
    assert_eq!(available(&state, item.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_quantity_adjustment_cannot_overflow() {
    let state = database_state().await;
    let item = new_item(&state, 1).await;

    let err = state
        .services
        .inventory
        .adjust_quantity(
            item.id,
            &AdjustQuantity {
                operation: QuantityOperation::Increment,
                amount: i32::MAX,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(available(&state, item.id).await, 1);

    let app = api::create_router(state.clone());
    let uri = format!("/api/v1/inventory/{}/quantity", item.id);
    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&token(1, false)),
        Some(json!({ "operation": "increment", "amount": i32::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidState");

    let max = state
        .services
        .inventory
        .adjust_quantity(
            item.id,
            &AdjustQuantity {
                operation: QuantityOperation::Increment,
                amount: i32::MAX - 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(max, i32::MAX);
}

#[tokio::test]
#[ignore]
async fn test_unavailable_item_creates_no_loan() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 0).await;

    let err = state.services.loans.create_loan(loan(&student, &item)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let history = state.services.loans.list_by_item(item.id).await.unwrap();
    assert!(history.is_empty());
    assert_eq!(available(&state, item.id).await, 0);
}

#[tokio::test]
#[ignore]
async fn test_unknown_student_or_item_is_not_found() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 1).await;

    let err = state
        .services
        .loans
        .create_loan(CreateLoan { student_id: i32::MAX, item_id: item.id })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = state
        .services
        .loans
        .create_loan(CreateLoan { student_id: student.id, item_id: i32::MAX })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(available(&state, item.id).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_loans_never_oversell() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 3).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let loans = state.services.loans.clone();
        let request = loan(&student, &item);
        handles.push(tokio::spawn(async move { loans.create_loan(request).await }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => assert!(matches!(e, AppError::InvalidState(_)), "unexpected error: {e}"),
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(available(&state, item.id).await, 0);

    let active = state
        .services
        .loans
        .list_by_item(item.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|l| l.status == LoanStatus::Active)
        .count();
    assert_eq!(active, 3);
}

#[tokio::test]
#[ignore]
async fn test_statistics_are_consistent() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 5).await;

    let first = state.services.loans.create_loan(loan(&student, &item)).await.unwrap();
    state.services.loans.create_loan(loan(&student, &item)).await.unwrap();
    state.services.loans.return_loan(first.id).await.unwrap();

    let stats = state.services.loans.statistics().await.unwrap();
    assert_eq!(stats.total, stats.active + stats.returned);
    assert!(stats.total >= 2);
    assert!(stats.top_items.len() <= 10);
    for pair in stats.top_items.windows(2) {
        assert!(
            pair[0].times_loaned > pair[1].times_loaned
                || (pair[0].times_loaned == pair[1].times_loaned && pair[0].item_id < pair[1].item_id)
        );
    }
}

#[tokio::test]
#[ignore]
async fn test_delete_refused_while_loan_active() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 1).await;

    let created = state.services.loans.create_loan(loan(&student, &item)).await.unwrap();

    let err = state.services.students.delete(student.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let err = state.services.inventory.delete(item.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    state.services.loans.return_loan(created.id).await.unwrap();
    state.services.students.delete(student.id).await.unwrap();
    state.services.inventory.delete(item.id).await.unwrap();

    // History keeps the names of deleted records
    let history = state.services.loans.list_by_student(student.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].student_first_name.as_deref(), Some("Lucia"));
    assert_eq!(history[0].item_name.as_deref(), Some(item.name.as_str()));

    let err = state.services.students.get_by_id(student.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn test_loan_endpoints_over_http() {
    let state = database_state().await;
    let student = new_student(&state).await;
    let item = new_item(&state, 1).await;
    let app = api::create_router(state.clone());
    let bearer = token(1, false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/loans",
        Some(&bearer),
        Some(json!({ "student_id": student.id, "item_id": item.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/loans",
        Some(&bearer),
        Some(json!({ "student_id": student.id, "item_id": item.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidState");

    let (status, body) = send(&app, Method::GET, "/api/v1/loans/active", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().iter().any(|l| l["id"] == loan_id));

    let uri = format!("/api/v1/loans/{}/return", loan_id);
    let (status, body) = send(&app, Method::PATCH, &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");
    assert_eq!(body["loan"]["status"], "returned");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/inventory/{}/quantity", item.id);
    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&bearer),
        Some(json!({ "operation": "decrement", "amount": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidState");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&bearer),
        Some(json!({ "operation": "increment", "amount": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_quantity"], 5);
}
