//! REST layer tests driven through the router with `oneshot`

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::print_test_header;

async fn test_router() -> Router {
    let (module, _db) = common::create_test_module().await;
    module.register_rest(Router::new()).unwrap()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

/// Branch, category, product "123" at 9.0 and an open shipment; returns (branch, shipment)
async fn seed(router: &Router) -> (String, String) {
    let (status, branch) = send(router, "POST", "/branch", Some(json!({"name": "B1"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let branch = id_of(&branch);

    let (_, category) = send(router, "POST", "/category", Some(json!({"name": "Dairy"}))).await;
    let category = id_of(&category);

    let (status, _) = send(
        router,
        "POST",
        "/product",
        Some(json!({"name": "Milk", "price": 9.0, "barcode": "123", "category_id": category})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, shipment) = send(
        router,
        "POST",
        "/coming_table",
        Some(json!({"coming_id": "T1", "branch_id": branch})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (branch, id_of(&shipment))
}

#[tokio::test]
async fn test_rest_receive_flow() {
    print_test_header(
        "test_rest_receive_flow",
        &["Scan twice, finalize and read the remain over HTTP"],
    );
    let router = test_router().await;
    let (branch, shipment) = seed(&router).await;

    let scan = json!({"coming_table_id": shipment, "barcode": "123", "count": 3.0});
    let (status, body) = send(&router, "POST", "/coming_table_product", Some(scan)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "created");
    assert_eq!(body["line"]["total_price"], 27.0);

    let scan = json!({"coming_table_id": shipment, "barcode": "123", "count": 2.0});
    let (status, body) = send(&router, "POST", "/coming_table_product", Some(scan)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "merged");
    assert_eq!(body["line"]["count"], 5.0);

    let uri = format!("/coming_table_product/check?coming_table_id={shipment}&barcode=123");
    let (status, line) = send(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(line["total_price"], 45.0);

    let (status, report) = send(&router, "POST", &format!("/do_income/{shipment}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "finished");
    assert_eq!(report["remains"].as_array().unwrap().len(), 1);

    let uri = format!("/remain/check?branch_id={branch}&barcode=123");
    let (status, remain) = send(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(remain["count"], 5.0);
    assert_eq!(remain["total_price"], 45.0);

    let (_, header) = send(&router, "GET", &format!("/coming_table/{shipment}"), None).await;
    assert_eq!(header["status"], "finished");
}

#[tokio::test]
async fn test_rest_error_statuses() {
    print_test_header(
        "test_rest_error_statuses",
        &["404 / 409 / 422 / 400 come back as Problem Details"],
    );
    let router = test_router().await;
    let (_, shipment) = seed(&router).await;

    let missing = uuid::Uuid::new_v4();
    let (status, problem) = send(&router, "GET", &format!("/branch/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["status"], 404);

    let scan = json!({"coming_table_id": shipment, "barcode": "999", "count": 1.0});
    let (status, problem) = send(&router, "POST", "/coming_table_product", Some(scan)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(problem["title"], "Unknown Barcode");

    let scan = json!({"coming_table_id": shipment, "barcode": "123", "count": 1.0});
    send(&router, "POST", "/coming_table_product", Some(scan.clone())).await;
    let (status, _) = send(&router, "POST", &format!("/do_income/{shipment}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, problem) = send(&router, "POST", "/coming_table_product", Some(scan)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["status"], 409);
    let (status, _) = send(&router, "POST", &format!("/do_income/{shipment}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rest_malformed_input_is_400() {
    let router = test_router().await;

    let (status, problem) = send(&router, "GET", "/branch/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["title"], "Validation Error");

    let (status, _) = send(&router, "GET", "/branch?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, "GET", "/branch?page=1&limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, problem) = send(&router, "GET", "/branch?page=9223372036854775807&limit=10", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["status"], 400);

    let (status, _) = send(&router, "POST", "/branch", Some(json!({"address": "no name"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rest_list_and_update() {
    let router = test_router().await;
    for i in 0..3 {
        send(&router, "POST", "/branch", Some(json!({"name": format!("Branch {i}")}))).await;
    }

    let (status, list) = send(&router, "GET", "/branch?page=1&limit=2&search=branch", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 3);
    assert_eq!(list["items"].as_array().unwrap().len(), 2);

    let id = list["items"][0]["id"].as_str().unwrap().to_string();
    let (status, body) = send(
        &router,
        "PUT",
        &format!("/branch/{id}"),
        Some(json!({"name": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, _) = send(&router, "DELETE", &format!("/branch/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "DELETE", &format!("/branch/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rest_openapi_document() {
    let router = test_router().await;
    let (status, doc) = send(&router, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["components"]["schemas"]["IngestRequest"].is_object());
}
