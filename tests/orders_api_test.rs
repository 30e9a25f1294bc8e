//! HTTP-level tests for the order routes, run against the in-memory catalog
//! and repository so no database is needed.

use std::str::FromStr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use bigdecimal::BigDecimal;
use serde_json::{json, Value};

use order_pricing_service::application::order_service::OrderService;
use order_pricing_service::configure_routes;
use order_pricing_service::domain::product::Product;
use order_pricing_service::infrastructure::memory::{InMemoryOrderRepository, InMemoryProductCatalog};

const BRAKE_ID: &str = "6f1c2a52-0d7e-4a7f-9a55-0a4f2b3c1d11";

fn order_service() -> web::Data<OrderService> {
    let catalog = InMemoryProductCatalog::new([Product {
        id: BRAKE_ID.to_string(),
        name: "Brake Pad".to_string(),
        sku_code: "BRK-100".to_string(),
        price: BigDecimal::from_str("100").expect("valid decimal"),
        distributor_discount: Some(BigDecimal::from(10)),
        retailer_discount: Some(BigDecimal::from(5)),
    }]);
    web::Data::new(OrderService::new(
        Arc::new(InMemoryOrderRepository::new()),
        Arc::new(catalog),
    ))
}

fn order_body(customer_type_id: i64, discount_percentage: i64) -> Value {
    json!({
        "customer_id": "cust-1",
        "customer_type": "Distributor",
        "customer_type_id": customer_type_id,
        "order_items": [{
            "product_id": BRAKE_ID,
            "sku_code": "BRK-100",
            "quantity": 2,
            "unit_price": 100,
            "discount_percentage": discount_percentage,
            "discount_amount": 20,
            "net_price": 180,
            "total_amount": 180
        }],
        "subtotal": 180,
        "total_amount": 180,
        "order_date": "2025-01-15",
        "order_type": "Primary",
        "status": "pending",
        "created_by": "rep-7"
    })
}

macro_rules! app {
    ($svc:expr) => {
        test::init_service(App::new().app_data($svc.clone()).configure(configure_routes)).await
    };
}

#[actix_web::test]
async fn create_then_fetch_order() {
    let svc = order_service();
    let app = app!(svc);

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body(1, 10))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["subtotal"], json!("180.00"));
    assert_eq!(created["total_amount"], json!("180.00"));
    assert_eq!(created["status"], json!("pending"));
    let order_id = created["order_id"].as_str().expect("order_id").to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{order_id}"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(order["id"], json!(order_id));
    assert_eq!(order["order_date"], json!("2025-01-15"));
    let line = &order["order_items"][0];
    assert_eq!(line["net_price"], json!("90.00"));
    assert_eq!(line["total_amount"], json!("180.00"));
    assert_eq!(line["product_name"], json!("Brake Pad"));
}

#[actix_web::test]
async fn discount_above_ceiling_is_rejected_with_code() {
    let svc = order_service();
    let app = app!(svc);

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body(2, 10))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("DISCOUNT_NOT_ALLOWED"));
    assert_eq!(body["error"]["details"]["provided"], json!("10"));
    assert_eq!(body["error"]["details"]["allowed"], json!("5"));
}

#[actix_web::test]
async fn price_mismatch_reports_expected_and_provided() {
    let svc = order_service();
    let app = app!(svc);

    let mut body = order_body(1, 10);
    body["order_items"][0]["unit_price"] = json!(95);
    let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("PRICE_VALIDATION_FAILED"));
    assert_eq!(body["error"]["details"]["expected"]["unit_price"], json!("100.00"));
    assert_eq!(body["error"]["details"]["provided"]["unit_price"], json!(95));
}

#[actix_web::test]
async fn unknown_product_is_rejected() {
    let svc = order_service();
    let app = app!(svc);

    let mut body = order_body(1, 0);
    body["order_items"][0]["product_id"] = json!("ffffffff-ffff-4fff-bfff-ffffffffffff");
    body["order_items"][0]["sku_code"] = json!("NOPE");
    let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("PRODUCT_NOT_FOUND"));
    assert_eq!(body["error"]["details"]["reason"], json!("no_match"));
}

#[actix_web::test]
async fn missing_field_is_named() {
    let svc = order_service();
    let app = app!(svc);

    let mut body = order_body(1, 10);
    body.as_object_mut().expect("object").remove("order_date");
    let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["error"]["message"], json!("order_date is required"));
}

#[actix_web::test]
async fn malformed_json_uses_error_envelope() {
    let svc = order_service();
    let app = app!(svc);

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[actix_web::test]
async fn unknown_order_is_404() {
    let svc = order_service();
    let app = app!(svc);

    let req = test::TestRequest::get()
        .uri("/orders/ffffffff-ffff-4fff-bfff-ffffffffffff")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_and_update_orders() {
    let svc = order_service();
    let app = app!(svc);

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(order_body(1, 10))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/orders?page=1&limit=2").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["pagination"]["total_count"], json!(3));
    assert_eq!(page["pagination"]["total_pages"], json!(2));
    assert_eq!(page["pagination"]["has_next"], json!(true));

    let order_id = page["items"][0]["id"].as_str().expect("id").to_string();
    let req = test::TestRequest::patch()
        .uri(&format!("/orders/{order_id}"))
        .set_json(json!({ "status": "approved", "updated_by": "manager-1" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/orders?status=approved").to_request();
    let approved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(approved["pagination"]["total_count"], json!(1));
    assert_eq!(approved["items"][0]["id"], json!(order_id));
}

#[actix_web::test]
async fn empty_update_is_rejected() {
    let svc = order_service();
    let app = app!(svc);

    let req = test::TestRequest::patch()
        .uri("/orders/ffffffff-ffff-4fff-bfff-ffffffffffff")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_order_id_uses_error_envelope() {
    let svc = order_service();
    let app = app!(svc);

    let req = test::TestRequest::get().uri("/orders/not-a-uuid").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[actix_web::test]
async fn malformed_query_uses_error_envelope() {
    let svc = order_service();
    let app = app!(svc);

    let req = test::TestRequest::get().uri("/orders?page=abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[actix_web::test]
async fn page_past_the_end_is_empty() {
    let svc = order_service();
    let app = app!(svc);

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(order_body(1, 10))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/orders?page=9223372036854775807")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["items"], json!([]));
    assert_eq!(page["pagination"]["total_count"], json!(1));
}

#[actix_web::test]
async fn unstorable_line_total_is_a_validation_error() {
    let svc = order_service();
    let app = app!(svc);

    let mut body = order_body(1, 0);
    body["order_items"][0]["quantity"] = json!("1e13");
    let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["error"]["details"]["field"], json!("order_items[0].quantity"));
}
