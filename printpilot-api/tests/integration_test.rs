use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use printpilot_api::{app, AppState};
use printpilot_store::app_config::{PdfConfig, ShopConfig};
use printpilot_store::{seed, Repositories};
use serde_json::{json, Value};
use tower::util::ServiceExt;

async fn app_with_fonts(pdf: PdfConfig) -> Router {
    let repos = Repositories::in_memory();
    seed::seed_if_empty(repos.price_lists.as_ref()).await.unwrap();

    let shop = ShopConfig {
        name: "Test Print Shop".into(),
        tagline: Some("Printing, large format and stationery".into()),
        address_lines: vec!["1 Test Lane".into()],
        contact: Some("555-0100".into()),
        currency_symbol: "$".into(),
    };
    app(AppState::new(repos, shop, pdf))
}

async fn test_app() -> Router {
    app_with_fonts(PdfConfig {
        font_dir: "/nonexistent/fonts".into(),
        font_family: "Missing".into(),
    })
    .await
}

/// Same app, rendering with the fonts shipped at the workspace root.
async fn pdf_app() -> Router {
    app_with_fonts(PdfConfig {
        font_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../fonts").into(),
        font_family: "DejaVuSans".into(),
    })
    .await
}

async fn download(app: &Router, uri: &str) -> (StatusCode, String, String, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let header_text = |name| {
        response
            .headers()
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default()
    };
    let content_type = header_text(header::CONTENT_TYPE);
    let disposition = header_text(header::CONTENT_DISPOSITION);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, disposition, bytes.to_vec())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn printing_job() -> Value {
    json!({
        "serviceType": "printing",
        "paperSize": "A4",
        "printType": "color",
        "quantity": 10,
        "finishingOptions": [],
        "paymentMethod": "cash"
    })
}

fn field_names(body: &Value) -> Vec<String> {
    body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_string())
        .collect()
}

async fn entry_id(app: &Router, name: &str) -> String {
    let (_, entries) = send(app, Method::GET, "/api/price-lists", None).await;
    entries
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["serviceName"] == name)
        .map(|e| e["id"].as_str().unwrap().to_string())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_printing_order_is_priced_and_receipted() {
    let app = test_app().await;

    let (status, order) = send(&app, Method::POST, "/api/orders", Some(printing_job())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(order["jobNumber"].as_str().unwrap().starts_with("JOB-"));
    assert_eq!(order["subtotal"], "6.50");
    assert_eq!(order["tax"], "0.65");
    assert_eq!(order["total"], "7.15");

    let order_id = order["id"].as_str().unwrap();
    let (status, receipt) = send(&app, Method::GET, &format!("/api/receipts/{}", order_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(receipt["receiptNumber"].as_str().unwrap().starts_with("RCP-"));
    assert_eq!(
        receipt["itemizedBreakdown"],
        json!([
            { "service": "A4 Paper", "quantity": 10, "unitPrice": "0.50", "total": "5.00" },
            { "service": "Color Printing", "quantity": 10, "unitPrice": "0.15", "total": "1.50" }
        ])
    );
    assert_eq!(receipt["total"], "7.15");

    let (status, fetched) = send(&app, Method::GET, &format!("/api/orders/{}", order_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["jobNumber"], order["jobNumber"]);

    let (_, orders) = send(&app, Method::GET, "/api/orders", None).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_quote_prices_large_format_without_storing() {
    let app = test_app().await;

    let (status, quote) = send(
        &app,
        Method::POST,
        "/api/orders/quote",
        Some(json!({
            "serviceType": "largeformat",
            "serviceName": "Flex Banner",
            "quantity": 1,
            "customWidth": 3,
            "customHeight": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["breakdown"][0]["total"], "12.00");
    assert_eq!(quote["breakdown"][0]["quantity"], "3×2 sqft × 1");
    assert_eq!(quote["subtotal"], "12.00");
    assert_eq!(quote["tax"], "1.20");
    assert_eq!(quote["total"], "13.20");

    let (_, orders) = send(&app, Method::GET, "/api/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unmatched_order_has_zero_total() {
    let app = test_app().await;
    let (status, order) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({ "serviceType": "products", "serviceName": "Calendar", "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total"], "0.00");

    let order_id = order["id"].as_str().unwrap();
    let (_, receipt) = send(&app, Method::GET, &format!("/api/receipts/{}", order_id), None).await;
    assert_eq!(receipt["itemizedBreakdown"], json!([]));
}

#[tokio::test]
async fn test_order_validation_errors() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({ "serviceType": "printing", "quantity": 10, "printType": "mono" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["paperSize"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({ "serviceType": "printing", "paperSize": "A4", "printType": "mono", "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["quantity"]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, orders) = send(&app, Method::GET, "/api/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = test_app().await;
    let missing = uuid::Uuid::new_v4();

    for uri in [
        format!("/api/orders/{}", missing),
        format!("/api/receipts/{}", missing),
        format!("/api/receipts/{}/pdf", missing),
        format!("/api/price-lists/{}", missing),
        format!("/api/customers/{}", missing),
    ] {
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let (status, body) = send(&app, Method::DELETE, &format!("/api/price-lists/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Price list not found");
}

#[tokio::test]
async fn test_receipt_survives_catalog_changes() {
    let app = test_app().await;
    let (_, order) = send(&app, Method::POST, "/api/orders", Some(printing_job())).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let a4 = entry_id(&app, "A4").await;
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/price-lists/{}", a4),
        Some(json!({ "basePrice": "9.99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["basePrice"], "9.99");
    assert_eq!(updated["unit"], "sheet");

    let color = entry_id(&app, "Color").await;
    let (status, _) = send(&app, Method::DELETE, &format!("/api/price-lists/{}", color), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, receipt) = send(&app, Method::GET, &format!("/api/receipts/{}", order_id), None).await;
    assert_eq!(receipt["subtotal"], "6.50");
    assert_eq!(receipt["total"], "7.15");
    assert_eq!(receipt["itemizedBreakdown"][0]["unitPrice"], "0.50");

    let (_, requote) = send(&app, Method::POST, "/api/orders/quote", Some(printing_job())).await;
    assert_eq!(requote["subtotal"], "99.90");
}

#[tokio::test]
async fn test_price_list_validation_and_ambiguities() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/price-lists",
        Some(json!({ "serviceName": "", "category": "paper", "basePrice": -1, "unit": "sheet" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["basePrice", "serviceName"]);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/price-lists",
        Some(json!({ "serviceName": "Foil", "category": "embossing", "basePrice": 1, "unit": "job" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/price-lists",
        Some(json!({ "serviceName": "A4 Glossy", "category": "paper", "basePrice": "0.80", "unit": "sheet" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["isActive"], true);

    let (status, ambiguities) = send(&app, Method::GET, "/api/price-lists/ambiguities", None).await;
    assert_eq!(status, StatusCode::OK);
    let ambiguities = ambiguities.as_array().unwrap();
    assert_eq!(ambiguities.len(), 1);
    assert_eq!(ambiguities[0]["category"], "paper");
    assert_eq!(ambiguities[0]["matches"].as_array().unwrap().len(), 2);

    // "A4" still sorts ahead of "A4 Glossy"
    let (_, quote) = send(&app, Method::POST, "/api/orders/quote", Some(printing_job())).await;
    assert_eq!(quote["breakdown"][0]["unitPrice"], "0.50");
}

#[tokio::test]
async fn test_customer_ledgers() {
    let app = test_app().await;

    let (status, customer) = send(
        &app,
        Method::POST,
        "/api/customers",
        Some(json!({ "name": "Ada Print Co", "email": "ada@example.com", "phone": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(customer["balance"], "0.00");
    assert_eq!(customer["email"], "ada@example.com");
    assert_eq!(customer["phone"], Value::Null);
    let customer_id = customer["id"].as_str().unwrap().to_string();

    let (status, deposit) = send(
        &app,
        Method::POST,
        "/api/deposits",
        Some(json!({ "customerId": customer_id, "amount": "50", "paymentMethod": "cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(deposit["amount"], "50.00");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/goodwill",
        Some(json!({ "customerId": customer_id, "amount": 2.5, "reason": "Late job", "type": "debit" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, customer) = send(&app, Method::GET, &format!("/api/customers/{}", customer_id), None).await;
    assert_eq!(customer["totalDeposits"], "50.00");
    assert_eq!(customer["balance"], "50.00");
    assert_eq!(customer["goodwill"], "-2.50");

    let (_, deposits) = send(&app, Method::GET, &format!("/api/customers/{}/deposits", customer_id), None).await;
    assert_eq!(deposits.as_array().unwrap().len(), 1);
    let (_, goodwill) = send(&app, Method::GET, &format!("/api/goodwill?customerId={}", customer_id), None).await;
    assert_eq!(goodwill[0]["type"], "debit");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/deposits",
        Some(json!({ "customerId": uuid::Uuid::new_v4(), "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/deposits",
        Some(json!({ "customerId": customer_id, "amount": -5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["amount"]);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/customers/{}", customer_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, renamed) = send(
        &app,
        Method::PUT,
        &format!("/api/customers/{}", customer_id),
        Some(json!({ "company": "Ada Ltd" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Ada Print Co");
    assert_eq!(renamed["company"], "Ada Ltd");
}

#[tokio::test]
async fn test_sale_total_is_computed() {
    let app = test_app().await;
    let (status, sale) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "paperType": "Letter",
            "paperVariant": "80gsm",
            "quantity": 20,
            "unitPrice": "0.45",
            "total": "1000.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["total"], "9.00");
    assert!(sale["saleNumber"].as_str().unwrap().starts_with("SALE-"));
}

#[tokio::test]
async fn test_weekly_report_nets_income_and_expenses() {
    let app = test_app().await;
    send(&app, Method::POST, "/api/orders", Some(printing_job())).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({ "category": "Supplies", "description": "Ink", "amount": "25.00", "paymentMethod": "cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let today = Utc::now().date_naive();
    let uri = format!(
        "/api/reports/weekly?startDate={}&endDate={}",
        today - Duration::days(3),
        today + Duration::days(3)
    );
    let (status, report) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["totalIncome"], "7.15");
    assert_eq!(report["orderIncome"], "7.15");
    assert_eq!(report["salesIncome"], "0.00");
    assert_eq!(report["totalExpenses"], "25.00");
    assert_eq!(report["netIncome"], "-17.85");
    assert_eq!(report["orderCount"], 1);
    assert_eq!(report["expenseCount"], 1);
}

#[tokio::test]
async fn test_report_parameter_errors() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/reports/weekly?startDate=2024-03-07", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["endDate"]);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/reports/weekly?startDate=2024-03-07&endDate=2024-03-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/reports/monthly?year=2024&month=13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["month"]);

    let (status, report) = send(&app, Method::GET, "/api/reports/monthly?year=2024&month=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["startDate"], "2024-02-01");
    assert_eq!(report["endDate"], "2024-02-29");
    assert_eq!(report["netIncome"], "0.00");
}

#[tokio::test]
async fn test_pdf_failure_is_a_generic_server_error() {
    let app = test_app().await;
    let (_, order) = send(&app, Method::POST, "/api/orders", Some(printing_job())).await;
    let order_id = order["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/receipts/{}/pdf", order_id), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_receipt_pdf_downloads() {
    let app = pdf_app().await;
    let (_, order) = send(&app, Method::POST, "/api/orders", Some(printing_job())).await;
    let order_id = order["id"].as_str().unwrap();
    let (_, receipt) = send(&app, Method::GET, &format!("/api/receipts/{}", order_id), None).await;

    let (status, content_type, disposition, bytes) =
        download(&app, &format!("/api/receipts/{}/pdf", order_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/pdf");
    assert_eq!(
        disposition,
        format!("attachment; filename=Receipt-{}.pdf", receipt["receiptNumber"].as_str().unwrap())
    );
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_report_pdfs_download() {
    let app = pdf_app().await;
    send(&app, Method::POST, "/api/orders", Some(printing_job())).await;

    let (status, content_type, disposition, bytes) =
        download(&app, "/api/reports/pdf/monthly?year=2024&month=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/pdf");
    assert_eq!(disposition, "attachment; filename=monthly-report-2024-2.pdf");
    assert!(bytes.starts_with(b"%PDF"));

    let today = Utc::now().date_naive();
    let uri = format!(
        "/api/reports/pdf/weekly?startDate={}&endDate={}",
        today - Duration::days(6),
        today
    );
    let (status, _, disposition, bytes) = download(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(disposition, "attachment; filename=weekly-report.pdf");
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_oversized_amounts_are_rejected() {
    let app = test_app().await;
    let huge = "79228162514264337593543950335";

    let banner = |width: &str, height: &str, quantity: i32| {
        json!({
            "serviceType": "largeformat",
            "serviceName": "Flex Banner",
            "quantity": quantity,
            "customWidth": width,
            "customHeight": height
        })
    };

    for uri in ["/api/orders", "/api/orders/quote"] {
        let (status, body) = send(&app, Method::POST, uri, Some(banner(huge, "2", 1))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(field_names(&body), vec!["customWidth"]);
        assert_eq!(body["fields"][0]["code"], "out_of_range");
    }

    // Each dimension fits its column but the priced total does not.
    let (status, body) = send(&app, Method::POST, "/api/orders", Some(banner("99999999", "99999999", 1000))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["total"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({ "paperType": "A4", "paperVariant": "80gsm", "quantity": 3, "unitPrice": huge })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["unitPrice"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({ "paperType": "A4", "paperVariant": "80gsm", "quantity": 3, "unitPrice": "99999999.99" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["total"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/price-lists",
        Some(json!({ "serviceName": "Gold Leaf", "category": "finishing", "basePrice": huge, "unit": "job" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["basePrice"]);

    let (_, orders) = send(&app, Method::GET, "/api/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());
    let (_, sales) = send(&app, Method::GET, "/api/sales", None).await;
    assert!(sales.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_money_is_held_to_two_places() {
    let app = test_app().await;

    let zine = |price: &str| {
        json!({ "serviceName": "Zine", "category": "products", "basePrice": price, "unit": "piece" })
    };
    let (status, body) = send(&app, Method::POST, "/api/price-lists", Some(zine("0.125"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["basePrice"]);
    assert_eq!(body["fields"][0]["code"], "too_precise");

    let (status, _) = send(&app, Method::POST, "/api/price-lists", Some(zine("0.13"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, quote) = send(
        &app,
        Method::POST,
        "/api/orders/quote",
        Some(json!({ "serviceType": "products", "serviceName": "Zine", "quantity": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["breakdown"][0]["unitPrice"], "0.13");
    assert_eq!(quote["breakdown"][0]["total"], "1.30");
    assert_eq!(quote["subtotal"], "1.30");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/deposits",
        Some(json!({ "customerId": uuid::Uuid::new_v4(), "amount": "10.005" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_names(&body), vec!["amount"]);
}

#[tokio::test]
async fn test_malformed_ids_are_bad_requests() {
    let app = test_app().await;

    for uri in [
        "/api/orders/abc",
        "/api/receipts/abc",
        "/api/receipts/abc/pdf",
        "/api/price-lists/abc",
        "/api/customers/abc",
        "/api/customers/abc/deposits",
        "/api/customers/abc/goodwill",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
        assert_eq!(body["fields"], json!([]), "{}", uri);
    }

    let (status, _) = send(&app, Method::DELETE, "/api/customers/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
