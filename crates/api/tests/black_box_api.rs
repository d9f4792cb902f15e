use std::sync::Arc;
use std::time::Duration;

use dealership_infra::AppConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, seeded allocator, ephemeral port.
        let config = AppConfig {
            vin_seed: Some(7),
            lock_timeout: Duration::from_millis(500),
            ..AppConfig::default()
        };
        let services = Arc::new(dealership_api::app::services::build_services(&config));
        let app = dealership_api::app::build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn civic(vin: Option<u32>) -> Value {
    json!({
        "vin": vin,
        "year": 2018,
        "make": "Honda",
        "model": "Civic",
        "vehicle_type": "Sedan",
        "color": "Blue",
        "mileage": 30000,
        "price": 15000,
    })
}

async fn add(client: &reqwest::Client, server: &TestServer, body: &Value) -> reqwest::Response {
    client
        .post(server.url("/inventory"))
        .json(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn sell_moves_vehicle_from_lot_to_ledger() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = add(&client, &server, &civic(Some(123_456_789))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(server.url("/inventory/price?min=10000&max=20000"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Vec<Value> = res.json().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["vin"], 123_456_789);

    let res = client
        .post(server.url("/contracts/sales"))
        .json(&json!({
            "vin": 123_456_789,
            "customer_name": "Jane Doe",
            "customer_email": "jane@example.com",
            "financed": true,
            "fees": { "tax_amount": 750, "recording_fee": 100, "processing_fee": 295 },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let sale: Value = res.json().await.unwrap();
    assert_eq!(sale["customer"]["name"], "Jane Doe");
    assert_eq!(sale["vehicle"]["vin"], 123_456_789);
    assert_eq!(sale["financed"], true);

    let res = client
        .get(server.url("/inventory/vin/123456789"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let sales: Vec<Value> = client
        .get(server.url("/contracts/sales"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0]["id"], 1);
}

#[tokio::test]
async fn second_sale_of_same_vin_is_not_found() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    add(&client, &server, &civic(Some(222_222_222))).await;

    let sell = json!({
        "vin": 222_222_222,
        "customer_name": "Jane Doe",
        "customer_email": "jane@example.com",
    });
    let first = client
        .post(server.url("/contracts/sales"))
        .json(&sell)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(server.url("/contracts/leases"))
        .json(&sell)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    let leases: Vec<Value> = client
        .get(server.url("/contracts/leases"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(leases.is_empty());
}

#[tokio::test]
async fn duplicate_vin_conflicts() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    assert_eq!(
        add(&client, &server, &civic(Some(333_333_333))).await.status(),
        StatusCode::CREATED
    );
    let res = add(&client, &server, &civic(Some(333_333_333))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_vin");
}

#[tokio::test]
async fn sold_or_removed_vin_cannot_be_added_again() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    add(&client, &server, &civic(Some(444_444_444))).await;
    add(&client, &server, &civic(Some(555_555_555))).await;

    let sold = client
        .post(server.url("/contracts/sales"))
        .json(&json!({
            "vin": 444_444_444,
            "customer_name": "Jane Doe",
            "customer_email": "jane@example.com",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(sold.status(), StatusCode::CREATED);
    let removed = client
        .delete(server.url("/inventory/vin/555555555"))
        .send()
        .await
        .unwrap();
    assert_eq!(removed.status(), StatusCode::OK);

    for vin in [444_444_444, 555_555_555] {
        let res = add(&client, &server, &civic(Some(vin))).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "duplicate_vin");
    }
}

#[tokio::test]
async fn add_without_vin_allocates_one() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = add(&client, &server, &civic(None)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let vehicle: Value = res.json().await.unwrap();
    let vin = vehicle["vin"].as_u64().unwrap();
    assert!((100_000_000..=999_999_999).contains(&vin));
    assert_eq!(vehicle["sold"], false);
}

#[tokio::test]
async fn inverted_range_is_bad_request() {
    let server = TestServer::spawn().await;
    let res = reqwest::get(server.url("/inventory/year?min=2020&max=2010"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_range");
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Blank make.
    let mut blank = civic(None);
    blank["make"] = json!("  ");
    let res = add(&client, &server, &blank).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Supplied VIN with too few digits.
    let res = add(&client, &server, &civic(Some(12_345))).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Malformed VIN in the path.
    let res = client
        .get(server.url("/inventory/vin/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Body missing required fields.
    let res = add(&client, &server, &json!({ "make": "Honda" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn make_and_model_lookup_ignores_case() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    add(&client, &server, &civic(Some(444_444_444))).await;

    let found: Vec<Value> = client
        .get(server.url("/inventory/make/honda/model/CIVIC"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let found: Vec<Value> = client
        .get(server.url("/inventory/search?make=Honda&max_mileage=1000"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    add(&client, &server, &civic(Some(555_555_555))).await;

    let first = client
        .delete(server.url("/inventory/vin/555555555"))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = client
        .delete(server.url("/inventory/vin/555555555"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    let all: Vec<Value> = client
        .get(server.url("/inventory"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.is_empty());
}
