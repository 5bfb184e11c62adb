//! API integration tests against a running gateway + server pair

use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";
const USER_HEADER: &str = "X-Sharer-User-Id";

/// Register a user with an email unique to this run
async fn create_user(client: &Client, name: &str) -> i64 {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let email = format!("{}.{}@example.com", name, stamp);
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": name, "email": email }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

async fn create_item(client: &Client, owner: i64, name: &str) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_HEADER, owner.to_string())
        .json(&json!({
            "name": name,
            "description": format!("{} for weekend projects", name),
            "available": true
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ownerId"], owner);
    body["id"].as_i64().expect("No id in response")
}

async fn book(client: &Client, booker: i64, item: i64, days: (i64, i64)) -> reqwest::Response {
    let now = Utc::now();
    client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, booker.to_string())
        .json(&json!({
            "itemId": item,
            "start": now + Duration::days(days.0),
            "end": now + Duration::days(days.1)
        }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let stranger = create_user(&client, "stranger").await;
    let item = create_item(&client, owner, "Drill").await;

    let response = book(&client, booker, item, (1, 3)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let booking: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(booking["status"], "WAITING");
    let booking_id = booking["id"].as_i64().expect("No id in response");

    // Owners cannot book their own items
    let response = book(&client, owner, item, (1, 3)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header(USER_HEADER, owner.to_string())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let approved: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(approved["status"], "APPROVED");

    // A decided booking stays decided
    let response = client
        .patch(format!("{}/bookings/{}?approved=false", BASE_URL, booking_id))
        .header(USER_HEADER, owner.to_string())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Overlapping ranges are not checked
    let response = book(&client, booker, item, (2, 4)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header(USER_HEADER, stranger.to_string())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{}/bookings/owner?state=future", BASE_URL))
        .header(USER_HEADER, owner.to_string())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(listed.as_array().map(|a| a.len()), Some(2));

    let response = client
        .get(format!("{}/items/{}", BASE_URL, item))
        .header(USER_HEADER, owner.to_string())
        .send()
        .await
        .expect("Failed to send request");
    let details: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(details["nextBooking"]["id"], booking_id);
    assert!(details["lastBooking"].is_null());

    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header(USER_HEADER, stranger.to_string())
        .json(&json!({ "text": "Great drill" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_gateway_rejections() {
    let client = Client::new();
    let booker = create_user(&client, "early").await;

    let response = book(&client, booker, 1, (-2, 1)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/bookings?state=UNSUPPORTED", BASE_URL))
        .header(USER_HEADER, booker.to_string())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Unknown state: UNSUPPORTED");

    let response = client
        .get(format!("{}/items", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_item_requests() {
    let client = Client::new();
    let asker = create_user(&client, "asker").await;
    let lender = create_user(&client, "lender").await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header(USER_HEADER, asker.to_string())
        .json(&json!({ "description": "Looking for a tall ladder" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let request: Value = response.json().await.expect("Failed to parse response");
    let request_id = request["id"].as_i64().expect("No id in response");

    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_HEADER, lender.to_string())
        .json(&json!({
            "name": "Ladder",
            "description": "Three meters",
            "available": true,
            "requestId": request_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/requests", BASE_URL))
        .header(USER_HEADER, asker.to_string())
        .send()
        .await
        .expect("Failed to send request");
    let own: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(own[0]["id"], request_id);
    assert_eq!(own[0]["items"][0]["name"], "Ladder");

    // Any user may read any request
    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header(USER_HEADER, lender.to_string())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}
