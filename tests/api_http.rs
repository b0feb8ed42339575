// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /analyze (success, missing or wrong-typed text, bad body)
// - POST /batch (order preserved, malformed items)
// - GET /history (filters, lookup by id, no raw text)

use serde_json::json;
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use conversation_journey::api::{self, AppState};
use conversation_journey::JourneyAnalyzer;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

fn test_state() -> AppState {
    AppState::new(JourneyAnalyzer::default(), 100)
}

fn test_router() -> Router {
    api::router(test_state())
}

fn post_json(uri: &str, payload: &Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST")
}

async fn read_json(resp: shuttle_axum::axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "OK");
}

#[tokio::test]
async fn api_analyze_returns_journey_record() {
    let app = test_router();
    let payload = json!({
        "text": "Agent: Thank you for calling. Customer: This is great, thank you so much!"
    });

    let resp = app
        .oneshot(post_json("/analyze", &payload))
        .await
        .expect("oneshot /analyze");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert!(v.get("error").is_none(), "unexpected error: {v}");
    assert!(v["sentiment"].as_str().unwrap().ends_with("positive"));
    let j = &v["emotional_journey"];
    for key in [
        "start",
        "end",
        "trend",
        "fluctuation",
        "stability",
        "dominant_emotion",
        "emotional_range",
    ] {
        assert!(j.get(key).is_some(), "journey missing '{key}'");
    }
    assert!(v["confidence"].as_f64().unwrap() > 50.0);
}

#[tokio::test]
async fn api_analyze_without_text_is_400_with_default_record() {
    let app = test_router();

    let resp = app
        .oneshot(post_json("/analyze", &json!({})))
        .await
        .expect("oneshot /analyze");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let v = read_json(resp).await;
    assert_eq!(v["error"], "No text provided or invalid input type");
    assert_eq!(v["sentiment"], "neutral");
    assert_eq!(v["score"], 0.0);
    assert_eq!(v["confidence"], 0.0);
    assert_eq!(v["emotional_journey"]["trend"]["direction"], "stable");
}

#[tokio::test]
async fn api_batch_keeps_input_order() {
    let app = test_router();
    let payload = json!([
        { "text": "Customer: This is terrible. I hate waiting." },
        { "text": "" },
        { "text": "Customer: Wonderful service, thank you!" }
    ]);

    let resp = app
        .oneshot(post_json("/batch", &payload))
        .await
        .expect("oneshot /batch");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 3);
    assert!(arr[0]["sentiment"].as_str().unwrap().ends_with("negative"));
    assert!(arr[1].get("error").is_some());
    assert!(arr[2]["sentiment"].as_str().unwrap().ends_with("positive"));
}

#[tokio::test]
async fn api_history_lists_fingerprints_only() {
    let state = test_state();
    let secret = "Customer: my card number is secret and I love this";

    api::router(state.clone())
        .oneshot(post_json("/analyze", &json!({ "text": secret })))
        .await
        .expect("oneshot /analyze");
    api::router(state.clone())
        .oneshot(post_json("/analyze", &json!({ "text": "   " })))
        .await
        .expect("oneshot /analyze");

    let req = Request::builder()
        .method("GET")
        .uri("/history?limit=10")
        .body(Body::empty())
        .expect("build GET /history");
    let resp = api::router(state.clone())
        .oneshot(req)
        .await
        .expect("oneshot /history");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["total"], 2);
    let rows = v["analyses"].as_array().expect("analyses");
    assert_eq!(rows.len(), 2);
    assert!(!v.to_string().contains("card number"), "raw text leaked into history");
    assert_eq!(rows[0]["transcript_id"].as_str().unwrap().len(), 12);
    assert!(rows[1].get("error").is_some());

    let req = Request::builder()
        .method("GET")
        .uri("/history?sentiment=neutral")
        .body(Body::empty())
        .expect("build GET /history");
    let v = read_json(api::router(state).oneshot(req).await.expect("oneshot")).await;
    let rows = v["analyses"].as_array().expect("analyses");
    assert!(rows.iter().all(|r| r["sentiment"] == "neutral"));
}

#[tokio::test]
async fn api_analyze_non_string_text_is_400_with_default_record() {
    for payload in [json!({ "text": 5 }), json!({ "text": ["a"] }), json!({ "text": null }), json!([1, 2])] {
        let resp = test_router()
            .oneshot(post_json("/analyze", &payload))
            .await
            .expect("oneshot /analyze");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {payload}");

        let v = read_json(resp).await;
        assert_eq!(v["error"], "No text provided or invalid input type", "payload {payload}");
        assert_eq!(v["sentiment"], "neutral");
        assert!(v.get("emotional_journey").is_some());
        assert_eq!(v["confidence"], 0.0);
    }
}

#[tokio::test]
async fn api_analyze_unparseable_body_is_400_with_default_record() {
    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("build POST");
    let resp = test_router().oneshot(req).await.expect("oneshot /analyze");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = read_json(resp).await;
    assert_eq!(v["error"], "No text provided or invalid input type");
    assert_eq!(v["score"], 0.0);
}

#[tokio::test]
async fn api_batch_maps_malformed_items_to_error_records() {
    let payload = json!([{ "text": 5 }, 7, { "text": "Customer: Wonderful service, thank you!" }]);
    let resp = test_router()
        .oneshot(post_json("/batch", &payload))
        .await
        .expect("oneshot /batch");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["error"], "No text provided or invalid input type");
    assert_eq!(arr[1]["error"], "No text provided or invalid input type");
    assert!(arr[2].get("error").is_none());

    // not an array at all
    let resp = test_router()
        .oneshot(post_json("/batch", &json!({ "text": "hi" })))
        .await
        .expect("oneshot /batch");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = read_json(resp).await;
    assert_eq!(v[0]["error"], "No text provided or invalid input type");
}

#[tokio::test]
async fn api_history_time_range_and_lookup_by_id() {
    let state = test_state();
    api::router(state.clone())
        .oneshot(post_json("/analyze", &json!({ "text": "Customer: thanks, great help" })))
        .await
        .expect("oneshot /analyze");

    let get = |uri: &str| {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("build GET")
    };

    let v = read_json(api::router(state.clone()).oneshot(get("/history?since=0")).await.unwrap()).await;
    assert_eq!(v["analyses"].as_array().unwrap().len(), 1);
    let id = v["analyses"][0]["transcript_id"].as_str().unwrap().to_string();

    let v = read_json(api::router(state.clone()).oneshot(get("/history?until=1")).await.unwrap()).await;
    assert!(v["analyses"].as_array().unwrap().is_empty());

    let resp = api::router(state.clone())
        .oneshot(get(&format!("/history/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = read_json(resp).await;
    assert_eq!(v.as_array().unwrap().len(), 1);

    let resp = api::router(state).oneshot(get("/history/000000000000")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
