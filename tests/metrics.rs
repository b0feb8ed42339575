// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use conversation_journey::api::{self, AppState};
use conversation_journey::metrics::Metrics;
use conversation_journey::JourneyAnalyzer;

// One recorder per process, so everything lives in a single test.
#[tokio::test]
async fn metrics_endpoint_contains_expected_series() {
    let metrics = Metrics::init().expect("install recorder");
    let app = api::router(AppState::new(JourneyAnalyzer::default(), 10)).merge(metrics.router());

    for payload in [
        r#"{"text":"Agent: Hello there. Customer: The fix worked, thanks!"}"#,
        r#"{}"#,
    ] {
        let req = Request::post("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(payload))
            .unwrap();
        app.clone().oneshot(req).await.unwrap();
    }

    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "journey_analyses_total",
        "journey_errors_total{kind=\"missing_input\"}",
        "journey_utterances",
    ] {
        assert!(text.contains(needle), "missing series {needle}:\n{text}");
    }

    // a second recorder cannot be installed
    assert!(Metrics::init().is_err());
}
