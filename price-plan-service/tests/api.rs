use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use price_plan_service::{
    config::{AppConfig, PricePlanConfig},
    router, AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const METER: &str = "smart-meter-0";

fn plan(name: &str, plan_type: &str) -> PricePlanConfig {
    PricePlanConfig {
        plan_name: name.to_string(),
        energy_supplier: format!("{name} supplier"),
        unit_rate: "100".to_string(),
        plan_type: plan_type.to_string(),
    }
}

fn app() -> Router {
    let mut cfg = AppConfig::default();
    cfg.seed = None;
    cfg.price_plans = vec![
        plan("JOI", "Standard"),
        plan("JOI_ECO", "Eco"),
        plan("JOI_RIPOFF", "Premium"),
    ];
    cfg.accounts = [(METER.to_string(), "JOI".to_string())].into_iter().collect();

    let state = AppState::from_config(&cfg).expect("valid config");
    router(state, cfg.server.max_body_bytes)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn store(body: Value) -> Request<Body> {
    Request::post("/readings/store")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn store_reference_readings(app: &Router) {
    let (status, _) = send(
        app,
        store(json!({
            "smartMeterId": METER,
            "electricityReadings": [
                {"time": "2024-05-01T08:00:00Z", "reading": 15.0},
                {"time": "2024-05-01T10:00:00Z", "reading": 5.0}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

fn as_number(v: &Value) -> f64 {
    v.as_str().expect("decimal encoded as string").parse().unwrap()
}

#[tokio::test]
async fn stores_and_reads_back_readings() {
    let app = app();
    store_reference_readings(&app).await;

    let (status, body) = send(&app, get(&format!("/readings/read/{METER}"))).await;
    assert_eq!(status, StatusCode::OK);

    let readings = body.as_array().unwrap();
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0]["time"], "2024-05-01T08:00:00Z");
    assert_eq!(as_number(&readings[0]["reading"]), 15.0);
}

#[tokio::test]
async fn reading_unknown_meter_is_not_found() {
    let (status, _) = send(&app(), get("/readings/read/UNKNOWN")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_rejects_missing_meter_id_and_empty_readings() {
    let app = app();

    let (status, body) = send(&app, store(json!({"electricityReadings": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_readings");

    let empty = json!({"smartMeterId": METER, "electricityReadings": []});
    let (status, _) = send(&app, store(empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, store(json!({"smartMeterId": METER}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn compares_all_plans() {
    let app = app();
    store_reference_readings(&app).await;

    let (status, body) = send(&app, get(&format!("/price-plans/compare-all/{METER}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pricePlanId"], "JOI");

    let costs = &body["pricePlanComparisons"];
    assert_eq!(costs.as_object().unwrap().len(), 3);
    assert_eq!(as_number(&costs["JOI"]), 2000.0);
    assert_eq!(as_number(&costs["JOI_ECO"]), 1000.0);
    assert_eq!(as_number(&costs["JOI_RIPOFF"]), 4000.0);
}

#[tokio::test]
async fn compare_for_meter_without_readings_is_no_consumption() {
    let (status, body) = send(&app(), get("/price-plans/compare-all/not-found")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "no_consumption");
}

#[tokio::test]
async fn recommends_cheapest_plans_with_limit() {
    let app = app();
    store_reference_readings(&app).await;

    let (status, body) = send(&app, get(&format!("/price-plans/recommend/{METER}?limit=2"))).await;
    assert_eq!(status, StatusCode::OK);

    let ranked = body.as_array().unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(as_number(&ranked[0]["JOI_ECO"]), 1000.0);
    assert_eq!(as_number(&ranked[1]["JOI"]), 2000.0);
}

#[tokio::test]
async fn recommends_all_plans_without_limit() {
    let app = app();
    store_reference_readings(&app).await;

    for uri in [
        format!("/price-plans/recommend/{METER}"),
        format!("/price-plans/recommend/{METER}?limit=5"),
    ] {
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);

        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry.as_object().unwrap().keys().next().unwrap().as_str())
            .collect();
        assert_eq!(names, ["JOI_ECO", "JOI", "JOI_RIPOFF"]);
    }
}

#[tokio::test]
async fn recommend_limit_edge_cases() {
    let app = app();
    store_reference_readings(&app).await;

    let (status, body) = send(&app, get(&format!("/price-plans/recommend/{METER}?limit=0"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, get(&format!("/price-plans/recommend/{METER}?limit=-1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_limit");
}

#[tokio::test]
async fn storing_again_replaces_readings() {
    let app = app();
    store_reference_readings(&app).await;

    let (status, _) = send(
        &app,
        store(json!({
            "smartMeterId": METER,
            "electricityReadings": [{"time": "2024-05-01T08:00:00Z", "reading": "1.5"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get(&format!("/readings/read/{METER}"))).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // one reading: no elapsed time
    let (_, body) = send(&app, get(&format!("/price-plans/compare-all/{METER}"))).await;
    assert_eq!(as_number(&body["pricePlanComparisons"]["JOI"]), 0.0);
}

#[test]
fn unknown_plan_type_fails_startup() {
    let mut cfg = AppConfig::default();
    cfg.seed = None;
    cfg.price_plans.push(plan("mystery", "Nuclear"));
    assert!(AppState::from_config(&cfg).is_err());
}
