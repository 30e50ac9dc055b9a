//! Router tests, driven through `tower::ServiceExt::oneshot` without a
//! listening socket.

use std::sync::Arc;

use actions::mock::MockCatalog;
use actions::{AutomationAction, StaticCatalog};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use engine::{SimulatorConfig, WorkflowSimulator};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{router, AppState};

fn app() -> Router {
    router(AppState::default())
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn linear_workflow() -> Value {
    json!({
        "nodes": [
            { "id": "S", "type": "start", "title": "Start" },
            { "id": "T", "type": "task", "title": "Review", "assignee": "a@x.com" },
            { "id": "E", "type": "end", "title": "End", "message": "done", "summary": true }
        ],
        "edges": [
            { "source": "S", "target": "T" },
            { "source": "T", "target": "E" }
        ]
    })
}

#[tokio::test]
async fn lists_builtin_automations() {
    let (status, body) = send(app(), "GET", "/api/v1/automations", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "send_email");
    assert_eq!(body[0]["params"], json!(["to", "subject"]));
    assert_eq!(body[1]["label"], "Generate Document");
}

#[tokio::test]
async fn catalog_outage_is_service_unavailable() {
    let catalog = Arc::new(MockCatalog::unavailable("backend down"));
    let state = AppState::new(WorkflowSimulator::default(), catalog.clone());

    let (status, body) = send(router(state), "GET", "/api/v1/automations", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("backend down"));
    assert_eq!(catalog.call_count(), 1);
}

#[tokio::test]
async fn simulates_a_valid_workflow() {
    let (status, body) = send(app(), "POST", "/api/v1/simulate", Some(linear_workflow())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["errors"], json!([]));
    assert_eq!(body["steps"].as_array().unwrap().len(), 3);
    assert_eq!(body["steps"][1]["message"], "Executing Review (task)");
    assert_eq!(body["summary"]["totalSteps"], 3);
    assert_eq!(body["summary"]["workflowStatus"], "success");
}

#[tokio::test]
async fn cyclic_workflow_is_reported_not_rejected() {
    let workflow = json!({
        "nodes": [
            { "id": "S", "type": "start", "title": "Start" },
            { "id": "A", "type": "approval", "title": "Approve", "approverRole": "Manager" }
        ],
        "edges": [
            { "source": "S", "target": "A" },
            { "source": "A", "target": "S" }
        ]
    });

    let (status, body) = send(app(), "POST", "/api/v1/simulate", Some(workflow)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"], json!(["Cycle detected"]));
    assert_eq!(body["steps"], json!([]));
    assert!(body.get("summary").is_none());
}

#[tokio::test]
async fn inconsistent_snapshot_is_unprocessable() {
    let workflow = json!({
        "nodes": [ { "id": "S", "type": "start", "title": "Start" } ],
        "edges": [ { "source": "S", "target": "ghost" } ]
    });

    let (status, _) = send(app(), "POST", "/api/v1/simulate", Some(workflow)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn oversized_graph_is_payload_too_large() {
    let state = AppState::new(
        WorkflowSimulator::new(SimulatorConfig { max_nodes: 2 }),
        Arc::new(StaticCatalog::builtin()),
    );

    let (status, body) = send(router(state), "POST", "/api/v1/simulate", Some(linear_workflow())).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "graph has 3 nodes, limit is 2");
}

#[tokio::test]
async fn oversized_graph_is_rejected_by_validate() {
    let catalog = Arc::new(MockCatalog::returning(vec![]));
    let state = AppState::new(
        WorkflowSimulator::new(SimulatorConfig { max_nodes: 2 }),
        catalog.clone(),
    );

    let (status, body) = send(router(state), "POST", "/api/v1/validate", Some(linear_workflow())).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "graph has 3 nodes, limit is 2");
    assert_eq!(catalog.call_count(), 0);
}

#[tokio::test]
async fn fractional_threshold_simulates() {
    let workflow = json!({
        "nodes": [
            { "id": "S", "type": "start", "title": "Start" },
            { "id": "A", "type": "approval", "title": "Approve",
              "approverRole": "Manager", "autoApproveThreshold": 42.5 },
            { "id": "E", "type": "end", "title": "End", "message": "done" }
        ],
        "edges": [
            { "source": "S", "target": "A" },
            { "source": "A", "target": "E" }
        ]
    });

    let (status, body) = send(app(), "POST", "/api/v1/simulate", Some(workflow)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["steps"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn out_of_range_threshold_is_a_field_error() {
    let workflow = json!({
        "nodes": [
            { "id": "S", "type": "start", "title": "Start" },
            { "id": "A", "type": "approval", "title": "Approve",
              "approverRole": "Manager", "autoApproveThreshold": 300 },
            { "id": "E", "type": "end", "title": "End", "message": "done" }
        ],
        "edges": [
            { "source": "S", "target": "A" },
            { "source": "A", "target": "E" }
        ]
    });

    let (status, body) = send(app(), "POST", "/api/v1/validate", Some(workflow)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(
        body["fieldErrors"],
        json!([{
            "nodeId": "A",
            "field": "autoApproveThreshold",
            "message": "Auto-approve threshold must be between 0 and 100"
        }])
    );
}

#[tokio::test]
async fn validate_reports_violations_and_field_errors() {
    let catalog = Arc::new(MockCatalog::returning(vec![AutomationAction::new(
        "notify",
        "Notify",
        ["channel"],
    )]));
    let state = AppState::new(WorkflowSimulator::default(), catalog);
    let workflow = json!({
        "nodes": [
            { "id": "T", "type": "task", "title": "Review" },
            { "id": "N", "type": "automated", "title": "Ping", "actionId": "notify" }
        ],
        "edges": [ { "source": "T", "target": "N" } ]
    });

    let (status, body) = send(router(state), "POST", "/api/v1/validate", Some(workflow)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["violations"], json!(["Missing start node"]));
    assert_eq!(
        body["fieldErrors"],
        json!([
            { "nodeId": "T", "field": "assignee", "message": "Assignee is required" },
            { "nodeId": "N", "field": "params.channel", "message": "Parameter 'channel' is required" }
        ])
    );
}
