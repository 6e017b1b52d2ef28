//! HTTP endpoints served from a live listener.

use std::net::SocketAddr;

use dual_env::api::{create_router, AppState};
use dual_env::cascade::{EffectiveEnvironment, EnvCascadeLoader};
use dual_env::service::{ServiceLayout, ServiceName};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

use crate::write_file;

/// Load `root` for `service` and serve it on an ephemeral port.
async fn spawn_service(root: &TempDir, service: ServiceName) -> SocketAddr {
    let layout = ServiceLayout::new(root.path(), service).unwrap();
    let inherited: EffectiveEnvironment = [("NODE_ENV", "test")].into_iter().collect();
    let (env, provenance) = EnvCascadeLoader::new()
        .load(&layout.sources(), inherited)
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(service, addr.port(), env, provenance);

    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn health_reports_service_and_port() {
    let root = TempDir::new().unwrap();
    let addr = spawn_service(&root, ServiceName::Worker).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "worker");
    assert_eq!(body["port"], addr.port());
}

#[tokio::test]
async fn root_reports_resolved_environment() {
    let root = TempDir::new().unwrap();
    write_file(
        root.path(),
        ".env.base",
        "DATABASE_URL=postgres://base\nLOG_LEVEL=info\n",
    );
    write_file(
        root.path(),
        "apps/api/.env",
        "DATABASE_URL=postgres://override\n",
    );
    let addr = spawn_service(&root, ServiceName::Api).await;

    let body: Value = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["service"], "api");
    assert_eq!(body["environment"]["DATABASE_URL"], "postgres://override");
    assert_eq!(body["environment"]["LOG_LEVEL"], "info");
    assert_eq!(body["environment"]["NODE_ENV"], "test");
    assert!(body["environment"]["REDIS_URL"].is_null());

    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(
        sources[0]["variables"],
        serde_json::json!(["DATABASE_URL", "LOG_LEVEL"])
    );
    assert_eq!(sources[1]["variables"], serde_json::json!(["DATABASE_URL"]));
}
