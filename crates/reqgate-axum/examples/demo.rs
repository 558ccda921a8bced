//! Demo server: three validated routes behind one gate.
//!
//! Run with `cargo run -p reqgate-axum --example demo`, then:
//!
//! ```text
//! curl -X POST localhost:8080/users -H 'content-type: application/json' -d '{}'
//! curl 'localhost:8080/search?page=0'
//! curl 'localhost:8080/users/abc'
//! ```

use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use reqgate_axum::{body_reader_middleware, validate_middleware};
use reqgate_core::{Gate, RuleSet};
use reqgate_schema::JsonSchemaChecker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Register every route's declaration before the server accepts traffic.
    let gate = Gate::new(Arc::new(JsonSchemaChecker::new()));

    let create_user = gate.register(RuleSet::new().body(json!({
        "type": "object",
        "properties": {
            "username": {"type": "string", "minLength": 4, "maxLength": 10},
            "password": {"type": "string", "minLength": 3, "maxLength": 15}
        },
        "required": ["username"]
    })))?;

    let search = gate.register(RuleSet::new().query(json!({
        "type": "object",
        "properties": {
            "q": {"type": "string", "minLength": 1},
            "page": {"type": "integer", "minimum": 1}
        },
        "required": ["q"]
    })))?;

    let show_user = gate.register(RuleSet::new().params(json!({
        "type": "object",
        "properties": {"id": {"type": "integer", "minimum": 1}},
        "required": ["id"]
    })))?;

    let app = Router::new()
        .merge(
            Router::new()
                .route("/users", post(create_user_handler))
                .route_layer(from_fn_with_state(create_user, validate_middleware))
                .route_layer(from_fn(body_reader_middleware)),
        )
        .merge(
            Router::new()
                .route("/search", get(search_handler))
                .route_layer(from_fn_with_state(search, validate_middleware)),
        )
        .merge(
            Router::new()
                .route("/users/{id}", get(show_user_handler))
                .route_layer(from_fn_with_state(show_user, validate_middleware)),
        )
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("reqgate demo listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn create_user_handler(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    Json(json!({"status": "created", "username": body["username"]}))
}

async fn search_handler() -> Json<serde_json::Value> {
    Json(json!({"results": []}))
}

async fn show_user_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}
