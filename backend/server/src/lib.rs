//! Documentation of the CareSense symptom intake backend.
//!
//!
//!
//! # General Infrastructure
//! - Frontend posts age, gender, symptoms and the user id to this server
//! - Server asks the ML service (separate container) for a disease label
//! - The labelled record is appended to Redis, then the label is returned
//! - Dashboard history is read back per user from Redis
//!
//!
//!
//! # Endpoints
//!
//! Every route is served both bare and under `/api`.
//!
//! | Method | Path        | Body / Query                                   | Response                                   |
//! |--------|-------------|------------------------------------------------|--------------------------------------------|
//! | POST   | `/predict`  | `{age, gender, symptoms, userId}`              | `{message: "Prediction saved", disease}`   |
//! | GET    | `/predict`  | `?userId=...`                                  | list of records, oldest first              |
//! | GET    | `/symptoms` |                                                | symptom identifiers known to the model     |
//! | GET    | `/health`   |                                                | `{status: "ok"}`                           |
//!
//! Errors are `{message}` with 400 for bad input and 500 with a generic
//! `"Server error"` for predictor or store failures.
//!
//!
//!
//! # Notes
//!
//! ## Persist then respond
//! The label is only returned after the record is written. If Redis is down the
//! caller gets a 500 even though the ML service answered, so the dashboard never
//! shows a prediction that is missing from history.
//!
//! ## Duplicates
//! Submitting the same payload twice stores two records. There is no idempotency
//! key on the frontend to dedupe on yet.
//!
//!
//!
//! # Setup
//!
//! Environment variables, all optional.
//! ```sh
//! RUST_PORT=5000
//! STORE_BACKEND=redis            # or memory
//! REDIS_URL=redis://127.0.0.1:6379
//! PREDICTOR_URL=http://127.0.0.1:8000/predict
//! PREDICTOR_TIMEOUT_MS=5000
//! RUST_LOG=info
//! ```
//!
//! Run against an in-memory store.
//! ```sh
//! STORE_BACKEND=memory RUST_LOG=info cargo run -p caresense
//! ```
//!
//! Send a sample submission to a running server.
//! ```sh
//! cargo run -p tester -- --user-id u1
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod predictor;
pub mod routes;
pub mod service;
pub mod state;
pub mod utils;

use config::Config;
use routes::{health_handler, history_handler, predict_handler, symptoms_handler};
use state::State;

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let routes = Router::new()
        .route("/predict", get(history_handler).post(predict_handler))
        .route("/symptoms", get(symptoms_handler))
        .route("/health", get(health_handler));

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
