// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod config;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use odotrack::{Clock, Connectivity, IdGenerator, SystemClock, UuidIdGenerator};
use odotrack_api::{
    ApiError, ConnectivityMonitor, ConnectivityStatus, ListSubmissionsRequest,
    ListSubmissionsResponse, LookupVehicleRequest, SubmissionDetailResponse, SubmissionInfo,
    SubmitReadingRequest, SubmitReadingResponse, SyncReconciler, SyncReport, VehicleInfo,
    get_submission, list_submissions, lookup_vehicle, submit_reading,
};
use odotrack_domain::FleetRegistry;
use odotrack_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::{ServerError, load_fleet, utc_offset};

/// Odotrack Server - HTTP server for driver odometer submissions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to a TOML fleet file. If not provided, uses the built-in fleet.
    #[arg(short, long)]
    fleet: Option<PathBuf>,

    /// Offset of the drivers' local time from UTC, in hours
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_hours: i8,

    /// Start with connectivity reported as offline
    #[arg(long)]
    start_offline: bool,
}

/// Application state shared across handlers.
///
/// The store is wrapped in a Mutex; handlers and the sync reconciler take
/// turns on the single connection.
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<Persistence>>,
    registry: Arc<FleetRegistry>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    connectivity: Arc<ConnectivityMonitor>,
    reconciler: Arc<SyncReconciler<Persistence>>,
}

impl AppState {
    fn new(
        persistence: Persistence,
        registry: FleetRegistry,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        online: bool,
    ) -> Self {
        let store: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(persistence));
        let reconciler: SyncReconciler<Persistence> =
            SyncReconciler::new(Arc::clone(&store), Arc::clone(&clock), Arc::clone(&ids));
        Self {
            store,
            registry: Arc::new(registry),
            clock,
            ids,
            connectivity: Arc::new(ConnectivityMonitor::new(online)),
            reconciler: Arc::new(reconciler),
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Stable machine-readable code.
    code: String,
    /// Error message.
    message: String,
    /// The submission that blocks a duplicate, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    existing: Option<SubmissionInfo>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    code: String,
    message: String,
    existing: Option<SubmissionInfo>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: self.code,
            message: self.message,
            existing: self.existing,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::VehicleNotFound { .. } | ApiError::SubmissionNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::Rejected { .. } | ApiError::DomainRuleViolation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::DuplicateRequiresConfirmation { .. } => StatusCode::CONFLICT,
            ApiError::Store { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let code: String = err.code().to_string();
        let message: String = err.to_string();
        let existing: Option<SubmissionInfo> = match err {
            ApiError::DuplicateRequiresConfirmation { existing } => Some(*existing),
            _ => None,
        };
        Self {
            status,
            code,
            message,
            existing,
        }
    }
}

/// Handler for GET `/api/vehicles` endpoint.
async fn handle_lookup_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Query(req): Query<LookupVehicleRequest>,
) -> Result<Json<VehicleInfo>, HttpError> {
    let mut store = app_state.store.lock().await;
    let vehicle: VehicleInfo = lookup_vehicle(&mut *store, app_state.registry.as_ref(), &req)?;
    drop(store);
    Ok(Json(vehicle))
}

/// Handler for GET `/api/odometer-submissions` endpoint.
async fn handle_list_submissions(
    AxumState(app_state): AxumState<AppState>,
    Query(req): Query<ListSubmissionsRequest>,
) -> Result<Json<ListSubmissionsResponse>, HttpError> {
    let mut store = app_state.store.lock().await;
    let response: ListSubmissionsResponse = list_submissions(&mut *store, &req)?;
    drop(store);
    Ok(Json(response))
}

/// Handler for GET `/api/odometer-submissions/{id}` endpoint.
async fn handle_get_submission(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionDetailResponse>, HttpError> {
    let mut store = app_state.store.lock().await;
    let response: SubmissionDetailResponse = get_submission(&mut *store, &id)?;
    drop(store);
    Ok(Json(response))
}

/// Handler for POST `/api/odometer-submissions` endpoint.
///
/// Validates and stores a reading. Offline submissions go to the pending
/// queue.
async fn handle_submit_reading(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SubmitReadingRequest>,
) -> Result<(StatusCode, Json<SubmitReadingResponse>), HttpError> {
    info!(
        driver_id = %req.driver_id,
        plate = ?req.plate,
        "Handling submit_reading request"
    );

    let connectivity: Connectivity = app_state.connectivity.connectivity();
    let mut store = app_state.store.lock().await;
    let response: SubmitReadingResponse = submit_reading(
        &mut *store,
        app_state.registry.as_ref(),
        app_state.clock.as_ref(),
        app_state.ids.as_ref(),
        connectivity,
        req,
    )?;
    drop(store);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/api/connectivity` endpoint.
async fn handle_get_connectivity(
    AxumState(app_state): AxumState<AppState>,
) -> Json<ConnectivityStatus> {
    Json(ConnectivityStatus {
        online: app_state.connectivity.is_online(),
    })
}

/// Handler for PUT `/api/connectivity` endpoint.
///
/// Going online starts an automatic sync through the monitor's task.
async fn handle_set_connectivity(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ConnectivityStatus>,
) -> Json<ConnectivityStatus> {
    app_state.connectivity.set_online(req.online);
    Json(ConnectivityStatus {
        online: app_state.connectivity.is_online(),
    })
}

/// Handler for POST `/api/sync` endpoint.
async fn handle_sync(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<SyncReport>, HttpError> {
    let connectivity: Arc<ConnectivityMonitor> = Arc::clone(&app_state.connectivity);
    let report: SyncReport = app_state
        .reconciler
        .reconcile(move || connectivity.is_online())
        .await?;
    info!(synced = report.synced, skipped = ?report.skipped, "Manual sync finished");
    Ok(Json(report))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/vehicles", get(handle_lookup_vehicle))
        .route(
            "/api/odometer-submissions",
            get(handle_list_submissions).post(handle_submit_reading),
        )
        .route("/api/odometer-submissions/{id}", get(handle_get_submission))
        .route(
            "/api/connectivity",
            get(handle_get_connectivity).put(handle_set_connectivity),
        )
        .route("/api/sync", post(handle_sync))
        .with_state(app_state)
}

fn open_persistence(database: Option<&str>) -> Result<Persistence, ServerError> {
    let persistence: Persistence = if let Some(db_path) = database {
        info!("Using file-based database at: {db_path}");
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Odotrack Server");

    let registry: FleetRegistry = load_fleet(args.fleet.as_deref())?;
    let clock: SystemClock = SystemClock::new(utc_offset(args.utc_offset_hours)?);
    let persistence: Persistence = open_persistence(args.database.as_deref())?;

    let app_state: AppState = AppState::new(
        persistence,
        registry,
        Arc::new(clock),
        Arc::new(UuidIdGenerator),
        !args.start_offline,
    );

    // Submissions left pending by a previous run are synced once at startup
    if app_state.connectivity.is_online() {
        match app_state.reconciler.reconcile(|| true).await {
            Ok(report) => info!(synced = report.synced, "Startup sync finished"),
            Err(e) => warn!(error = %e, "Startup sync failed"),
        }
    }
    let _auto_sync = app_state
        .connectivity
        .spawn_auto_sync(Arc::clone(&app_state.reconciler));

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
