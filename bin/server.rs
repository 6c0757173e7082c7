// Pantry Keeper - Web Server
// REST API over the lifecycle store and the receipt parser

use anyhow::{anyhow, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use pantry_keeper::{
    FreshnessStatus, IngestionResult, ItemUpdate, NewItem, OcrEngine, OcrText, PantryItem,
    PantryStore, ReceiptPipeline, RefreshScheduler, DEFAULT_REFRESH_PERIOD, MAX_RAW_TEXT_LEN,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<PantryStore>>,
    pipeline: Arc<ReceiptPipeline>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(data: T, message: &str) -> Self {
        Self {
            success: false,
            data,
            error: Some(message.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct QuantityDelta {
    delta: i64,
}

#[derive(Deserialize)]
struct StatusChange {
    status: FreshnessStatus,
}

#[derive(Deserialize)]
struct ParseRequest {
    text: String,
}

/// OCR stays an external capability; this server only parses supplied text.
struct UnavailableOcr;

impl OcrEngine for UnavailableOcr {
    fn image_to_text(&self, _image: &[u8], _model: &str) -> Result<OcrText> {
        Err(anyhow!("no OCR capability configured"))
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/items - All pantry items
async fn list_items(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();
    Json(ApiResponse::ok(store.items().to_vec()))
}

/// GET /api/items/expiring - Items inside their expiring window
async fn list_expiring(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();
    let items: Vec<PantryItem> = store.expiring_items().into_iter().cloned().collect();
    Json(ApiResponse::ok(items))
}

/// POST /api/items - Add an item (expiry derived when omitted)
async fn add_item(
    State(state): State<AppState>,
    Json(new_item): Json<NewItem>,
) -> impl IntoResponse {
    let mut store = state.store.lock().unwrap();
    let id = store.add_item(new_item);
    let item = store.get(&id).cloned();
    (StatusCode::CREATED, Json(ApiResponse::ok(item)))
}

/// POST /api/items/:id - Partial edit
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ItemUpdate>,
) -> impl IntoResponse {
    let mut store = state.store.lock().unwrap();

    if store.update_item(&id, update) {
        (StatusCode::OK, Json(ApiResponse::ok(store.get(&id).cloned()))).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(None::<PantryItem>, "item not found")),
        )
            .into_response()
    }
}

/// DELETE /api/items/:id - Hard delete
async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut store = state.store.lock().unwrap();

    if store.remove_item(&id) {
        (StatusCode::OK, Json(ApiResponse::ok(id))).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(id, "item not found")),
        )
            .into_response()
    }
}

/// POST /api/items/:id/quantity - Apply a quantity delta (floors at zero)
async fn change_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<QuantityDelta>,
) -> impl IntoResponse {
    let mut store = state.store.lock().unwrap();

    if store.update_quantity(&id, body.delta) {
        (StatusCode::OK, Json(ApiResponse::ok(store.get(&id).cloned()))).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(None::<PantryItem>, "item not found")),
        )
            .into_response()
    }
}

/// POST /api/items/:id/status - Manual status override
async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusChange>,
) -> impl IntoResponse {
    let mut store = state.store.lock().unwrap();

    if store.set_status(&id, body.status) {
        (StatusCode::OK, Json(ApiResponse::ok(store.get(&id).cloned()))).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(None::<PantryItem>, "item not found")),
        )
            .into_response()
    }
}

/// POST /api/receipts/parse - Parse raw OCR text into a structured receipt
async fn parse_receipt(
    State(state): State<AppState>,
    Json(body): Json<ParseRequest>,
) -> impl IntoResponse {
    let receipt = state.pipeline.parse_text(&body.text);

    let result = IngestionResult {
        success: true,
        data: Some(receipt),
        raw_text: (!body.text.is_empty())
            .then(|| body.text.chars().take(MAX_RAW_TEXT_LEN).collect()),
        error: None,
        note: None,
    };

    Json(result)
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Pantry Keeper - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = Arc::new(Mutex::new(PantryStore::new()));
    println!("✓ Lifecycle store initialized (in-memory)");

    // Background recompute: minute ticks plus a midnight-aligned pass
    let _scheduler = RefreshScheduler::spawn(Arc::clone(&store), DEFAULT_REFRESH_PERIOD);
    println!("✓ Status refresh scheduler running");

    let state = AppState {
        store,
        pipeline: Arc::new(ReceiptPipeline::new(Arc::new(UnavailableOcr))),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/items", get(list_items).post(add_item))
        .route("/items/expiring", get(list_expiring))
        .route("/items/:id", post(update_item).delete(remove_item))
        .route("/items/:id/quantity", post(change_quantity))
        .route("/items/:id/status", post(change_status))
        .route("/receipts/parse", post(parse_receipt))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   Items:    http://localhost:3000/api/items");
    println!("   Expiring: http://localhost:3000/api/items/expiring");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
