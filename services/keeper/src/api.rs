//! Administrative HTTP surface
//!
//! Thin proxies over the chain client plus a manual trigger for the
//! reconciliation loop. Every endpoint authenticates with the shared-secret
//! admin key carried in the request body; there is no other business logic
//! here.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::chain::TournamentChain;
use crate::error::KeeperError;
use crate::executors::{self, ExecOutcome};
use crate::reconciler::{pass_seed, PassSummary, Reconciler};

#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn TournamentChain>,
    pub reconciler: Arc<Reconciler>,
    pub admin_key: String,
}

impl AppState {
    fn require_admin(&self, presented: &str) -> Result<(), ApiError> {
        if presented == self.admin_key {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/submit-score", post(submit_score))
        .route("/api/finalize-tournament", post(finalize_tournament))
        .route("/api/manage-tournaments", post(manage_tournaments))
        .route("/api/simulate-tournament", post(simulate_tournament))
        .with_state(state)
}

/// Structured error responses for the admin surface
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    Rejected(String),
    Internal(String),
}

impl From<KeeperError> for ApiError {
    fn from(err: KeeperError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::FORBIDDEN, "Unauthorized".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Rejected(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                warn!(error = %msg, "admin request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TxResponse {
    success: bool,
    message: String,
    transaction_hash: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitScoreRequest {
    tournament_id: u64,
    player_address: String,
    score: u64,
    admin_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TournamentRequest {
    tournament_id: u64,
    admin_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminRequest {
    admin_key: String,
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Tournament keeper is running" }))
}

async fn submit_score(
    State(state): State<AppState>,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    state.require_admin(&req.admin_key)?;

    let player: Address = req
        .player_address
        .parse()
        .map_err(|_| ApiError::Rejected(format!("invalid player address: {}", req.player_address)))?;

    let tx = state
        .chain
        .submit_score(req.tournament_id, player, req.score)
        .await?;

    Ok(Json(TxResponse {
        success: true,
        message: "Score submitted successfully".into(),
        transaction_hash: format!("{tx:?}"),
    }))
}

async fn finalize_tournament(
    State(state): State<AppState>,
    Json(req): Json<TournamentRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    state.require_admin(&req.admin_key)?;

    let tx = state.chain.finalize_tournament(req.tournament_id).await?;

    Ok(Json(TxResponse {
        success: true,
        message: "Tournament finalized successfully".into(),
        transaction_hash: format!("{tx:?}"),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManageResponse {
    success: bool,
    summary: PassSummary,
}

/// Run one reconciliation pass on demand. Serialized with the scheduler's
/// own passes by the reconciler; a concurrent request queues, it does not
/// overlap.
async fn manage_tournaments(
    State(state): State<AppState>,
    Json(req): Json<AdminRequest>,
) -> Result<Json<ManageResponse>, ApiError> {
    state.require_admin(&req.admin_key)?;

    let summary = state.reconciler.run_once().await?;
    Ok(Json(ManageResponse {
        success: true,
        summary,
    }))
}

async fn simulate_tournament(
    State(state): State<AppState>,
    Json(req): Json<TournamentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.require_admin(&req.admin_key)?;

    let snapshot = state.chain.fetch_tournament(req.tournament_id).await?;
    if snapshot.id == 0 {
        return Err(ApiError::NotFound("Tournament not found".into()));
    }

    let outcome =
        executors::simulate_gameplay(state.chain.as_ref(), &snapshot, pass_seed()).await?;

    match outcome {
        ExecOutcome::Applied => Ok(Json(json!({
            "success": true,
            "message": format!("Successfully simulated scores for tournament #{}", req.tournament_id),
        }))),
        ExecOutcome::Skipped(reason) => Err(ApiError::Rejected(format!(
            "Could not simulate scores: {reason}"
        ))),
    }
}
