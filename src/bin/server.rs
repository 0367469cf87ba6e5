use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use plank_planner::config::ServerConfig;
use plank_planner::history::History;
use plank_planner::logging;
use plank_planner::session::Session;
use plank_planner::stats::format_waste_rate;
use plank_planner::types::{Calculation, Measure};
use plank_planner::validate::{BoardInput, RequestInput};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<Session>>,
    history_path: Option<PathBuf>,
}

impl AppState {
    fn lock(&self) -> Result<MutexGuard<'_, Session>, (StatusCode, String)> {
        self.session.lock().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "session state is unavailable".to_string(),
            )
        })
    }
}

#[derive(Deserialize)]
struct PlanRequest {
    #[serde(flatten)]
    board: BoardInput,
    #[serde(default)]
    requests: Vec<RequestInput>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    #[serde(flatten)]
    calculation: Calculation,
    board_count: usize,
    piece_count: u32,
    waste_rate: String,
}

impl From<&Calculation> for PlanResponse {
    fn from(calc: &Calculation) -> Self {
        Self {
            calculation: calc.clone(),
            board_count: calc.board_count(),
            piece_count: calc.piece_count(),
            waste_rate: format_waste_rate(calc.waste_rate()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistorySummary {
    index: usize,
    date: String,
    board_length: Measure,
    board_width: Measure,
    total_boards: usize,
    total_pieces: u32,
}

async fn plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    tracing::info!(rows = req.requests.len(), "POST /plan");

    let mut session = state.lock()?;
    let response = session
        .submit(req.board, &req.requests)
        .map(PlanResponse::from)
        .map_err(|e| {
            tracing::info!(error = %e, "rejected plan request");
            (StatusCode::BAD_REQUEST, e.to_string())
        })?;

    if let Some(path) = &state.history_path
        && let Err(e) = session.history().save(path)
    {
        tracing::warn!(error = %e, "failed to persist history");
    }

    Ok(Json(response))
}

async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistorySummary>>, (StatusCode, String)> {
    let session = state.lock()?;
    let summaries = session
        .history()
        .entries()
        .iter()
        .enumerate()
        .map(|(index, e)| HistorySummary {
            index,
            date: e.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            board_length: e.calculation.board_length,
            board_width: e.calculation.board_width,
            total_boards: e.total_boards,
            total_pieces: e.total_pieces,
        })
        .collect();
    Ok(Json(summaries))
}

async fn replay_history(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    let mut session = state.lock()?;
    session
        .select_history(index)
        .map(|calc| Json(PlanResponse::from(calc)))
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("no saved calculation at index {index}"),
            )
        })
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/plan", post(plan))
        .route("/history", get(list_history))
        .route("/history/{index}", get(replay_history))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    if let Err(e) = logging::init_file(&config.log_file, Level::INFO) {
        eprintln!("Error: failed to open {}: {e}", config.log_file.display());
        std::process::exit(1);
    }

    let history = History::load(&config.history_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "starting with empty history");
        History::new()
    });

    let state = AppState {
        session: Arc::new(Mutex::new(Session::new(history))),
        history_path: Some(config.history_path.clone()),
    };

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to bind {addr}: {e}");
            std::process::exit(1);
        });
    eprintln!("Listening on {addr}");
    tracing::info!(%addr, "server started");
    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!(error = %e, "server stopped");
    }
}
