use crate::catalog::{self, MetricDefinition};
use crate::channel::{DOWNLOAD_FILE_NAME, SaveOutcome};
use crate::errors::AppError;
use crate::form;
use crate::models::{
    ChannelStatus, ConnectRequest, DashboardQuery, Entry, EntryForm, LatestQuery, StatusResponse,
    UploadQuery,
};
use crate::state::AppState;
use crate::ui::render_index;
use crate::view::DashboardView;
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use tracing::info;

pub const STATUS_HEADER: &str = "x-ascend-status";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(tracker.selection(), &tracker.channel_status()))
}

pub async fn get_metrics() -> Json<&'static [MetricDefinition]> {
    Json(catalog::all())
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.dashboard_for(query.metric.as_deref(), query.range)?))
}

/// Stores the chosen metric and range, then renders them.
pub async fn update_selection(
    State(state): State<AppState>,
    Json(payload): Json<DashboardQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.select(payload.metric, payload.range)?;
    Ok(Json(tracker.dashboard()?))
}

pub async fn list_entries(State(state): State<AppState>) -> Json<Vec<Entry>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.store().entries().to_vec())
}

pub async fn latest_entry(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<EntryForm>, AppError> {
    let tracker = state.tracker.lock().await;
    let copy = tracker
        .fill_from_latest(query.date.as_deref().filter(|date| !date.is_empty()))
        .ok_or_else(AppError::no_entries)?;
    Ok(Json(form::form_fill(&copy)))
}

pub async fn log_entry(
    State(state): State<AppState>,
    Json(payload): Json<EntryForm>,
) -> Result<Json<StatusResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let date = tracker
        .log_entry(&payload)
        .map_err(|err| AppError::action("Log", err))?;
    Ok(Json(StatusResponse::new(format!("Logged {date}"))))
}

pub async fn get_channel(State(state): State<AppState>) -> Json<ChannelStatus> {
    let tracker = state.tracker.lock().await;
    Json(tracker.channel_status())
}

pub async fn connect_channel(
    State(state): State<AppState>,
    Json(payload): Json<ConnectRequest>,
) -> Result<Json<ChannelStatus>, AppError> {
    let path = payload.path.trim();
    if path.is_empty() {
        return Err(AppError::bad_request("path must not be empty"));
    }
    let mut tracker = state.tracker.lock().await;
    Ok(Json(tracker.connect(path)))
}

pub async fn load(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let count = tracker
        .load()
        .await
        .map_err(|err| AppError::action("Load", err))?;
    Ok(Json(StatusResponse::new(format!("Loaded data ({count} entries)"))))
}

pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let name = query.name.unwrap_or_else(|| DOWNLOAD_FILE_NAME.to_string());
    let mut tracker = state.tracker.lock().await;
    let count = tracker
        .load_upload(&name, body.to_vec())
        .map_err(|err| AppError::action("Load", err))?;
    Ok(Json(StatusResponse::new(format!(
        "Loaded {name} ({count} entries)"
    ))))
}

pub async fn save(State(state): State<AppState>) -> Result<Response, AppError> {
    let tracker = state.tracker.lock().await;
    let outcome = tracker
        .save()
        .await
        .map_err(|err| AppError::action("Save", err))?;

    match outcome {
        SaveOutcome::Written { path } => {
            info!(path = %path.display(), "saved in place");
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(Json(StatusResponse::new(format!("Saved to {name}"))).into_response())
        }
        SaveOutcome::Download { file_name, bytes } => {
            info!(bytes = bytes.len(), "saved as download");
            let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
                .map_err(AppError::internal)?;
            let status = HeaderValue::from_str(&format!(
                "Downloaded updated {file_name} (replace your file)"
            ))
            .map_err(AppError::internal)?;
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
                    (header::CONTENT_DISPOSITION, disposition),
                    (header::HeaderName::from_static(STATUS_HEADER), status),
                ],
                bytes,
            )
                .into_response())
        }
    }
}
