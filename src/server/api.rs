//! JSON and text handlers for the schedule API.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;
use crate::render::{date_in_week, render_group_day, render_teacher_week};
use crate::schedule::{
    Day, LoadOutcome, MergedLessonEntry, NormalizedRow, ScheduleSnapshot, ScheduleStats,
    ScheduleStore,
};
use crate::server::routes::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
const MAX_UPLOADS_PER_SECOND: u32 = 1000;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid or missing x-admin-token")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ScheduleStats,
    pub source_path: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TeacherDay {
    pub day: Day,
    pub name: &'static str,
    /// `dd.mm.yyyy` of this weekday in the current week.
    pub date: String,
    pub lessons: Vec<MergedLessonEntry>,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub stats: ScheduleStats,
    pub source_path: String,
}

fn read_snapshot<T>(state: &AppState, query: impl FnOnce(&ScheduleSnapshot) -> T) -> T {
    match state.store.current() {
        Some(loaded) => query(&loaded.snapshot),
        None => query(&ScheduleSnapshot::default()),
    }
}

fn parse_day(token: &str) -> Result<Day, ApiError> {
    token.parse::<Day>().map_err(ApiError::BadRequest)
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        loaded: state.store.current().is_some(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let response = match state.store.current() {
        Some(loaded) => StatsResponse {
            stats: loaded.snapshot.stats(),
            source_path: loaded.source_path.as_ref().map(|p| p.display().to_string()),
            loaded_at: Some(loaded.loaded_at),
        },
        None => StatsResponse {
            stats: ScheduleStats::default(),
            source_path: None,
            loaded_at: None,
        },
    };
    Json(response)
}

pub async fn groups(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(read_snapshot(&state, |snapshot| snapshot.groups().to_vec()))
}

pub async fn teachers(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(read_snapshot(&state, |snapshot| snapshot.teachers().to_vec()))
}

pub async fn group_day(
    State(state): State<AppState>,
    Path((group, day)): Path<(String, String)>,
) -> Result<Json<Vec<NormalizedRow>>, ApiError> {
    let day = parse_day(&day)?;
    Ok(Json(read_snapshot(&state, |snapshot| {
        snapshot.group_day(&group, day).to_vec()
    })))
}

pub async fn group_day_text(
    State(state): State<AppState>,
    Path((group, day)): Path<(String, String)>,
) -> Result<String, ApiError> {
    let day = parse_day(&day)?;
    Ok(read_snapshot(&state, |snapshot| render_group_day(snapshot, &group, day)))
}

pub async fn teacher_rows(
    State(state): State<AppState>,
    Path(teacher): Path<String>,
) -> Json<Vec<NormalizedRow>> {
    Json(read_snapshot(&state, |snapshot| snapshot.teacher(&teacher).to_vec()))
}

pub async fn teacher_lessons(
    State(state): State<AppState>,
    Path(teacher): Path<String>,
) -> Json<Vec<TeacherDay>> {
    let reference = today();
    let week = read_snapshot(&state, |snapshot| snapshot.teacher_week(&teacher));
    Json(
        week.into_iter()
            .map(|(day, lessons)| TeacherDay {
                day,
                name: day.local_name(),
                date: date_in_week(reference, day).format("%d.%m.%Y").to_string(),
                lessons,
            })
            .collect(),
    )
}

pub async fn teacher_text(State(state): State<AppState>, Path(teacher): Path<String>) -> String {
    let reference = today();
    read_snapshot(&state, |snapshot| render_teacher_week(snapshot, &teacher, reference))
}

fn authorize(config: &Config, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = config.admin_token.as_deref() else {
        return Ok(());
    };
    let provided = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .trim();
    if provided == expected {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// `schedule_YYYYmmdd_HHMMSS.xlsx`, then `schedule_YYYYmmdd_HHMMSS_001.xlsx` and
/// so on for later uploads in the same second; names sort in upload order.
pub fn upload_file_name(at: NaiveDateTime, attempt: u32) -> String {
    let stamp = at.format("%Y%m%d_%H%M%S");
    if attempt == 0 {
        format!("schedule_{stamp}.xlsx")
    } else {
        format!("schedule_{stamp}_{attempt:03}.xlsx")
    }
}

/// Create a new upload file in `data_dir`; an existing workbook is never opened for writing.
fn create_upload_file(data_dir: &FsPath, at: NaiveDateTime) -> io::Result<(PathBuf, File)> {
    for attempt in 0..MAX_UPLOADS_PER_SECOND {
        let path = data_dir.join(upload_file_name(at, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "too many uploads in one second",
    ))
}

fn empty_schedule_error(store: &ScheduleStore) -> ApiError {
    ApiError::Unprocessable(format!(
        "no lessons recognized; sheet preview written to {}",
        store.ingestor().preview_path().display()
    ))
}

fn replaced(stats: ScheduleStats, path: &FsPath) -> Json<LoadResponse> {
    Json(LoadResponse {
        status: "replaced",
        stats,
        source_path: path.display().to_string(),
    })
}

fn discard_upload(path: &FsPath) {
    if let Err(err) = fs::remove_file(path) {
        warn!(path = %path.display(), "failed to remove rejected upload: {err}");
    }
}

fn accept_upload(
    store: &ScheduleStore,
    data_dir: &FsPath,
    body: &[u8],
    at: NaiveDateTime,
) -> Result<Json<LoadResponse>, ApiError> {
    fs::create_dir_all(data_dir).map_err(|err| ApiError::Internal(err.to_string()))?;
    let (path, mut file) =
        create_upload_file(data_dir, at).map_err(|err| ApiError::Internal(err.to_string()))?;
    let written = file.write_all(body);
    drop(file);
    if let Err(err) = written {
        discard_upload(&path);
        return Err(ApiError::Internal(err.to_string()));
    }

    match store.load_file(&path) {
        Ok(LoadOutcome::Replaced(stats)) => Ok(replaced(stats, &path)),
        Ok(LoadOutcome::Empty) => {
            discard_upload(&path);
            Err(empty_schedule_error(store))
        }
        Err(err) => {
            discard_upload(&path);
            Err(ApiError::Unprocessable(err.to_string()))
        }
    }
}

fn reload_latest(store: &ScheduleStore, data_dir: &FsPath) -> Result<Json<LoadResponse>, ApiError> {
    let Some(path) = crate::schedule::store::latest_workbook(data_dir) else {
        return Err(ApiError::NotFound(format!(
            "no schedule workbook in {}",
            data_dir.display()
        )));
    };
    match store.load_file(&path) {
        Ok(LoadOutcome::Replaced(stats)) => Ok(replaced(stats, &path)),
        Ok(LoadOutcome::Empty) => Err(empty_schedule_error(store)),
        Err(err) => Err(ApiError::Unprocessable(err.to_string())),
    }
}

pub async fn upload_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LoadResponse>, ApiError> {
    authorize(&state.config, &headers)?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("empty upload".to_string()));
    }
    let store: Arc<ScheduleStore> = Arc::clone(&state.store);
    let data_dir: PathBuf = state.config.data_dir.clone();
    let at = Local::now().naive_local();
    tokio::task::spawn_blocking(move || accept_upload(&store, &data_dir, &body, at))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
}

pub async fn reload_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LoadResponse>, ApiError> {
    authorize(&state.config, &headers)?;
    let store = Arc::clone(&state.store);
    let data_dir = state.config.data_dir.clone();
    tokio::task::spawn_blocking(move || reload_latest(&store, &data_dir))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
}
