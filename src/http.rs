use crate::backend::StorageBackend;
use crate::configuration::Configuration;
use crate::errors::StoreError;
use crate::seed::insert_example_appointments;
use crate::types::{today, Appointment, AppointmentForm, AvailablePatient};
use crate::AppState;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Response;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use validator::{Validate, ValidationError};

pub const MAX_CANCEL_REASON_LENGTH: u64 = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ListQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AvailableQuery {
    reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MoveRequest {
    id: String,
    date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CancelRequest {
    id: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_CANCEL_REASON_LENGTH),
        custom(function = not_blank)
    )]
    reason: String,
    #[serde(default)]
    offer_reschedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CancelResponse {
    appointment: Appointment,
    message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SweepResponse {
    removed: usize,
    message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromoteRequest {
    name: String,
    date: NaiveDate,
}

/// Builds the router around `backend`, inserting the example appointments
/// first when the configuration asks for them.
pub fn create_app<B: StorageBackend, C: Configuration>(backend: B, configuration: &C) -> Router {
    if configuration.seed_examples() {
        insert_example_appointments(&backend);
    }
    router(AppState::new(backend))
}

pub fn router<B: StorageBackend>(state: AppState<B>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/appointments",
            get(get_appointments::<B>).post(create_appointment::<B>),
        )
        .route("/appointments/stream", get(stream_appointments::<B>))
        .route("/sweep", post(sweep_expired::<B>))
        .route("/move", post(move_appointment::<B>))
        .route("/cancel", post(cancel_appointment::<B>))
        .route("/available", get(get_available::<B>))
        .route("/promote", post(promote_patient::<B>))
        .with_state(state)
        .layer(cors)
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn store_error(err: StoreError) -> (StatusCode, String) {
    let status = match err {
        StoreError::NotFound(_) | StoreError::UnknownPatient(_) => StatusCode::NOT_FOUND,
        StoreError::PastDate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, err.to_string())
}

async fn get_appointments<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Appointment>> {
    state.store.sweep_expired();
    let appointments = match query.date {
        Some(date) => state.store.list_by_date(date),
        None => state.store.list_sorted(),
    };
    Json(appointments)
}

async fn sweep_expired<B: StorageBackend>(State(state): State<AppState<B>>) -> Json<SweepResponse> {
    let removed = state.store.sweep_expired();
    let message = match removed {
        0 => "No expired appointments to remove".to_string(),
        1 => "1 expired appointment removed".to_string(),
        removed => format!("{removed} expired appointments removed"),
    };
    Json(SweepResponse { removed, message })
}

async fn stream_appointments<B: StorageBackend>(
    State(state): State<AppState<B>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = state
        .store
        .subscribe()
        .map(|appointments| Event::default().json_data(appointments));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn create_appointment<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Json(form): Json<AppointmentForm>,
) -> Response {
    match form.into_new_appointment(today()) {
        Ok(new_appointment) => {
            let appointment = state.store.create(new_appointment);
            (StatusCode::CREATED, Json(appointment)).into_response()
        }
        Err(errors) => {
            info!(fields = ?errors.fields().collect::<Vec<_>>(), "Appointment form rejected");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
        }
    }
}

async fn move_appointment<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<MoveRequest>,
) -> impl IntoResponse {
    match state.store.update_date(&request.id, request.date) {
        Ok(()) => (StatusCode::OK, "Appointment moved successfully".to_string()),
        Err(err) => store_error(err),
    }
}

// The reason and the reschedule flag are only logged and echoed back.
async fn cancel_appointment<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<CancelRequest>,
) -> Response {
    if let Err(errors) = request.validate() {
        return (StatusCode::UNPROCESSABLE_ENTITY, errors.to_string()).into_response();
    }

    match state.store.delete(&request.id) {
        Ok(appointment) => {
            info!(
                id = %appointment.id,
                reason = %request.reason,
                offer_reschedule = request.offer_reschedule,
                "Appointment cancelled"
            );
            let message = if request.offer_reschedule {
                format!(
                    "{} will be contacted to reschedule the appointment",
                    appointment.patient_name
                )
            } else {
                "Appointment cancelled successfully".to_string()
            };
            (StatusCode::OK, Json(CancelResponse { appointment, message })).into_response()
        }
        Err(err) => store_error(err).into_response(),
    }
}

async fn get_available<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Query(query): Query<AvailableQuery>,
) -> Json<Vec<AvailablePatient>> {
    state.store.sweep_expired();
    let filter = query.reason.unwrap_or_default();
    Json(state.availability.list_available_by_reason(&filter))
}

async fn promote_patient<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<PromoteRequest>,
) -> Response {
    match state.availability.promote_by_name(&request.name, request.date) {
        Ok(appointment) => (StatusCode::CREATED, Json(appointment)).into_response(),
        Err(err) => store_error(err).into_response(),
    }
}
