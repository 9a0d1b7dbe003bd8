use crate::domain::{GuestError, GuestStatus};
use crate::interface_adapters::protocol::{ErrorResponse, GuestListResponse, MutationResponse};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{AddGuest, GuestListView, MutationError, PhotoEdit};
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, State};
use axum::{Json, http::StatusCode};
use std::sync::Arc;

type HandlerError = (StatusCode, Json<ErrorResponse>);

const FORM_UNREADABLE: &str = "Não foi possível ler o formulário. Tente novamente.";

// Return the last rendered snapshot without touching the sheet.
pub async fn list_guests(State(state): State<Arc<AppState>>) -> Json<GuestListResponse> {
    let view = state.sync.snapshot();
    Json(list_response(&state, view).await)
}

// Re-fetch the sheet and return the fresh snapshot.
#[tracing::instrument(name = "refresh_guests_request", skip_all)]
pub async fn refresh_guests(State(state): State<Arc<AppState>>) -> Json<GuestListResponse> {
    let view = state.sync.refresh().await;
    Json(list_response(&state, view).await)
}

#[tracing::instrument(name = "add_guest", skip_all)]
pub async fn add_guest(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MutationResponse>), HandlerError> {
    let form = match read_guest_form(multipart).await {
        Ok(form) => form,
        Err(err) => return Err(reject_form(&state, err).await),
    };
    tracing::debug!(has_photo = form.photo.is_some(), "add guest form received");

    let outcome = state
        .mutator()
        .add_guest(form)
        .await
        .map_err(map_mutation_error)?;

    tracing::info!("guest added.");
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

#[tracing::instrument(name = "confirm_guest", skip_all, fields(guest = %name))]
pub async fn confirm_guest(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<MutationResponse>, HandlerError> {
    let outcome = state
        .mutator()
        .confirm_status(&name)
        .await
        .map_err(map_mutation_error)?;

    Ok(Json(outcome.into()))
}

#[tracing::instrument(name = "update_photo", skip_all, fields(guest = %name))]
pub async fn update_photo(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    multipart: Multipart,
) -> Result<Json<MutationResponse>, HandlerError> {
    let photo = match read_photo(multipart).await {
        Ok(photo) => photo,
        Err(err) => return Err(reject_form(&state, err).await),
    };

    let outcome = state
        .mutator()
        .update_photo(PhotoEdit {
            guest_name: name,
            photo,
        })
        .await
        .map_err(map_mutation_error)?;

    Ok(Json(outcome.into()))
}

async fn list_response(state: &AppState, view: GuestListView) -> GuestListResponse {
    GuestListResponse {
        view,
        message: state.feedback.current().await,
    }
}

// Collect `name`, `status` and optional `photo` from the add-guest form.
async fn read_guest_form(mut multipart: Multipart) -> Result<AddGuest, MultipartError> {
    let mut form = AddGuest {
        name: String::new(),
        status: GuestStatus::Pending,
        photo: None,
    };

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("name") => form.name = field.text().await?,
            Some("status") => {
                let raw = field.text().await?;
                form.status = GuestStatus::from_cell(&raw).unwrap_or_default();
            }
            Some("photo") => {
                let bytes = read_bytes(field).await?;
                // Browsers send an empty file part when nothing was picked.
                form.photo = (!bytes.is_empty()).then_some(bytes);
            }
            _ => {}
        }
    }

    Ok(form)
}

// The `photo` file of the photo-replacement form; empty when it was not sent.
async fn read_photo(mut multipart: Multipart) -> Result<Vec<u8>, MultipartError> {
    let mut photo = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("photo") {
            photo = read_bytes(field).await?;
        }
    }
    Ok(photo)
}

async fn read_bytes(field: Field<'_>) -> Result<Vec<u8>, MultipartError> {
    field.bytes().await.map(|bytes| bytes.to_vec())
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

// A form that cannot be read (malformed or over the upload limit) is reported
// to the user like any other failed action.
async fn reject_form(state: &AppState, err: MultipartError) -> HandlerError {
    tracing::warn!(error = %err, "invalid multipart body");
    let feedback = state.feedback.error(FORM_UNREADABLE).await;
    error_response(err.status(), &feedback.text)
}

// Maps domain errors to HTTP responses; the body carries the message shown to the user.
fn map_mutation_error(err: MutationError) -> HandlerError {
    let status = match err.error {
        GuestError::Validation(_) => StatusCode::BAD_REQUEST,
        GuestError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GuestError::Transport(_) => StatusCode::BAD_GATEWAY,
    };
    error_response(status, &err.feedback.text)
}
