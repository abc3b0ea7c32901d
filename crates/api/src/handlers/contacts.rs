//! Handlers for local contacts.
//!
//! Reads and manual edits go straight to the database. Creation goes
//! through the sync engine so the contact exists in Salesforce first.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use crmsync_core::error::CoreError;
use crmsync_core::search::{
    clamp_limit, clamp_offset, contains_pattern, DEFAULT_CONTACT_LIMIT, MAX_CONTACT_LIMIT,
};
use crmsync_core::types::DbId;
use crmsync_db::models::contact::{CreateContact, UpdateContact};
use crmsync_db::repositories::ContactRepo;

use crate::error::{AppError, AppResult};
use crate::query::ContactListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/contacts
///
/// List contacts ordered by name. `search` matches first name, last name,
/// email or company, case-insensitively.
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<ContactListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_CONTACT_LIMIT, MAX_CONTACT_LIMIT);
    let offset = clamp_offset(params.offset);
    let pattern = params.search.as_deref().and_then(contains_pattern);

    let contacts = ContactRepo::list(&state.pool, pattern.as_deref(), limit, offset).await?;

    Ok(Json(DataResponse { data: contacts }))
}

/// GET /api/v1/contacts/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    Ok(Json(DataResponse { data: contact }))
}

/// POST /api/v1/contacts
///
/// Create the contact in Salesforce, then store it locally. Responds 502
/// when Salesforce does not accept it; nothing is stored in that case.
pub async fn create_contact(
    State(state): State<AppState>,
    Json(input): Json<CreateContact>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let session = state.sessions.open_session().await?;
    let contact = session
        .create_contact(&input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Upstream(
                "Salesforce did not accept the contact".to_string(),
            ))
        })?;

    tracing::info!(contact_id = contact.id, "Contact created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: contact })))
}

/// PUT /api/v1/contacts/{id}
///
/// Local edit only. The next sync overwrites name, email and phone for
/// contacts linked to Salesforce.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContact>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let contact = ContactRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    tracing::info!(contact_id = id, "Contact updated");

    Ok(Json(DataResponse { data: contact }))
}

/// DELETE /api/v1/contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ContactRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }));
    }

    tracing::info!(contact_id = id, "Contact deleted");

    Ok(StatusCode::NO_CONTENT)
}
