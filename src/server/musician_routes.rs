//! Routes for the top level of the catalog hierarchy: musicians.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::error::ApiError;
use super::session::{require_catalog_editor, Session};
use super::state::{GuardedCatalogStore, ServerState};
use super::validate::{required, validate_name, validate_slug};
use crate::catalog_store::{MusicianChanges, NewMusician};

/// `?search=` free-text filter accepted by every list endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MusicianPayload {
    name: Option<String>,
    slug: Option<String>,
}

fn changes_from(payload: MusicianPayload, partial: bool) -> Result<MusicianChanges, ApiError> {
    if !partial {
        required(payload.name.as_ref(), "name")?;
        required(payload.slug.as_ref(), "slug")?;
    }
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }
    Ok(MusicianChanges {
        name: payload.name,
        slug: payload.slug,
    })
}

async fn list_musicians(
    State(catalog): State<GuardedCatalogStore>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let musicians = catalog.list_musicians(query.search.as_deref())?;
    Ok(Json(musicians).into_response())
}

async fn create_musician(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Json(payload): Json<MusicianPayload>,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    let name = required(payload.name, "name")?;
    let slug = required(payload.slug, "slug")?;
    validate_name(&name)?;
    validate_slug(&slug)?;

    let musician = catalog.create_musician(NewMusician { name, slug })?;
    Ok((StatusCode::CREATED, Json(musician)).into_response())
}

async fn get_musician(
    State(catalog): State<GuardedCatalogStore>,
    Path(musician): Path<String>,
) -> Result<Response, ApiError> {
    let musician = catalog.get_musician(&musician)?;
    Ok(Json(musician).into_response())
}

async fn update_musician(
    session: Session,
    catalog: GuardedCatalogStore,
    slug: String,
    payload: MusicianPayload,
    partial: bool,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    let changes = changes_from(payload, partial)?;
    let musician = catalog.update_musician(&slug, changes)?;
    Ok(Json(musician).into_response())
}

async fn put_musician(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path(musician): Path<String>,
    Json(payload): Json<MusicianPayload>,
) -> Result<Response, ApiError> {
    update_musician(session, catalog, musician, payload, false).await
}

async fn patch_musician(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path(musician): Path<String>,
    Json(payload): Json<MusicianPayload>,
) -> Result<Response, ApiError> {
    update_musician(session, catalog, musician, payload, true).await
}

async fn delete_musician(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path(musician): Path<String>,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    catalog.delete_musician(&musician)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/musicians/", get(list_musicians).post(create_musician))
        .route(
            "/musicians/{musician}/",
            get(get_musician)
                .put(put_musician)
                .patch(patch_musician)
                .delete(delete_musician),
        )
}
