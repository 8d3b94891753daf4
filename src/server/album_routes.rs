//! Routes for albums, always scoped to the musician named in the path.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::error::ApiError;
use super::musician_routes::SearchQuery;
use super::session::{require_catalog_editor, Session};
use super::state::{GuardedCatalogStore, ServerState};
use super::validate::{required, validate_name, validate_slug, validate_year_of_release};
use crate::catalog_store::{AlbumChanges, NewAlbum};

/// The owning musician never comes from the payload: it is taken from the
/// path, and anything the client sends for it is dropped during
/// deserialization.
#[derive(Debug, Deserialize)]
struct AlbumPayload {
    name: Option<String>,
    slug: Option<String>,
    year_of_release: Option<i32>,
}

fn changes_from(payload: AlbumPayload, partial: bool) -> Result<AlbumChanges, ApiError> {
    if !partial {
        required(payload.name.as_ref(), "name")?;
        required(payload.slug.as_ref(), "slug")?;
        required(payload.year_of_release, "year_of_release")?;
    }
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }
    if let Some(year) = payload.year_of_release {
        validate_year_of_release(year)?;
    }
    Ok(AlbumChanges {
        name: payload.name,
        slug: payload.slug,
        year_of_release: payload.year_of_release,
    })
}

async fn list_albums(
    State(catalog): State<GuardedCatalogStore>,
    Path(musician): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let albums = catalog.list_albums(&musician, query.search.as_deref())?;
    Ok(Json(albums).into_response())
}

async fn create_album(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path(musician): Path<String>,
    Json(payload): Json<AlbumPayload>,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    let name = required(payload.name, "name")?;
    let slug = required(payload.slug, "slug")?;
    let year_of_release = required(payload.year_of_release, "year_of_release")?;
    validate_name(&name)?;
    validate_slug(&slug)?;
    validate_year_of_release(year_of_release)?;

    let album = catalog.create_album(
        &musician,
        NewAlbum {
            name,
            slug,
            year_of_release,
        },
    )?;
    Ok((StatusCode::CREATED, Json(album)).into_response())
}

async fn get_album(
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let album = catalog.get_album(&musician, &album)?;
    Ok(Json(album).into_response())
}

async fn update_album(
    session: Session,
    catalog: GuardedCatalogStore,
    musician: String,
    album: String,
    payload: AlbumPayload,
    partial: bool,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    let changes = changes_from(payload, partial)?;
    let album = catalog.update_album(&musician, &album, changes)?;
    Ok(Json(album).into_response())
}

async fn put_album(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album)): Path<(String, String)>,
    Json(payload): Json<AlbumPayload>,
) -> Result<Response, ApiError> {
    update_album(session, catalog, musician, album, payload, false).await
}

async fn patch_album(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album)): Path<(String, String)>,
    Json(payload): Json<AlbumPayload>,
) -> Result<Response, ApiError> {
    update_album(session, catalog, musician, album, payload, true).await
}

async fn delete_album(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    catalog.delete_album(&musician, &album)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/musicians/{musician}/albums/",
            get(list_albums).post(create_album),
        )
        .route(
            "/musicians/{musician}/albums/{album}/",
            get(get_album)
                .put(put_album)
                .patch(patch_album)
                .delete(delete_album),
        )
}
