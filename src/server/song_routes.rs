//! Routes for songs, the deepest level of the hierarchy. A song is always
//! addressed through its album, and its `number_in_album` lives on the
//! album association, not on the song itself.

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
use super::validate::{required, validate_name, validate_number_in_album, validate_slug};
use crate::catalog_store::{NewSong, SongChanges};

#[derive(Debug, Deserialize)]
struct SongPayload {
    name: Option<String>,
    slug: Option<String>,
    number_in_album: Option<u32>,
}

fn changes_from(payload: SongPayload, partial: bool) -> Result<SongChanges, ApiError> {
    if !partial {
        required(payload.name.as_ref(), "name")?;
        required(payload.slug.as_ref(), "slug")?;
        required(payload.number_in_album, "number_in_album")?;
    }
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }
    if let Some(number) = payload.number_in_album {
        validate_number_in_album(number)?;
    }
    Ok(SongChanges {
        name: payload.name,
        slug: payload.slug,
        number_in_album: payload.number_in_album,
    })
}

async fn list_songs(
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album)): Path<(String, String)>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let songs = catalog.list_songs(&musician, &album, query.search.as_deref())?;
    Ok(Json(songs).into_response())
}

async fn create_song(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album)): Path<(String, String)>,
    Json(payload): Json<SongPayload>,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    let name = required(payload.name, "name")?;
    let slug = required(payload.slug, "slug")?;
    let number_in_album = required(payload.number_in_album, "number_in_album")?;
    validate_name(&name)?;
    validate_slug(&slug)?;
    validate_number_in_album(number_in_album)?;

    let song = catalog.create_song(
        &musician,
        &album,
        NewSong {
            name,
            slug,
            number_in_album,
        },
    )?;
    Ok((StatusCode::CREATED, Json(song)).into_response())
}

async fn get_song(
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album, song)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let song = catalog.get_song(&musician, &album, &song)?;
    Ok(Json(song).into_response())
}

async fn update_song(
    session: Session,
    catalog: GuardedCatalogStore,
    musician: String,
    album: String,
    song: String,
    payload: SongPayload,
    partial: bool,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    let changes = changes_from(payload, partial)?;
    let song = catalog.update_song(&musician, &album, &song, changes)?;
    Ok(Json(song).into_response())
}

async fn put_song(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album, song)): Path<(String, String, String)>,
    Json(payload): Json<SongPayload>,
) -> Result<Response, ApiError> {
    update_song(session, catalog, musician, album, song, payload, false).await
}

async fn patch_song(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album, song)): Path<(String, String, String)>,
    Json(payload): Json<SongPayload>,
) -> Result<Response, ApiError> {
    update_song(session, catalog, musician, album, song, payload, true).await
}

async fn delete_song(
    session: Session,
    State(catalog): State<GuardedCatalogStore>,
    Path((musician, album, song)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    require_catalog_editor(&session)?;
    catalog.delete_song(&musician, &album, &song)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/musicians/{musician}/albums/{album}/songs/",
            get(list_songs).post(create_song),
        )
        .route(
            "/musicians/{musician}/albums/{album}/songs/{song}/",
            get(get_song)
                .put(put_song)
                .patch(patch_song)
                .delete(delete_song),
        )
}
