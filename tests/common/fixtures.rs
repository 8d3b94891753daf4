//! Test fixture creation: stores seeded with users and a small catalog.

use super::constants::*;
use anyhow::Result;
use music_catalog_server::catalog_store::{
    CatalogStore, NewAlbum, NewMusician, NewSong, SqliteCatalogStore,
};
use music_catalog_server::user::{create_user_with_password, SqliteUserStore, UserRole};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Creates a temporary catalog and user database, seeded with:
/// - an administrator and a regular user
/// - one musician with one album holding one song at position 1
///
/// Returns (temp_dir, catalog_store, user_store). The TempDir must be kept
/// alive for as long as the stores are used.
pub fn create_test_stores() -> Result<(TempDir, Arc<SqliteCatalogStore>, Arc<SqliteUserStore>)> {
    let dir = TempDir::new()?;

    let catalog_db_path: PathBuf = dir.path().join("catalog.db");
    let user_db_path: PathBuf = dir.path().join("users.db");

    let catalog_store = Arc::new(SqliteCatalogStore::new(&catalog_db_path)?);
    let user_store = Arc::new(SqliteUserStore::new(&user_db_path)?);

    create_user_with_password(user_store.as_ref(), ADMIN_USER, ADMIN_PASS, UserRole::Admin)?;
    create_user_with_password(user_store.as_ref(), TEST_USER, TEST_PASS, UserRole::Regular)?;

    catalog_store.create_musician(NewMusician {
        name: MUSICIAN_NAME.to_string(),
        slug: MUSICIAN_SLUG.to_string(),
    })?;
    catalog_store.create_album(
        MUSICIAN_SLUG,
        NewAlbum {
            name: ALBUM_NAME.to_string(),
            slug: ALBUM_SLUG.to_string(),
            year_of_release: ALBUM_YEAR,
        },
    )?;
    catalog_store.create_song(
        MUSICIAN_SLUG,
        ALBUM_SLUG,
        NewSong {
            name: SONG_NAME.to_string(),
            slug: SONG_SLUG.to_string(),
            number_in_album: SONG_NUMBER,
        },
    )?;

    Ok((dir, catalog_store, user_store))
}
