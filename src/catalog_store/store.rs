//! SQLite-backed catalog store.
//!
//! One writable connection behind a mutex; the slug and position uniqueness
//! constraints in the schema are the authoritative guards, the explicit
//! lookups below only exist to produce friendly error messages. Song
//! creation and update touch two tables and run inside a transaction.

use super::error::CatalogError;
use super::models::{
    Album, AlbumChanges, Musician, MusicianChanges, NewAlbum, NewMusician, NewSong, Song,
    SongChanges,
};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub struct SqliteCatalogStore {
    conn: Mutex<Connection>,
}

fn initialize(mut conn: Connection) -> Result<SqliteCatalogStore> {
    migrate_if_needed(&mut conn)?;
    conn.execute("PRAGMA foreign_keys = ON;", params![])?;
    Ok(SqliteCatalogStore {
        conn: Mutex::new(conn),
    })
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version < BASE_DB_VERSION as i64 {
        bail!("Catalog database has no schema version, refusing to open it");
    }
    let current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version > latest_version {
        bail!(
            "Catalog database is at schema version {}, this build only knows up to {}",
            current_version,
            latest_version
        );
    }

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in CATALOG_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!("Migrating catalog db to version {}", schema.version);
                migration_fn(&tx)?;
            }
            tx.execute(
                &format!("PRAGMA user_version = {}", BASE_DB_VERSION + schema.version),
                [],
            )?;
        }
        tx.commit()?;
    }

    latest_schema.validate(conn)?;
    Ok(())
}

impl SqliteCatalogStore {
    pub fn new(db_path: &Path) -> Result<Self> {
        initialize(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        initialize(Connection::open_in_memory()?)
    }
}

// =============================================================================
// Row lookups shared between operations. All take a plain connection so they
// work both standalone and inside a transaction.
// =============================================================================

fn musician_id(conn: &Connection, slug: &str) -> Result<i64, CatalogError> {
    conn.query_row(
        "SELECT id FROM musicians WHERE slug = ?1",
        params![slug],
        |r| r.get(0),
    )
    .optional()?
    .ok_or(CatalogError::NotFound)
}

/// Resolves an album by slug scoped to its owner: an existing album addressed
/// under the wrong musician is indistinguishable from a missing one.
fn scoped_album_id(
    conn: &Connection,
    musician_slug: &str,
    album_slug: &str,
) -> Result<i64, CatalogError> {
    musician_id(conn, musician_slug)?;
    conn.query_row(
        "SELECT a.id FROM albums a
         JOIN musicians m ON m.id = a.musician_id
         WHERE m.slug = ?1 AND a.slug = ?2",
        params![musician_slug, album_slug],
        |r| r.get(0),
    )
    .optional()?
    .ok_or(CatalogError::NotFound)
}

fn read_album(conn: &Connection, album_id: i64) -> Result<Album, CatalogError> {
    Ok(conn.query_row(
        "SELECT a.name, a.slug, m.slug, a.year_of_release,
                (SELECT COUNT(*) FROM album_songs als WHERE als.album_id = a.id)
         FROM albums a
         JOIN musicians m ON m.id = a.musician_id
         WHERE a.id = ?1",
        params![album_id],
        |r| {
            Ok(Album {
                name: r.get(0)?,
                slug: r.get(1)?,
                musician: r.get(2)?,
                year_of_release: r.get(3)?,
                total_songs: r.get(4)?,
            })
        },
    )?)
}

fn musician_slug_taken(conn: &Connection, slug: &str, exclude_id: i64) -> Result<bool, CatalogError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM musicians WHERE slug = ?1 AND id != ?2)",
        params![slug, exclude_id],
        |r| r.get(0),
    )?)
}

fn album_slug_taken(conn: &Connection, slug: &str, exclude_id: i64) -> Result<bool, CatalogError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM albums WHERE slug = ?1 AND id != ?2)",
        params![slug, exclude_id],
        |r| r.get(0),
    )?)
}

fn song_slug_taken(conn: &Connection, slug: &str, exclude_id: i64) -> Result<bool, CatalogError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM songs WHERE slug = ?1 AND id != ?2)",
        params![slug, exclude_id],
        |r| r.get(0),
    )?)
}

/// Is `number` already held by a different song in this album?
fn position_taken(
    conn: &Connection,
    album_id: i64,
    number: u32,
    exclude_song_id: i64,
) -> Result<bool, CatalogError> {
    Ok(conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM album_songs
            WHERE album_id = ?1 AND number_in_album = ?2 AND song_id != ?3
         )",
        params![album_id, number, exclude_song_id],
        |r| r.get(0),
    )?)
}

fn read_song_in_album(
    conn: &Connection,
    album_id: i64,
    song_slug: &str,
) -> Result<Option<(i64, Song)>, CatalogError> {
    Ok(conn
        .query_row(
            "SELECT s.id, s.name, s.slug, als.number_in_album
             FROM album_songs als
             JOIN songs s ON s.id = als.song_id
             WHERE als.album_id = ?1 AND s.slug = ?2",
            params![album_id, song_slug],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    Song {
                        name: r.get(1)?,
                        slug: r.get(2)?,
                        number_in_album: r.get(3)?,
                    },
                ))
            },
        )
        .optional()?)
}

fn count(conn: &Connection, table: &str) -> usize {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .unwrap_or(0)
}

impl CatalogStore for SqliteCatalogStore {
    fn list_musicians(&self, search: Option<&str>) -> Result<Vec<Musician>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT name, slug FROM musicians
             WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%')
             ORDER BY name",
        )?;
        let musicians = stmt
            .query_map(params![search], |r| {
                Ok(Musician {
                    name: r.get(0)?,
                    slug: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;
        Ok(musicians)
    }

    fn get_musician(&self, slug: &str) -> Result<Musician, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT name, slug FROM musicians WHERE slug = ?1",
            params![slug],
            |r| {
                Ok(Musician {
                    name: r.get(0)?,
                    slug: r.get(1)?,
                })
            },
        )
        .optional()?
        .ok_or(CatalogError::NotFound)
    }

    fn create_musician(&self, new: NewMusician) -> Result<Musician, CatalogError> {
        let conn = self.conn.lock().unwrap();
        if musician_slug_taken(&conn, &new.slug, -1)? {
            return Err(CatalogError::Conflict(
                "musician with this slug already exists".to_string(),
            ));
        }
        conn.execute(
            "INSERT INTO musicians (name, slug) VALUES (?1, ?2)",
            params![new.name, new.slug],
        )?;
        Ok(Musician {
            name: new.name,
            slug: new.slug,
        })
    }

    fn update_musician(
        &self,
        slug: &str,
        changes: MusicianChanges,
    ) -> Result<Musician, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let id = musician_id(&conn, slug)?;
        if let Some(new_slug) = &changes.slug {
            if musician_slug_taken(&conn, new_slug, id)? {
                return Err(CatalogError::Conflict(
                    "musician with this slug already exists".to_string(),
                ));
            }
        }
        conn.execute(
            "UPDATE musicians SET name = COALESCE(?1, name), slug = COALESCE(?2, slug)
             WHERE id = ?3",
            params![changes.name, changes.slug, id],
        )?;
        Ok(conn.query_row(
            "SELECT name, slug FROM musicians WHERE id = ?1",
            params![id],
            |r| {
                Ok(Musician {
                    name: r.get(0)?,
                    slug: r.get(1)?,
                })
            },
        )?)
    }

    fn delete_musician(&self, slug: &str) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM musicians WHERE slug = ?1", params![slug])?;
        if deleted == 0 {
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }

    fn list_albums(
        &self,
        musician_slug: &str,
        search: Option<&str>,
    ) -> Result<Vec<Album>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let mid = musician_id(&conn, musician_slug)?;
        let mut stmt = conn.prepare(
            "SELECT a.name, a.slug, m.slug, a.year_of_release,
                    (SELECT COUNT(*) FROM album_songs als WHERE als.album_id = a.id)
             FROM albums a
             JOIN musicians m ON m.id = a.musician_id
             WHERE a.musician_id = ?1
               AND (?2 IS NULL OR a.name LIKE '%' || ?2 || '%')
             ORDER BY a.name, a.year_of_release DESC",
        )?;
        let albums = stmt
            .query_map(params![mid, search], |r| {
                Ok(Album {
                    name: r.get(0)?,
                    slug: r.get(1)?,
                    musician: r.get(2)?,
                    year_of_release: r.get(3)?,
                    total_songs: r.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;
        Ok(albums)
    }

    fn get_album(&self, musician_slug: &str, album_slug: &str) -> Result<Album, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let album_id = scoped_album_id(&conn, musician_slug, album_slug)?;
        read_album(&conn, album_id)
    }

    fn create_album(&self, musician_slug: &str, new: NewAlbum) -> Result<Album, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let mid = musician_id(&conn, musician_slug)?;
        if album_slug_taken(&conn, &new.slug, -1)? {
            return Err(CatalogError::Conflict(
                "album with this slug already exists".to_string(),
            ));
        }
        conn.execute(
            "INSERT INTO albums (name, slug, musician_id, year_of_release)
             VALUES (?1, ?2, ?3, ?4)",
            params![new.name, new.slug, mid, new.year_of_release],
        )?;
        read_album(&conn, conn.last_insert_rowid())
    }

    fn update_album(
        &self,
        musician_slug: &str,
        album_slug: &str,
        changes: AlbumChanges,
    ) -> Result<Album, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let album_id = scoped_album_id(&conn, musician_slug, album_slug)?;
        if let Some(new_slug) = &changes.slug {
            if album_slug_taken(&conn, new_slug, album_id)? {
                return Err(CatalogError::Conflict(
                    "album with this slug already exists".to_string(),
                ));
            }
        }
        conn.execute(
            "UPDATE albums SET
                name = COALESCE(?1, name),
                slug = COALESCE(?2, slug),
                year_of_release = COALESCE(?3, year_of_release)
             WHERE id = ?4",
            params![changes.name, changes.slug, changes.year_of_release, album_id],
        )?;
        read_album(&conn, album_id)
    }

    fn delete_album(&self, musician_slug: &str, album_slug: &str) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        let album_id = scoped_album_id(&conn, musician_slug, album_slug)?;
        conn.execute("DELETE FROM albums WHERE id = ?1", params![album_id])?;
        Ok(())
    }

    fn list_songs(
        &self,
        musician_slug: &str,
        album_slug: &str,
        search: Option<&str>,
    ) -> Result<Vec<Song>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let album_id = scoped_album_id(&conn, musician_slug, album_slug)?;
        let mut stmt = conn.prepare(
            "SELECT s.name, s.slug, als.number_in_album
             FROM album_songs als
             JOIN songs s ON s.id = als.song_id
             WHERE als.album_id = ?1
               AND (?2 IS NULL OR s.name LIKE '%' || ?2 || '%')
             ORDER BY als.number_in_album",
        )?;
        let songs = stmt
            .query_map(params![album_id, search], |r| {
                Ok(Song {
                    name: r.get(0)?,
                    slug: r.get(1)?,
                    number_in_album: r.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;
        Ok(songs)
    }

    fn get_song(
        &self,
        musician_slug: &str,
        album_slug: &str,
        song_slug: &str,
    ) -> Result<Song, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let album_id = scoped_album_id(&conn, musician_slug, album_slug)?;
        read_song_in_album(&conn, album_id, song_slug)?
            .map(|(_, song)| song)
            .ok_or(CatalogError::NotFound)
    }

    fn create_song(
        &self,
        musician_slug: &str,
        album_slug: &str,
        new: NewSong,
    ) -> Result<Song, CatalogError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(CatalogError::from)?;
        let album_id = scoped_album_id(&tx, musician_slug, album_slug)?;

        // slug first: it is the lookup key, the position check comes after
        if song_slug_taken(&tx, &new.slug, -1)? {
            return Err(CatalogError::Conflict(
                "song with this slug already exists".to_string(),
            ));
        }
        if position_taken(&tx, album_id, new.number_in_album, -1)? {
            return Err(CatalogError::Conflict(
                "the album already has a song at this position".to_string(),
            ));
        }

        tx.execute(
            "INSERT INTO songs (name, slug) VALUES (?1, ?2)",
            params![new.name, new.slug],
        )?;
        let song_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO album_songs (album_id, song_id, number_in_album) VALUES (?1, ?2, ?3)",
            params![album_id, song_id, new.number_in_album],
        )?;
        tx.commit().map_err(CatalogError::from)?;

        Ok(Song {
            name: new.name,
            slug: new.slug,
            number_in_album: new.number_in_album,
        })
    }

    fn update_song(
        &self,
        musician_slug: &str,
        album_slug: &str,
        song_slug: &str,
        changes: SongChanges,
    ) -> Result<Song, CatalogError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(CatalogError::from)?;
        let album_id = scoped_album_id(&tx, musician_slug, album_slug)?;
        let (song_id, _) =
            read_song_in_album(&tx, album_id, song_slug)?.ok_or(CatalogError::NotFound)?;

        if let Some(new_slug) = &changes.slug {
            if song_slug_taken(&tx, new_slug, song_id)? {
                return Err(CatalogError::Conflict(
                    "song with this slug already exists".to_string(),
                ));
            }
        }
        if let Some(number) = changes.number_in_album {
            // keeping the current position is not a collision with itself
            if position_taken(&tx, album_id, number, song_id)? {
                return Err(CatalogError::Conflict(
                    "the album already has a song at this position".to_string(),
                ));
            }
        }

        tx.execute(
            "UPDATE songs SET name = COALESCE(?1, name), slug = COALESCE(?2, slug)
             WHERE id = ?3",
            params![changes.name, changes.slug, song_id],
        )?;
        if let Some(number) = changes.number_in_album {
            tx.execute(
                "UPDATE album_songs SET number_in_album = ?1
                 WHERE album_id = ?2 AND song_id = ?3",
                params![number, album_id, song_id],
            )?;
        }

        let song = tx
            .query_row(
                "SELECT s.name, s.slug, als.number_in_album
                 FROM album_songs als
                 JOIN songs s ON s.id = als.song_id
                 WHERE als.album_id = ?1 AND s.id = ?2",
                params![album_id, song_id],
                |r| {
                    Ok(Song {
                        name: r.get(0)?,
                        slug: r.get(1)?,
                        number_in_album: r.get(2)?,
                    })
                },
            )
            .map_err(CatalogError::from)?;
        tx.commit().map_err(CatalogError::from)?;
        Ok(song)
    }

    fn delete_song(
        &self,
        musician_slug: &str,
        album_slug: &str,
        song_slug: &str,
    ) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        let album_id = scoped_album_id(&conn, musician_slug, album_slug)?;
        let (song_id, _) =
            read_song_in_album(&conn, album_id, song_slug)?.ok_or(CatalogError::NotFound)?;
        // removes the position row through the cascade
        conn.execute("DELETE FROM songs WHERE id = ?1", params![song_id])?;
        Ok(())
    }

    fn get_musicians_count(&self) -> usize {
        count(&self.conn.lock().unwrap(), "musicians")
    }

    fn get_albums_count(&self) -> usize {
        count(&self.conn.lock().unwrap(), "albums")
    }

    fn get_songs_count(&self) -> usize {
        count(&self.conn.lock().unwrap(), "songs")
    }
}
