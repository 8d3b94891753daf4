//! SQLite schema for the music catalog database.
//!
//! Slugs carry a UNIQUE constraint per entity: they are the lookup key used
//! by the API, and the constraint is the authoritative guard against
//! duplicates. The same goes for the (album_id, number_in_album) pair on the
//! association table, which is what keeps song positions unique per album
//! even under concurrent writers.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const MUSICIAN_FK: ForeignKey = ForeignKey {
    foreign_table: "musicians",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const MUSICIANS_TABLE: Table = Table {
    name: "musicians",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("slug", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["slug"]],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("slug", &SqlType::Text, non_null = true),
        sqlite_column!(
            "musician_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&MUSICIAN_FK)
        ),
        sqlite_column!("year_of_release", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_albums_musician", "musician_id")],
    unique_constraints: &[&["slug"]],
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("slug", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["slug"]],
};

/// Association between albums and songs, holding the song's ordinal position.
const ALBUM_SONGS_TABLE: Table = Table {
    name: "album_songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "album_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ALBUM_FK)
        ),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!("number_in_album", &SqlType::Integer, non_null = true),
    ],
    indices: &[
        ("idx_album_songs_album", "album_id"),
        ("idx_album_songs_song", "song_id"),
    ],
    unique_constraints: &[
        &["album_id", "number_in_album"],
        &["album_id", "song_id", "number_in_album"],
    ],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[MUSICIANS_TABLE, ALBUMS_TABLE, SONGS_TABLE, ALBUM_SONGS_TABLE],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{params, Connection};

    #[test]
    fn schema_creates_and_validates() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = &CATALOG_VERSIONED_SCHEMAS[0];
        schema.create(&conn).unwrap();
        schema.validate(&conn).unwrap();
    }

    #[test]
    fn duplicate_position_in_album_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute(
            "INSERT INTO musicians (name, slug) VALUES ('Queen', 'queen')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO albums (name, slug, musician_id, year_of_release)
             VALUES ('A Night at the Opera', 'anato', 1, 1975)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO songs (name, slug) VALUES ('Bohemian Rhapsody', 'bohemian-rhapsody')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO songs (name, slug) VALUES ('Love of My Life', 'love-of-my-life')",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO album_songs (album_id, song_id, number_in_album) VALUES (1, 1, 1)",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO album_songs (album_id, song_id, number_in_album) VALUES (1, 2, 1)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn deleting_a_musician_cascades_to_albums_and_positions() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute(
            "INSERT INTO musicians (name, slug) VALUES ('Queen', 'queen')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO albums (name, slug, musician_id, year_of_release)
             VALUES ('A Night at the Opera', 'anato', 1, 1975)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO songs (name, slug) VALUES ('Bohemian Rhapsody', 'bohemian-rhapsody')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO album_songs (album_id, song_id, number_in_album) VALUES (1, 1, 1)",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM musicians WHERE slug = 'queen'", [])
            .unwrap();

        let albums: i64 = conn
            .query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))
            .unwrap();
        let positions: i64 = conn
            .query_row("SELECT COUNT(*) FROM album_songs", [], |r| r.get(0))
            .unwrap();
        assert_eq!(albums, 0);
        assert_eq!(positions, 0);

        // the song entity itself is not owned by the musician
        let songs: i64 = conn
            .query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))
            .unwrap();
        assert_eq!(songs, 1);
    }

    #[test]
    fn slugs_are_globally_unique_per_entity() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute(
            "INSERT INTO musicians (name, slug) VALUES ('Queen', 'queen')",
            params![],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO musicians (name, slug) VALUES ('Queen II', 'queen')",
            params![],
        );
        assert!(result.is_err());
    }
}
