use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Highest ordinal position a song can occupy within an album.
pub const MAX_SONGS_IN_ALBUM: u32 = 50;

/// Maximum length of entity names and slugs.
pub const MAX_NAME_LENGTH: usize = 150;

lazy_static! {
    static ref SLUG_PATTERN: Regex = Regex::new("^[-a-zA-Z0-9_]+$").unwrap();
}

/// A slug is the URL-safe identifier used in place of numeric ids in paths.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= MAX_NAME_LENGTH && SLUG_PATTERN.is_match(slug)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Musician {
    pub name: String,
    pub slug: String,
}

/// Album as served to clients: the owning musician is exposed by slug and
/// `total_songs` is computed from the association rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub slug: String,
    pub musician: String,
    pub total_songs: u32,
    pub year_of_release: i32,
}

/// Song as served to clients, always in the context of one album:
/// `number_in_album` comes from the association row for that album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    pub slug: String,
    pub number_in_album: u32,
}

#[derive(Debug, Clone)]
pub struct NewMusician {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct MusicianChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub name: String,
    pub slug: String,
    pub year_of_release: i32,
}

#[derive(Debug, Clone, Default)]
pub struct AlbumChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub year_of_release: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewSong {
    pub name: String,
    pub slug: String,
    pub number_in_album: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SongChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub number_in_album: Option<u32>,
}
