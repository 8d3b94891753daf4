//! CatalogStore trait definition.
//!
//! Abstracts catalog storage so the HTTP layer never touches SQL. All
//! operations address entities by slug; album and song operations are scoped
//! to the parents named in the arguments and fail with `CatalogError::NotFound`
//! when any slug along the path does not resolve.

use super::error::CatalogError;
use super::models::{
    Album, AlbumChanges, Musician, MusicianChanges, NewAlbum, NewMusician, NewSong, Song,
    SongChanges,
};

pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Musicians
    // =========================================================================

    /// Lists musicians ordered by name, optionally filtered by a
    /// case-insensitive substring match on name.
    fn list_musicians(&self, search: Option<&str>) -> Result<Vec<Musician>, CatalogError>;

    /// Returns the musician with the given slug.
    fn get_musician(&self, slug: &str) -> Result<Musician, CatalogError>;

    /// Creates a musician. Fails with `Conflict` if the slug is taken.
    fn create_musician(&self, new: NewMusician) -> Result<Musician, CatalogError>;

    /// Applies the given changes to a musician and returns the updated entity.
    fn update_musician(
        &self,
        slug: &str,
        changes: MusicianChanges,
    ) -> Result<Musician, CatalogError>;

    /// Deletes a musician and, transitively, its albums and their song
    /// positions.
    fn delete_musician(&self, slug: &str) -> Result<(), CatalogError>;

    // =========================================================================
    // Albums, scoped to the owning musician
    // =========================================================================

    /// Lists the musician's albums ordered by name then year of release
    /// descending.
    fn list_albums(
        &self,
        musician_slug: &str,
        search: Option<&str>,
    ) -> Result<Vec<Album>, CatalogError>;

    /// Returns the album with the given slug, only if it belongs to the named
    /// musician.
    fn get_album(&self, musician_slug: &str, album_slug: &str) -> Result<Album, CatalogError>;

    /// Creates an album owned by the named musician.
    fn create_album(&self, musician_slug: &str, new: NewAlbum) -> Result<Album, CatalogError>;

    /// Applies the given changes to an album and returns the updated entity.
    fn update_album(
        &self,
        musician_slug: &str,
        album_slug: &str,
        changes: AlbumChanges,
    ) -> Result<Album, CatalogError>;

    /// Deletes an album and its song positions.
    fn delete_album(&self, musician_slug: &str, album_slug: &str) -> Result<(), CatalogError>;

    // =========================================================================
    // Songs, scoped to the owning album
    // =========================================================================

    /// Lists the album's songs ordered by their position in the album.
    fn list_songs(
        &self,
        musician_slug: &str,
        album_slug: &str,
        search: Option<&str>,
    ) -> Result<Vec<Song>, CatalogError>;

    /// Returns the song with the given slug, only if it has a position in the
    /// named album.
    fn get_song(
        &self,
        musician_slug: &str,
        album_slug: &str,
        song_slug: &str,
    ) -> Result<Song, CatalogError>;

    /// Creates a song together with its position in the named album. Both
    /// rows are written in one transaction: a conflict on either leaves no
    /// trace of the song.
    fn create_song(
        &self,
        musician_slug: &str,
        album_slug: &str,
        new: NewSong,
    ) -> Result<Song, CatalogError>;

    /// Updates a song's own fields and/or its position in the album, in one
    /// transaction. Keeping the current position is not a conflict.
    fn update_song(
        &self,
        musician_slug: &str,
        album_slug: &str,
        song_slug: &str,
        changes: SongChanges,
    ) -> Result<Song, CatalogError>;

    /// Deletes a song and its position row.
    fn delete_song(
        &self,
        musician_slug: &str,
        album_slug: &str,
        song_slug: &str,
    ) -> Result<(), CatalogError>;

    // =========================================================================
    // Counts, for the stats endpoint
    // =========================================================================

    fn get_musicians_count(&self) -> usize;
    fn get_albums_count(&self) -> usize;
    fn get_songs_count(&self) -> usize;
}
