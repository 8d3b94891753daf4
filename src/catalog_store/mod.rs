mod error;
mod models;
mod schema;
mod store;
mod trait_def;

pub use error::CatalogError;
pub use models::{
    is_valid_slug, Album, AlbumChanges, Musician, MusicianChanges, NewAlbum, NewMusician, NewSong,
    Song, SongChanges, MAX_NAME_LENGTH, MAX_SONGS_IN_ALBUM,
};
pub use store::SqliteCatalogStore;
pub use trait_def::CatalogStore;
