use thiserror::Error;

/// Errors surfaced by catalog storage operations.
///
/// `Conflict` carries a message suitable for the API response; everything
/// unexpected is wrapped in `Internal` and never shown to clients.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            // Unique/foreign key violations that slipped past the friendly
            // pre-checks, e.g. a concurrent writer winning the race.
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                CatalogError::Conflict("conflicts with an existing record".to_string())
            }
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound,
            _ => CatalogError::Internal(err.into()),
        }
    }
}
