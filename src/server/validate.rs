//! Write-side payload validation shared by the catalog routes.

use super::error::ApiError;
use crate::catalog_store::{is_valid_slug, MAX_NAME_LENGTH, MAX_SONGS_IN_ALBUM};
use chrono::{Datelike, Utc};

pub fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
}

pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::Validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), ApiError> {
    if !is_valid_slug(slug) {
        return Err(ApiError::Validation(
            "slug may only contain letters, numbers, hyphens and underscores".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_year_of_release(year: i32) -> Result<(), ApiError> {
    let current_year = Utc::now().year();
    if year < 1 || year > current_year {
        return Err(ApiError::Validation(format!(
            "year_of_release must be between 1 and {}",
            current_year
        )));
    }
    Ok(())
}

pub fn validate_number_in_album(number: u32) -> Result<(), ApiError> {
    if number < 1 || number > MAX_SONGS_IN_ALBUM {
        return Err(ApiError::Validation(format!(
            "number_in_album must be between 1 and {}",
            MAX_SONGS_IN_ALBUM
        )));
    }
    Ok(())
}
