//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, seeded slugs), update only this
//! file.

// ============================================================================
// Test User Credentials
// ============================================================================

/// Administrator username
pub const ADMIN_USER: &str = "admin";

/// Administrator password
pub const ADMIN_PASS: &str = "adminpass123";

/// Regular (non-staff) username
pub const TEST_USER: &str = "testuser";

/// Regular (non-staff) password
pub const TEST_PASS: &str = "testpass123";

// ============================================================================
// Seeded Catalog Data
// ============================================================================

/// Musician seeded in every test server
pub const MUSICIAN_NAME: &str = "The Test Band";
pub const MUSICIAN_SLUG: &str = "the-test-band";

/// Album seeded under the test musician
pub const ALBUM_NAME: &str = "First Album";
pub const ALBUM_SLUG: &str = "first-album";
pub const ALBUM_YEAR: i32 = 2001;

/// Song seeded at position 1 of the test album
pub const SONG_NAME: &str = "Opening Track";
pub const SONG_SLUG: &str = "opening-track";
pub const SONG_NUMBER: u32 = 1;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
