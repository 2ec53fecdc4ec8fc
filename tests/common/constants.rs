//! Shared constants for end-to-end tests
//!
//! When the seeded songs change, update only this file and fixtures.rs.

// ============================================================================
// Seeded Songs
// ============================================================================

pub const SONG_1_TITLE: &str = "Supermassive Black Hole";
pub const SONG_1_GROUP: &str = "Muse";
pub const SONG_1_RELEASE_DATE: &str = "16.07.2006";
pub const SONG_1_VERSES: &[&str] = &[
    "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?",
    "You caught me under false pretenses\nHow long before you let me go?",
    "Ooh, you set my soul alight\nOoh, you set my soul alight",
];

pub const SONG_2_TITLE: &str = "Uprising";
/// Lower-cased on purpose, group filters are case-insensitive.
pub const SONG_2_GROUP: &str = "muse";

pub const SONG_3_TITLE: &str = "Starlight";
pub const SONG_3_GROUP: &str = "MUSE";

/// Seeded without lyrics.
pub const SONG_4_TITLE: &str = "Yellow";
pub const SONG_4_GROUP: &str = "Coldplay";

pub const SONG_5_TITLE: &str = "Clocks";
pub const SONG_5_GROUP: &str = "Coldplay";

pub const SEEDED_SONGS_COUNT: usize = 5;

// ============================================================================
// Fake Lookup Service
// ============================================================================

pub const LOOKUP_RELEASE_DATE: &str = "03.05.2010";
pub const LOOKUP_LINK: &str = "https://www.youtube.com/watch?v=Xsp3_a-PMTw";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for a test server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// HTTP client request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Interval between readiness checks
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
