//! Paging of song lyrics by verse.

use super::error::{SongError, SongResult};
use super::params::Pagination;

const VERSE_DELIMITER: &str = "\n\n";

/// Return the verses of `text` selected by `pagination`.
///
/// Verses are separated by a blank line. A window running past the last verse
/// is truncated; a window starting past it is [`SongError::EndOfText`].
pub fn page_verses(text: &str, pagination: &Pagination) -> SongResult<Vec<String>> {
    if text.is_empty() {
        return Err(SongError::NoText);
    }
    if pagination.page <= 0 {
        return Err(SongError::InvalidPage);
    }

    let verses: Vec<&str> = text.split(VERSE_DELIMITER).collect();
    let start = pagination
        .offset()
        .and_then(|offset| usize::try_from(offset).ok())
        .ok_or(SongError::EndOfText)?;
    if start >= verses.len() {
        return Err(SongError::EndOfText);
    }
    let size = usize::try_from(pagination.size).map_err(|_| SongError::InvalidPageSize)?;
    let end = start.saturating_add(size).min(verses.len());

    Ok(verses[start..end].iter().map(|v| v.to_string()).collect())
}
