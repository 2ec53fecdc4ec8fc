//! Validation and defaulting of raw pagination and filter parameters.

use super::error::{SongError, SongResult};
use crate::song_store::{PageWindow, RELEASE_DATE_FORMAT};
use chrono::NaiveDate;
use serde::Deserialize;

const LISTING_PAGE_SIZES: &[&str] = &["10", "25", "50"];
const LISTING_DEFAULT_PAGE_SIZE: &str = "10";

const VERSES_PAGE_SIZES: &[&str] = &["1", "5", "10"];
const VERSES_DEFAULT_PAGE_SIZE: &str = "1";

const DEFAULT_PAGE: &str = "1";

/// Raw query string of `GET /songs`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub song: Option<String>,
    pub group: Option<String>,
    pub date: Option<String>,
}

/// Raw query string of `GET /song`.
#[derive(Debug, Default, Deserialize)]
pub struct VersesParams {
    pub id: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

/// Raw query string of `PUT /song` and `DELETE /song`.
#[derive(Debug, Default, Deserialize)]
pub struct SongIdParams {
    pub id: Option<String>,
}

/// 1-based page number and page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Pagination {
    /// Pagination of song listings: size in {10, 25, 50}, page must be positive.
    pub fn for_listing(page: Option<&str>, size: Option<&str>) -> SongResult<Self> {
        let page = parse_page(page)?;
        if page <= 0 {
            return Err(SongError::InvalidPage);
        }
        let size = parse_size(size, LISTING_PAGE_SIZES, LISTING_DEFAULT_PAGE_SIZE)?;
        Ok(Pagination { page, size })
    }

    /// Pagination of lyrics verses: size in {1, 5, 10}. The page lower bound is
    /// checked by the verse paginator.
    pub fn for_verses(page: Option<&str>, size: Option<&str>) -> SongResult<Self> {
        let page = parse_page(page)?;
        let size = parse_size(size, VERSES_PAGE_SIZES, VERSES_DEFAULT_PAGE_SIZE)?;
        Ok(Pagination { page, size })
    }

    /// Number of items before this page, `None` when it does not fit in an `i64`.
    pub fn offset(&self) -> Option<i64> {
        self.page.checked_sub(1)?.checked_mul(self.size)
    }

    pub fn window(&self) -> Option<PageWindow> {
        Some(PageWindow {
            limit: self.size,
            offset: self.offset()?,
        })
    }
}

/// Optional equality predicates of a song listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub title: Option<String>,
    pub group: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl Filter {
    /// Build a filter from raw parameters. Empty strings count as absent.
    pub fn parse(song: Option<&str>, group: Option<&str>, date: Option<&str>) -> SongResult<Self> {
        let release_date = match non_empty(date) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, RELEASE_DATE_FORMAT)
                    .map_err(|_| SongError::InvalidDate)?,
            ),
            None => None,
        };
        Ok(Filter {
            title: non_empty(song).map(str::to_string),
            group: non_empty(group).map(str::to_string),
            release_date,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.group.is_none() && self.release_date.is_none()
    }
}

impl ListingParams {
    pub fn normalize(&self) -> SongResult<(Pagination, Filter)> {
        let pagination = Pagination::for_listing(self.page.as_deref(), self.size.as_deref())?;
        let filter = Filter::parse(
            self.song.as_deref(),
            self.group.as_deref(),
            self.date.as_deref(),
        )?;
        Ok((pagination, filter))
    }
}

pub fn parse_song_id(raw: Option<&str>) -> SongResult<i64> {
    raw.and_then(|id| id.parse::<i64>().ok())
        .ok_or(SongError::InvalidId)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}

fn parse_page(raw: Option<&str>) -> SongResult<i64> {
    non_empty(raw)
        .unwrap_or(DEFAULT_PAGE)
        .parse::<i64>()
        .map_err(|_| SongError::InvalidPage)
}

fn parse_size(raw: Option<&str>, allowed: &[&str], default: &str) -> SongResult<i64> {
    let effective = match raw {
        Some(size) if allowed.contains(&size) => size,
        _ => default,
    };
    effective
        .parse::<i64>()
        .map_err(|_| SongError::InvalidPageSize)
}
