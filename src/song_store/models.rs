//! Song records and query descriptors exchanged with the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Layout used for every date crossing the HTTP or lookup boundary, e.g. `16.07.2006`.
pub const RELEASE_DATE_FORMAT: &str = "%d.%m.%Y";

/// A persisted song.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    #[serde(rename = "song")]
    pub title: String,
    pub group: String,
    #[serde(rename = "releaseDate", with = "release_date_format")]
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

/// A song without identity: the payload of inserts and wholesale updates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub group: String,
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

impl NewSong {
    pub fn with_id(self, id: i64) -> Song {
        Song {
            id,
            title: self.title,
            group: self.group,
            release_date: self.release_date,
            text: self.text,
            link: self.link,
        }
    }
}

/// Limit/offset pair bounding a listing call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

/// A single positional argument of a [`SongQuery`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryArg {
    Text(String),
    Date(NaiveDate),
    Integer(i64),
}

/// A parameterized listing query. Placeholder `?n` binds `args[n - 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongQuery {
    pub sql: String,
    pub args: Vec<QueryArg>,
}

mod release_date_format {
    use super::RELEASE_DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(RELEASE_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, RELEASE_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
