//! Parameterized construction of filtered song listings.

use super::params::Filter;
use crate::song_store::{PageWindow, QueryArg, SongQuery};

const BASE_QUERY: &str =
    "SELECT id, title, group_name, release_date, text, link FROM songs WHERE 1 = 1";

/// Accumulates predicate clauses together with their positional arguments.
struct QueryBuilder {
    sql: String,
    args: Vec<QueryArg>,
}

impl QueryBuilder {
    fn new() -> Self {
        QueryBuilder {
            sql: BASE_QUERY.to_string(),
            args: Vec::new(),
        }
    }

    /// Push the argument first so the placeholder number always equals its index.
    fn next_placeholder(&mut self, arg: QueryArg) -> String {
        self.args.push(arg);
        format!("?{}", self.args.len())
    }

    fn and_where(&mut self, clause: impl FnOnce(&str) -> String, arg: QueryArg) {
        let placeholder = self.next_placeholder(arg);
        self.sql.push_str(" AND ");
        self.sql.push_str(&clause(&placeholder));
    }

    fn finish(mut self, window: PageWindow) -> SongQuery {
        let limit = self.next_placeholder(QueryArg::Integer(window.limit));
        let offset = self.next_placeholder(QueryArg::Integer(window.offset));
        self.sql
            .push_str(&format!(" ORDER BY id LIMIT {} OFFSET {}", limit, offset));
        SongQuery {
            sql: self.sql,
            args: self.args,
        }
    }
}

impl SongQuery {
    /// Build the listing query for `filter`, restricted to `window`.
    ///
    /// Predicates are appended in the order title, group, release date. Text
    /// predicates compare case-insensitively. Limit and offset are always the
    /// last two arguments.
    pub fn build(filter: &Filter, window: PageWindow) -> SongQuery {
        let mut builder = QueryBuilder::new();
        if let Some(title) = &filter.title {
            builder.and_where(
                |p| format!("LOWER(title) = LOWER({})", p),
                QueryArg::Text(title.clone()),
            );
        }
        if let Some(group) = &filter.group {
            builder.and_where(
                |p| format!("LOWER(group_name) = LOWER({})", p),
                QueryArg::Text(group.clone()),
            );
        }
        if let Some(date) = filter.release_date {
            builder.and_where(|p| format!("release_date = {}", p), QueryArg::Date(date));
        }
        builder.finish(window)
    }
}
